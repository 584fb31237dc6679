use std::error;
use std::fmt;

use crate::decoder::DecodeError;
use crate::operand::ResolutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionError {
    // ↓ the byte stream stopped matching known encodings, fatal for the run
    Decode(DecodeError),
    Resolution(ResolutionError),
    // ↓ the memory region degraded at allocation time
    InvalidMemory,
}

pub type Result<T> = std::result::Result<T, ExecutionError>;

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ExecutionError::Decode(e) => write!(f, "decode failure halted the run: {}", e),
            ExecutionError::Resolution(e) => {
                write!(f, "operand resolution error during execution: {}", e)
            }
            ExecutionError::InvalidMemory => {
                write!(f, "main memory could not be allocated, nothing executed")
            }
        }
    }
}

impl error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

impl std::convert::From<DecodeError> for ExecutionError {
    fn from(err: DecodeError) -> ExecutionError {
        ExecutionError::Decode(err)
    }
}

impl std::convert::From<ResolutionError> for ExecutionError {
    fn from(err: ResolutionError) -> ExecutionError {
        ExecutionError::Resolution(err)
    }
}
