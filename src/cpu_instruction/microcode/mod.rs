mod error;

mod add;
mod cmp;
mod je;
mod jne;
mod loops;
mod mov;
mod sub;

pub use self::error::{ExecutionError, Result};

pub use self::add::add;
pub use self::cmp::cmp;
pub use self::je::je;
pub use self::jne::jne;
pub use self::loops::loops;
pub use self::mov::mov;
pub use self::sub::sub;

pub(crate) use crate::cpu_instruction::{Instruction, LogLine};
pub(crate) use crate::flags::{self, Flags};
pub(crate) use crate::memory::MemoryRegion;
pub(crate) use crate::registers::{GeneralRegister, RegisterFile, WordRegister};

/// Width-aware hex rendering for trace outcomes.
pub(crate) fn format_value(wide: bool, value: u16) -> String {
    if wide {
        format!("0x{:04x}", value)
    } else {
        format!("0x{:02x}", value as u8)
    }
}
