mod cpu_instruction;
mod decoder;
mod flags;
pub mod memory;
mod operand;
mod processing_unit;
mod registers;

pub use cpu_instruction::microcode::{ExecutionError, Result};
pub use cpu_instruction::{Instruction, LogLine, Operation};
pub use decoder::{decode_instruction, DecodeError};
pub use flags::Flags;
pub use memory::MemoryRegion;
pub use processing_unit::{disassemble, execute_step};
pub use registers::{
    ByteHalf, GeneralRegister, RegisterAccess, RegisterFile, WordRegister, PRINTABLE_REGISTERS,
};

/// Run the loaded program from the current instruction pointer until it
/// moves past `byte_count`, collecting one log line per executed
/// instruction.
pub fn execute(
    memory: &mut MemoryRegion,
    registers: &mut RegisterFile,
    byte_count: usize,
) -> Result<Vec<LogLine>> {
    if !memory.is_valid() {
        return Err(ExecutionError::InvalidMemory);
    }

    let mut log_lines = vec![];
    while (registers.read_word(WordRegister::Ip) as usize) < byte_count {
        log_lines.push(execute_step(registers, memory)?);
    }

    Ok(log_lines)
}
