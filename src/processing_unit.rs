use crate::cpu_instruction::microcode;
use crate::cpu_instruction::microcode::Result;
use crate::cpu_instruction::{Instruction, LogLine, Operation};
use crate::decoder::{self, DecodeError};
use crate::memory::MemoryRegion;
use crate::registers::{RegisterFile, WordRegister};

/// Fetch, decode and execute the instruction at ip.
///
/// The instruction pointer moves past the instruction before the
/// operation runs, so relative branches add their displacement to the
/// address of the next instruction. When decoding fails the machine
/// state is exactly as it was before the call.
pub fn execute_step(registers: &mut RegisterFile, memory: &mut MemoryRegion) -> Result<LogLine> {
    let address = registers.read_word(WordRegister::Ip) as usize;
    let instruction = decoder::decode_instruction(memory, address)?;
    registers.write_word(
        WordRegister::Ip,
        (address as u16).wrapping_add(instruction.length as u16),
    );

    match instruction.operation {
        Operation::Mov => microcode::mov(memory, registers, &instruction),
        Operation::Add => microcode::add(memory, registers, &instruction),
        Operation::Sub => microcode::sub(memory, registers, &instruction),
        Operation::Cmp => microcode::cmp(memory, registers, &instruction),
        Operation::Je => microcode::je(memory, registers, &instruction),
        Operation::Jne => microcode::jne(memory, registers, &instruction),
        Operation::Loop => microcode::loops(memory, registers, &instruction),
        _ => Ok(LogLine::unhandled(&instruction)),
    }
}

/// Decode instructions from `start` until `byte_count` bytes of the
/// stream are covered. No state is touched, this is the listing the
/// `--disassemble` flag prints.
pub fn disassemble(
    start: usize,
    byte_count: usize,
    memory: &MemoryRegion,
) -> std::result::Result<Vec<Instruction>, DecodeError> {
    let mut instructions = vec![];
    let mut address = start;

    while address < start + byte_count {
        let instruction = decoder::decode_instruction(memory, address)?;
        address += instruction.length;
        instructions.push(instruction);
    }

    Ok(instructions)
}
