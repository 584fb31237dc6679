use super::*;

pub fn je(
    memory: &mut MemoryRegion,
    registers: &mut RegisterFile,
    instruction: &Instruction,
) -> Result<LogLine> {
    let source = instruction.operands[0].resolve(registers, memory)?;
    let offset = source.read(true, registers, memory);

    // the pointer already moved past this instruction, the displacement
    // is relative to that
    if registers.flags().zero() {
        registers.jump_relative(offset);
    }

    Ok(LogLine::new(
        instruction,
        format!("[ip=0x{:04x}]", registers.read_word(WordRegister::Ip)),
    ))
}
