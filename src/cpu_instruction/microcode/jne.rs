use super::*;

pub fn jne(
    memory: &mut MemoryRegion,
    registers: &mut RegisterFile,
    instruction: &Instruction,
) -> Result<LogLine> {
    let source = instruction.operands[0].resolve(registers, memory)?;
    let offset = source.read(true, registers, memory);

    if !registers.flags().zero() {
        registers.jump_relative(offset);
    }

    Ok(LogLine::new(
        instruction,
        format!("[ip=0x{:04x}]", registers.read_word(WordRegister::Ip)),
    ))
}
