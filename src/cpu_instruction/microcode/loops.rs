use super::*;

/// `loop`: decrement cx, branch while the decremented value is nonzero.
/// The flags are left alone, the counter itself is the condition.
pub fn loops(
    memory: &mut MemoryRegion,
    registers: &mut RegisterFile,
    instruction: &Instruction,
) -> Result<LogLine> {
    let source = instruction.operands[0].resolve(registers, memory)?;
    let offset = source.read(true, registers, memory);

    let counter = WordRegister::General(GeneralRegister::Cx);
    let remaining = registers.read_word(counter).wrapping_sub(1);
    registers.write_word(counter, remaining);

    if remaining != 0 {
        registers.jump_relative(offset);
    }

    Ok(LogLine::new(
        instruction,
        format!(
            "[cx=0x{:04x}][ip=0x{:04x}]",
            remaining,
            registers.read_word(WordRegister::Ip)
        ),
    ))
}
