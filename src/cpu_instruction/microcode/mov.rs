use super::*;

pub fn mov(
    memory: &mut MemoryRegion,
    registers: &mut RegisterFile,
    instruction: &Instruction,
) -> Result<LogLine> {
    let destination = instruction.operands[0].resolve(registers, memory)?;
    let source = instruction.operands[1].resolve(registers, memory)?;

    let value = source.read(instruction.wide, registers, memory);
    destination.write(instruction.wide, value, registers, memory)?;

    Ok(LogLine::new(
        instruction,
        format!(
            "[{}={}]",
            destination,
            format_value(instruction.wide, value)
        ),
    ))
}
