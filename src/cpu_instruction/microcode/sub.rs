use super::*;

pub fn sub(
    memory: &mut MemoryRegion,
    registers: &mut RegisterFile,
    instruction: &Instruction,
) -> Result<LogLine> {
    let destination = instruction.operands[0].resolve(registers, memory)?;
    let source = instruction.operands[1].resolve(registers, memory)?;
    let before = registers.flags();

    let lhs = destination.read(instruction.wide, registers, memory) as i32;
    let rhs = source.read(instruction.wide, registers, memory) as i32;
    let result = (lhs - rhs) as u16;

    let after = Flags::from_result(result);
    registers.set_flags(after);
    destination.write(instruction.wide, result, registers, memory)?;

    let outcome = match flags::delta(before, after) {
        Some(change) => format!(
            "[{}={}][flags:{}]",
            destination,
            format_value(instruction.wide, result),
            change
        ),
        None => format!(
            "[{}={}]",
            destination,
            format_value(instruction.wide, result)
        ),
    };

    Ok(LogLine::new(instruction, outcome))
}
