use super::*;

/// Same subtraction as `sub`, flags only: the destination keeps its
/// stored value.
pub fn cmp(
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

    let outcome = match flags::delta(before, after) {
        Some(change) => format!("[flags:{}]", change),
        None => format!("[flags:{}]", after),
    };

    Ok(LogLine::new(instruction, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_instruction::cpu_instruction::tests::get_stuff;
    use crate::processing_unit::execute_step;

    #[test]
    fn test_cmp_equal_sets_zero() {
        // mov bx, 5; cmp bx, 5
        let (mut memory, mut registers) = get_stuff(0x0000, &[0xbb, 0x05, 0x00, 0x83, 0xfb, 0x05]);
        execute_step(&mut registers, &mut memory).unwrap();
        execute_step(&mut registers, &mut memory).unwrap();
        assert!(registers.flags().zero());
        assert!(!registers.flags().sign());
    }

    #[test]
    fn test_cmp_leaves_destination_untouched() {
        // mov bx, 5; cmp bx, 3: flags as sub would set them, bx unchanged
        let (mut memory, mut registers) = get_stuff(0x0000, &[0xbb, 0x05, 0x00, 0x83, 0xfb, 0x03]);
        execute_step(&mut registers, &mut memory).unwrap();
        execute_step(&mut registers, &mut memory).unwrap();
        assert_eq!(
            0x0005,
            registers.read_word(WordRegister::General(GeneralRegister::Bx))
        );
        // 5 - 3 = 2: one set bit, parity odd → all three flags clear
        assert!(!registers.flags().zero());
        assert!(!registers.flags().parity());
        assert!(!registers.flags().sign());
    }

    #[test]
    fn test_cmp_memory_destination_untouched() {
        // mov word [1000], 9; cmp [1000], bx (bx = 0)
        let (mut memory, mut registers) = get_stuff(
            0x0000,
            &[0xc7, 0x06, 0xe8, 0x03, 0x09, 0x00, 0x39, 0x1e, 0xe8, 0x03],
        );
        execute_step(&mut registers, &mut memory).unwrap();
        execute_step(&mut registers, &mut memory).unwrap();
        assert_eq!(0x0009, memory.read_word(1000));
        assert!(!registers.flags().zero());
    }

    #[test]
    fn test_cmp_smaller_sets_sign() {
        // mov bx, 3; cmp bx, 5 → 0xfffe
        let (mut memory, mut registers) = get_stuff(0x0000, &[0xbb, 0x03, 0x00, 0x83, 0xfb, 0x05]);
        execute_step(&mut registers, &mut memory).unwrap();
        let log_line = execute_step(&mut registers, &mut memory).unwrap();
        assert!(registers.flags().sign());
        assert_eq!("[flags:->S]", log_line.outcome);
    }
}
