use soft8086::{
    execute, ExecutionError, GeneralRegister, MemoryRegion, RegisterFile, WordRegister,
    PRINTABLE_REGISTERS,
};

#[test]
fn execute_program() {
    // mov cx, 3; loop $+0 (the loop branches back onto itself)
    let mut memory = MemoryRegion::allocate(20);
    let byte_count = memory.load(0, &[0xb9, 0x03, 0x00, 0xe2, 0xfe]);
    let mut registers = RegisterFile::new();
    let log_lines = execute(&mut memory, &mut registers, byte_count).unwrap();

    let expected_output: Vec<&str> = vec![
        "#0x00000: (b9 03 00)          mov cx, 3                    [cx=0x0003]",
        "#0x00003: (e2 fe)             loop $+0                     [cx=0x0002][ip=0x0003]",
        "#0x00003: (e2 fe)             loop $+0                     [cx=0x0001][ip=0x0003]",
        "#0x00003: (e2 fe)             loop $+0                     [cx=0x0000][ip=0x0005]",
    ];
    assert_eq!(expected_output.len(), log_lines.len());
    for (expected, line) in expected_output.iter().zip(log_lines.iter()) {
        assert_eq!(*expected, format!("{}", line));
    }
    assert_eq!(
        0x0000,
        registers.read_word(WordRegister::General(GeneralRegister::Cx))
    );
    assert_eq!(0x0005, registers.read_word(WordRegister::Ip));
}

#[test]
fn arithmetic_flags() {
    // mov ax, 5; sub ax, 5: the flag transition shows up in the trace
    let mut memory = MemoryRegion::allocate(20);
    let byte_count = memory.load(0, &[0xb8, 0x05, 0x00, 0x2d, 0x05, 0x00]);
    let mut registers = RegisterFile::new();
    let log_lines = execute(&mut memory, &mut registers, byte_count).unwrap();

    let expected_output: Vec<&str> = vec![
        "#0x00000: (b8 05 00)          mov ax, 5                    [ax=0x0005]",
        "#0x00003: (2d 05 00)          sub ax, 5                    [ax=0x0000][flags:->PZ]",
    ];
    for (expected, line) in expected_output.iter().zip(log_lines.iter()) {
        assert_eq!(*expected, format!("{}", line));
    }
    assert_eq!(
        0x0000,
        registers.read_word(WordRegister::General(GeneralRegister::Ax))
    );
    assert!(registers.flags().zero());
    assert!(registers.flags().parity());
    assert!(!registers.flags().sign());
}

#[test]
fn conditional_skip() {
    // mov ax, 1; sub ax, 1; je over the mov bx, 42; mov cx, 7
    let mut memory = MemoryRegion::allocate(20);
    let byte_count = memory.load(
        0,
        &[
            0xb8, 0x01, 0x00, // mov ax, 1
            0x2d, 0x01, 0x00, // sub ax, 1
            0x74, 0x03, // je $+5
            0xbb, 0x2a, 0x00, // mov bx, 42 (skipped)
            0xb9, 0x07, 0x00, // mov cx, 7
        ],
    );
    let mut registers = RegisterFile::new();
    let log_lines = execute(&mut memory, &mut registers, byte_count).unwrap();

    assert_eq!(4, log_lines.len());
    assert_eq!(
        0x0000,
        registers.read_word(WordRegister::General(GeneralRegister::Bx))
    );
    assert_eq!(
        0x0007,
        registers.read_word(WordRegister::General(GeneralRegister::Cx))
    );
}

#[test]
fn unhandled_operation_is_reported_and_skipped() {
    // jl decodes but does not execute; the run carries on past it
    let mut memory = MemoryRegion::allocate(20);
    let byte_count = memory.load(0, &[0x7c, 0x02, 0xb8, 0x01, 0x00]);
    let mut registers = RegisterFile::new();
    let log_lines = execute(&mut memory, &mut registers, byte_count).unwrap();

    assert_eq!(2, log_lines.len());
    assert_eq!("unhandled operation", log_lines[0].outcome);
    assert_eq!(
        0x0001,
        registers.read_word(WordRegister::General(GeneralRegister::Ax))
    );
}

#[test]
fn decode_failure_stops_the_run() {
    let mut memory = MemoryRegion::allocate(20);
    let byte_count = memory.load(0, &[0x0f]);
    let mut registers = RegisterFile::new();
    let result = execute(&mut memory, &mut registers, byte_count);

    assert!(matches!(result, Err(ExecutionError::Decode(_))));
    // nothing ran, every register still holds its reset value
    for register in PRINTABLE_REGISTERS {
        assert_eq!(0x0000, registers.read_word(register));
    }
}

#[test]
fn memory_operands_share_state_across_instructions() {
    // mov word [1000], 10; mov bx, 5; add [1000], bx; mov cx, [1000]
    let mut memory = MemoryRegion::allocate(20);
    let byte_count = memory.load(
        0,
        &[
            0xc7, 0x06, 0xe8, 0x03, 0x0a, 0x00, // mov word [1000], 10
            0xbb, 0x05, 0x00, // mov bx, 5
            0x01, 0x1e, 0xe8, 0x03, // add [1000], bx
            0x8b, 0x0e, 0xe8, 0x03, // mov cx, [1000]
        ],
    );
    let mut registers = RegisterFile::new();
    execute(&mut memory, &mut registers, byte_count).unwrap();

    assert_eq!(0x000f, memory.read_word(1000));
    assert_eq!(
        0x000f,
        registers.read_word(WordRegister::General(GeneralRegister::Cx))
    );
}
