use std::fmt;

use crate::operand::Operand;

/// Every operation kind the decoder can produce. Only a subset is
/// modeled by the execution core; the rest still decodes and prints but
/// executes as a reported no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Mov,
    Add,
    Sub,
    Cmp,
    Jo,
    Jno,
    Jb,
    Jnb,
    Je,
    Jne,
    Jbe,
    Ja,
    Js,
    Jns,
    Jp,
    Jnp,
    Jl,
    Jnl,
    Jle,
    Jg,
    Loopnz,
    Loopz,
    Loop,
    Jcxz,
}

impl Operation {
    pub fn mnemonic(&self) -> &'static str {
        match *self {
            Operation::Mov => "mov",
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Cmp => "cmp",
            Operation::Jo => "jo",
            Operation::Jno => "jno",
            Operation::Jb => "jb",
            Operation::Jnb => "jnb",
            Operation::Je => "je",
            Operation::Jne => "jne",
            Operation::Jbe => "jbe",
            Operation::Ja => "ja",
            Operation::Js => "js",
            Operation::Jns => "jns",
            Operation::Jp => "jp",
            Operation::Jnp => "jnp",
            Operation::Jl => "jl",
            Operation::Jnl => "jnl",
            Operation::Jle => "jle",
            Operation::Jg => "jg",
            Operation::Loopnz => "loopnz",
            Operation::Loopz => "loopz",
            Operation::Loop => "loop",
            Operation::Jcxz => "jcxz",
        }
    }

    /// Control transfers carry a single signed displacement relative to
    /// the next instruction.
    pub fn is_relative_branch(&self) -> bool {
        !matches!(
            *self,
            Operation::Mov | Operation::Add | Operation::Sub | Operation::Cmp
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// One decoded instruction, produced fresh per decode call and read-only
/// to the execution core.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub address: usize,
    pub operation: Operation,
    pub operands: [Operand; 2],
    pub wide: bool,
    pub length: usize,
    pub bytes: Vec<u8>,
}

impl Instruction {
    /// NASM-style source text for the trace.
    pub fn text(&self) -> String {
        if self.operation.is_relative_branch() {
            let offset = match self.operands[0] {
                Operand::Immediate(value) => value as i16 as i32,
                _ => 0,
            };

            return format!("{} ${:+}", self.operation, offset + self.length as i32);
        }

        match (self.operands[0], self.operands[1]) {
            (Operand::None, _) => format!("{}", self.operation),
            (destination, Operand::None) => format!("{} {}", self.operation, destination),
            (destination @ Operand::Memory(_), Operand::Immediate(value)) => {
                let width = if self.wide { "word" } else { "byte" };
                format!("{} {}, {} {}", self.operation, destination, width, value)
            }
            (destination, source) => format!("{} {}, {}", self.operation, destination, source),
        }
    }

    fn byte_sequence(&self) -> String {
        format!(
            "({})",
            self.bytes
                .iter()
                .fold(String::new(), |acc, byte| format!("{} {:02x}", acc, byte))
                .trim()
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#0x{:05X}: {: <20}{}",
            self.address,
            self.byte_sequence(),
            self.text()
        )
    }
}

/// One executed instruction in the trace: where it was, its bytes, its
/// source text and what it did to the machine state.
#[derive(Debug)]
pub struct LogLine {
    pub address: usize,
    pub bytes: Vec<u8>,
    pub text: String,
    pub outcome: String,
}

impl LogLine {
    pub fn new(instruction: &Instruction, outcome: String) -> LogLine {
        LogLine {
            address: instruction.address,
            bytes: instruction.bytes.clone(),
            text: instruction.text(),
            outcome,
        }
    }

    pub fn unhandled(instruction: &Instruction) -> LogLine {
        LogLine::new(instruction, "unhandled operation".to_owned())
    }

    fn byte_sequence(&self) -> String {
        format!(
            "({})",
            self.bytes
                .iter()
                .fold(String::new(), |acc, byte| format!("{} {:02x}", acc, byte))
                .trim()
        )
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#0x{:05X}: {: <20}{: <28} {}",
            self.address,
            self.byte_sequence(),
            self.text,
            self.outcome
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::memory::MemoryRegion;
    use crate::operand::Operand;
    use crate::registers::{RegisterFile, WordRegister};

    /// Build a machine with the program loaded and the instruction
    /// pointer parked at its first byte.
    pub fn get_stuff(address: usize, program: &[u8]) -> (MemoryRegion, RegisterFile) {
        let mut memory = MemoryRegion::allocate(16);
        memory.load(address, program);
        let mut registers = RegisterFile::new();
        registers.write_word(WordRegister::Ip, address as u16);

        (memory, registers)
    }

    #[test]
    fn test_instruction_text() {
        use crate::registers::{GeneralRegister, RegisterAccess};

        let instruction = Instruction {
            address: 0x0000,
            operation: Operation::Mov,
            operands: [
                Operand::Register(RegisterAccess::Word(WordRegister::General(
                    GeneralRegister::Cx,
                ))),
                Operand::Immediate(3),
            ],
            wide: true,
            length: 3,
            bytes: vec![0xb9, 0x03, 0x00],
        };
        assert_eq!("mov cx, 3", instruction.text());
        assert_eq!(
            "#0x00000: (b9 03 00)          mov cx, 3",
            format!("{}", instruction)
        );
    }

    #[test]
    fn test_branch_text_is_relative_to_instruction_start() {
        let instruction = Instruction {
            address: 0x0003,
            operation: Operation::Loop,
            operands: [Operand::Immediate(-2_i16 as u16), Operand::None],
            wide: true,
            length: 2,
            bytes: vec![0xe2, 0xfe],
        };
        assert_eq!("loop $+0", instruction.text());
    }
}
