use std::error;
use std::fmt;

use crate::cpu_instruction::{Instruction, Operation};
use crate::memory::MemoryRegion;
use crate::operand::{AddressTerm, EffectiveAddress, Operand};
use crate::registers::{ByteHalf, GeneralRegister, RegisterAccess, WordRegister};

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnknownOpcode { address: usize, opcode: u8 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DecodeError::UnknownOpcode { address, opcode } => write!(
                f,
                "unrecognized byte 0x{:02x} in instruction stream at address #0x{:05X}",
                opcode, address
            ),
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// Jump row 0x70..0x7f, indexed by the low nibble of the opcode.
const CONDITIONAL_JUMPS: [Operation; 16] = [
    Operation::Jo,
    Operation::Jno,
    Operation::Jb,
    Operation::Jnb,
    Operation::Je,
    Operation::Jne,
    Operation::Jbe,
    Operation::Ja,
    Operation::Js,
    Operation::Jns,
    Operation::Jp,
    Operation::Jnp,
    Operation::Jl,
    Operation::Jnl,
    Operation::Jle,
    Operation::Jg,
];

/// Loop row 0xe0..0xe3.
const LOOP_OPERATIONS: [Operation; 4] = [
    Operation::Loopnz,
    Operation::Loopz,
    Operation::Loop,
    Operation::Jcxz,
];

/// Read-only byte cursor over the instruction stream; remembers every
/// byte it consumed so the instruction can carry its own encoding.
struct Cursor<'a> {
    memory: &'a MemoryRegion,
    address: usize,
    bytes: Vec<u8>,
}

impl<'a> Cursor<'a> {
    fn new(memory: &'a MemoryRegion, address: usize) -> Cursor<'a> {
        Cursor {
            memory,
            address,
            bytes: vec![],
        }
    }

    fn next(&mut self) -> u8 {
        let byte = self.memory.read_byte(self.address + self.bytes.len());
        self.bytes.push(byte);

        byte
    }

    fn next_word(&mut self) -> u16 {
        let low = self.next() as u16;
        let high = self.next() as u16;

        high << 8 | low
    }
}

fn word_register(encoding: u8) -> RegisterAccess {
    match encoding & 0b111 {
        0b000 => RegisterAccess::Word(WordRegister::General(GeneralRegister::Ax)),
        0b001 => RegisterAccess::Word(WordRegister::General(GeneralRegister::Cx)),
        0b010 => RegisterAccess::Word(WordRegister::General(GeneralRegister::Dx)),
        0b011 => RegisterAccess::Word(WordRegister::General(GeneralRegister::Bx)),
        0b100 => RegisterAccess::Word(WordRegister::Sp),
        0b101 => RegisterAccess::Word(WordRegister::Bp),
        0b110 => RegisterAccess::Word(WordRegister::Si),
        _ => RegisterAccess::Word(WordRegister::Di),
    }
}

fn byte_register(encoding: u8) -> RegisterAccess {
    match encoding & 0b111 {
        0b000 => RegisterAccess::Byte(GeneralRegister::Ax, ByteHalf::Low),
        0b001 => RegisterAccess::Byte(GeneralRegister::Cx, ByteHalf::Low),
        0b010 => RegisterAccess::Byte(GeneralRegister::Dx, ByteHalf::Low),
        0b011 => RegisterAccess::Byte(GeneralRegister::Bx, ByteHalf::Low),
        0b100 => RegisterAccess::Byte(GeneralRegister::Ax, ByteHalf::High),
        0b101 => RegisterAccess::Byte(GeneralRegister::Cx, ByteHalf::High),
        0b110 => RegisterAccess::Byte(GeneralRegister::Dx, ByteHalf::High),
        _ => RegisterAccess::Byte(GeneralRegister::Bx, ByteHalf::High),
    }
}

fn register_operand(encoding: u8, wide: bool) -> Operand {
    if wide {
        Operand::Register(word_register(encoding))
    } else {
        Operand::Register(byte_register(encoding))
    }
}

/// Base register terms for the eight r/m effective address rows.
fn base_terms(rm: u8) -> [Option<AddressTerm>; 2] {
    let term = |register| {
        Some(AddressTerm {
            register,
            scale: 1,
        })
    };

    match rm & 0b111 {
        0b000 => [
            term(WordRegister::General(GeneralRegister::Bx)),
            term(WordRegister::Si),
        ],
        0b001 => [
            term(WordRegister::General(GeneralRegister::Bx)),
            term(WordRegister::Di),
        ],
        0b010 => [term(WordRegister::Bp), term(WordRegister::Si)],
        0b011 => [term(WordRegister::Bp), term(WordRegister::Di)],
        0b100 => [term(WordRegister::Si), None],
        0b101 => [term(WordRegister::Di), None],
        0b110 => [term(WordRegister::Bp), None],
        _ => [term(WordRegister::General(GeneralRegister::Bx)), None],
    }
}

/// Decode the r/m side of a mod-reg-r/m byte, consuming displacement
/// bytes as the mode requires.
fn modrm_operand(cursor: &mut Cursor, modrm: u8, wide: bool) -> Operand {
    let mode = modrm >> 6;
    let rm = modrm & 0b111;

    match mode {
        0b11 => register_operand(rm, wide),
        0b00 if rm == 0b110 => {
            // direct address takes the slot of the bare bp row
            let displacement = cursor.next_word() as i32;
            Operand::Memory(EffectiveAddress::direct(displacement))
        }
        0b00 => Operand::Memory(EffectiveAddress {
            terms: base_terms(rm),
            displacement: 0,
        }),
        0b01 => {
            let displacement = cursor.next() as i8 as i32;
            Operand::Memory(EffectiveAddress {
                terms: base_terms(rm),
                displacement,
            })
        }
        _ => {
            let displacement = cursor.next_word() as i16 as i32;
            Operand::Memory(EffectiveAddress {
                terms: base_terms(rm),
                displacement,
            })
        }
    }
}

/// Decode one instruction at the given address. The byte stream either
/// matches a known encoding or the whole run is over: an unknown byte is
/// terminal, not a recoverable per-instruction condition.
pub fn decode_instruction(memory: &MemoryRegion, address: usize) -> Result<Instruction> {
    let mut cursor = Cursor::new(memory, address);
    let opcode = cursor.next();

    let (operation, operands, wide) = match opcode {
        // register/memory to/from register
        0x00..=0x03 | 0x28..=0x2b | 0x38..=0x3b | 0x88..=0x8b => {
            let operation = match opcode & 0b1111_1100 {
                0x00 => Operation::Add,
                0x28 => Operation::Sub,
                0x38 => Operation::Cmp,
                _ => Operation::Mov,
            };
            let wide = opcode & 0b01 != 0;
            let to_register = opcode & 0b10 != 0;
            let modrm = cursor.next();
            let register = register_operand(modrm >> 3, wide);
            let rm = modrm_operand(&mut cursor, modrm, wide);
            let operands = if to_register {
                [register, rm]
            } else {
                [rm, register]
            };

            (operation, operands, wide)
        }
        // immediate to accumulator arithmetic
        0x04 | 0x05 | 0x2c | 0x2d | 0x3c | 0x3d => {
            let operation = match opcode & 0b1111_1100 {
                0x04 => Operation::Add,
                0x2c => Operation::Sub,
                _ => Operation::Cmp,
            };
            let wide = opcode & 0b01 != 0;
            let accumulator = register_operand(0b000, wide);
            let value = if wide {
                cursor.next_word()
            } else {
                cursor.next() as u16
            };

            (operation, [accumulator, Operand::Immediate(value)], wide)
        }
        // conditional jumps, signed 8 bit displacement
        0x70..=0x7f => {
            let operation = CONDITIONAL_JUMPS[(opcode & 0x0f) as usize];
            let offset = cursor.next() as i8 as i16 as u16;

            (operation, [Operand::Immediate(offset), Operand::None], true)
        }
        // immediate to register/memory arithmetic group
        0x80 | 0x81 | 0x83 => {
            let wide = opcode & 0b01 != 0;
            let modrm = cursor.next();
            let operation = match modrm >> 3 & 0b111 {
                0b000 => Operation::Add,
                0b101 => Operation::Sub,
                0b111 => Operation::Cmp,
                _ => return Err(DecodeError::UnknownOpcode { address, opcode }),
            };
            let rm = modrm_operand(&mut cursor, modrm, wide);
            let value = match opcode {
                0x81 => cursor.next_word(),
                // 8 bit immediate sign-extended to 16 bits
                0x83 => cursor.next() as i8 as i16 as u16,
                _ => cursor.next() as u16,
            };

            (operation, [rm, Operand::Immediate(value)], wide)
        }
        // memory to/from accumulator, direct address
        0xa0..=0xa3 => {
            let wide = opcode & 0b01 != 0;
            let displacement = cursor.next_word() as i32;
            let memory_operand = Operand::Memory(EffectiveAddress::direct(displacement));
            let accumulator = register_operand(0b000, wide);
            let operands = if opcode & 0b10 == 0 {
                [accumulator, memory_operand]
            } else {
                [memory_operand, accumulator]
            };

            (Operation::Mov, operands, wide)
        }
        // immediate to register mov
        0xb0..=0xbf => {
            let wide = opcode & 0b1000 != 0;
            let register = register_operand(opcode, wide);
            let value = if wide {
                cursor.next_word()
            } else {
                cursor.next() as u16
            };

            (Operation::Mov, [register, Operand::Immediate(value)], wide)
        }
        // immediate to register/memory mov
        0xc6 | 0xc7 => {
            let wide = opcode == 0xc7;
            let modrm = cursor.next();
            if modrm >> 3 & 0b111 != 0b000 {
                return Err(DecodeError::UnknownOpcode { address, opcode });
            }
            let rm = modrm_operand(&mut cursor, modrm, wide);
            let value = if wide {
                cursor.next_word()
            } else {
                cursor.next() as u16
            };

            (Operation::Mov, [rm, Operand::Immediate(value)], wide)
        }
        // loop family, signed 8 bit displacement
        0xe0..=0xe3 => {
            let operation = LOOP_OPERATIONS[(opcode & 0b11) as usize];
            let offset = cursor.next() as i8 as i16 as u16;

            (operation, [Operand::Immediate(offset), Operand::None], true)
        }
        _ => return Err(DecodeError::UnknownOpcode { address, opcode }),
    };

    Ok(Instruction {
        address,
        operation,
        operands,
        wide,
        length: cursor.bytes.len(),
        bytes: cursor.bytes,
    })
}
