use std::error;
use std::fmt;

use crate::memory::MemoryRegion;
use crate::registers::{RegisterAccess, RegisterFile, WordRegister};

pub type Result<T> = std::result::Result<T, ResolutionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionError {
    MissingOperand,
    ImmediateDestination(u16),
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ResolutionError::MissingOperand => {
                write!(f, "operation requires an operand the decoder did not produce")
            }
            ResolutionError::ImmediateDestination(value) => {
                write!(f, "write attempted on immediate value 0x{:04x}", value)
            }
        }
    }
}

impl error::Error for ResolutionError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// One scaled register term of a memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTerm {
    pub register: WordRegister,
    pub scale: u16,
}

/*
 * A memory operand: up to two scaled register terms plus a fixed
 * displacement. The terms fold left to right with the scale applied to
 * the accumulated sum, not per term:
 *
 *     address = (((r1) * s1) + r2) * s2 + displacement
 *
 * The real instruction encodings only ever carry a scale of 1 so both
 * orderings agree in practice, but the accumulate-then-scale order is
 * what the original simulator computes and is kept bit for bit.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveAddress {
    pub terms: [Option<AddressTerm>; 2],
    pub displacement: i32,
}

impl EffectiveAddress {
    pub fn direct(displacement: i32) -> EffectiveAddress {
        EffectiveAddress {
            terms: [None, None],
            displacement,
        }
    }

    pub fn compute(&self, registers: &RegisterFile, memory: &MemoryRegion) -> usize {
        let mut address: i32 = 0;

        for term in self.terms.iter().flatten() {
            address = (address + registers.read_word(term.register) as i32) * term.scale as i32;
        }
        address += self.displacement;

        memory.absolute(address as u32 as usize)
    }
}

impl fmt::Display for EffectiveAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .terms
            .iter()
            .flatten()
            .map(|term| {
                if term.scale == 1 {
                    term.register.to_string()
                } else {
                    format!("{}*{}", term.register, term.scale)
                }
            })
            .collect();

        if terms.is_empty() {
            return write!(f, "[{}]", self.displacement);
        }

        let mut text = terms.join(" + ");
        if self.displacement > 0 {
            text = format!("{} + {}", text, self.displacement);
        } else if self.displacement < 0 {
            text = format!("{} - {}", text, -self.displacement);
        }

        write!(f, "[{}]", text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Register(RegisterAccess),
    Memory(EffectiveAddress),
    Immediate(u16),
}

impl Operand {
    /// Turn the operand into a concrete read/write location. Memory
    /// operands get their effective address computed and masked here.
    pub fn resolve(&self, registers: &RegisterFile, memory: &MemoryRegion) -> Result<Location> {
        match *self {
            Operand::None => Err(ResolutionError::MissingOperand),
            Operand::Register(access) => Ok(Location::Register(access)),
            Operand::Memory(address) => Ok(Location::Memory(address.compute(registers, memory))),
            Operand::Immediate(value) => Ok(Location::Immediate(value)),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operand::None => Ok(()),
            Operand::Register(access) => write!(f, "{}", access),
            Operand::Memory(address) => write!(f, "{}", address),
            Operand::Immediate(value) => write!(f, "{}", value),
        }
    }
}

/*
 * Location
 * The uniform view every opcode handler reads and writes through: a
 * register byte range, a masked absolute memory address, or an immediate
 * value. Immediates read like any other location but reject writes.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Register(RegisterAccess),
    Memory(usize),
    Immediate(u16),
}

impl Location {
    pub fn read(&self, wide: bool, registers: &RegisterFile, memory: &MemoryRegion) -> u16 {
        match *self {
            Location::Register(access) => access.read(registers),
            Location::Memory(address) => {
                if wide {
                    memory.read_word(address)
                } else {
                    memory.read_byte(address) as u16
                }
            }
            Location::Immediate(value) => {
                if wide {
                    value
                } else {
                    value & 0x00ff
                }
            }
        }
    }

    pub fn write(
        &self,
        wide: bool,
        value: u16,
        registers: &mut RegisterFile,
        memory: &mut MemoryRegion,
    ) -> Result<()> {
        match *self {
            Location::Register(access) => {
                access.write(registers, value);
                Ok(())
            }
            Location::Memory(address) => {
                if wide {
                    memory.write_word(address, value);
                } else {
                    memory.write(address, &[value as u8]);
                }
                Ok(())
            }
            Location::Immediate(immediate) => Err(ResolutionError::ImmediateDestination(immediate)),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Location::Register(access) => write!(f, "{}", access),
            Location::Memory(address) => write!(f, "#0x{:05X}", address),
            Location::Immediate(value) => write!(f, "0x{:04x}", value),
        }
    }
}
