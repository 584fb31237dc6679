use std::fmt;

use crate::flags::Flags;

/*
 * 16 bit register file.
 *
 * ax, bx, cx and dx are general purpose registers whose low and high
 * bytes are independently addressable; the pointer, index and segment
 * registers are word-only. The split is carried by the types: a byte
 * half access can only name a GeneralRegister, so an invalid byte access
 * on a word-only register cannot be expressed at all.
 *
 * The word and its two byte halves are three aliases over the same two
 * bytes of storage, a byte write never disturbs the sibling half.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralRegister {
    Ax,
    Bx,
    Cx,
    Dx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteHalf {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordRegister {
    General(GeneralRegister),
    Sp,
    Bp,
    Si,
    Di,
    Es,
    Cs,
    Ss,
    Ds,
    Ip,
    Flags,
}

/// A register operand as the decoder names it: either a full word or
/// one byte half of a general purpose register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterAccess {
    Word(WordRegister),
    Byte(GeneralRegister, ByteHalf),
}

impl RegisterAccess {
    pub fn read(&self, registers: &RegisterFile) -> u16 {
        match *self {
            RegisterAccess::Word(register) => registers.read_word(register),
            RegisterAccess::Byte(register, half) => registers.read_byte(register, half) as u16,
        }
    }

    pub fn write(&self, registers: &mut RegisterFile, value: u16) {
        match *self {
            RegisterAccess::Word(register) => registers.write_word(register, value),
            RegisterAccess::Byte(register, half) => {
                registers.write_byte(register, half, value as u8)
            }
        }
    }
}

pub const REGISTER_COUNT: usize = 14;

/// Registers in display order for the final state report, flags excluded.
pub const PRINTABLE_REGISTERS: [WordRegister; 13] = [
    WordRegister::General(GeneralRegister::Ax),
    WordRegister::General(GeneralRegister::Bx),
    WordRegister::General(GeneralRegister::Cx),
    WordRegister::General(GeneralRegister::Dx),
    WordRegister::Sp,
    WordRegister::Bp,
    WordRegister::Si,
    WordRegister::Di,
    WordRegister::Es,
    WordRegister::Cs,
    WordRegister::Ss,
    WordRegister::Ds,
    WordRegister::Ip,
];

fn slot(register: WordRegister) -> usize {
    match register {
        WordRegister::General(GeneralRegister::Ax) => 0,
        WordRegister::General(GeneralRegister::Bx) => 1,
        WordRegister::General(GeneralRegister::Cx) => 2,
        WordRegister::General(GeneralRegister::Dx) => 3,
        WordRegister::Sp => 4,
        WordRegister::Bp => 5,
        WordRegister::Si => 6,
        WordRegister::Di => 7,
        WordRegister::Es => 8,
        WordRegister::Cs => 9,
        WordRegister::Ss => 10,
        WordRegister::Ds => 11,
        WordRegister::Ip => 12,
        WordRegister::Flags => 13,
    }
}

pub struct RegisterFile {
    words: [u16; REGISTER_COUNT],
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        RegisterFile {
            words: [0x0000; REGISTER_COUNT],
        }
    }

    pub fn read_word(&self, register: WordRegister) -> u16 {
        self.words[slot(register)]
    }

    pub fn write_word(&mut self, register: WordRegister, value: u16) {
        self.words[slot(register)] = value;
    }

    pub fn read_byte(&self, register: GeneralRegister, half: ByteHalf) -> u8 {
        let word = self.read_word(WordRegister::General(register));

        match half {
            ByteHalf::Low => word as u8,
            ByteHalf::High => (word >> 8) as u8,
        }
    }

    pub fn write_byte(&mut self, register: GeneralRegister, half: ByteHalf, value: u8) {
        let word = &mut self.words[slot(WordRegister::General(register))];

        *word = match half {
            ByteHalf::Low => (*word & 0xff00) | value as u16,
            ByteHalf::High => (*word & 0x00ff) | (value as u16) << 8,
        };
    }

    pub fn flags(&self) -> Flags {
        Flags::from_word(self.read_word(WordRegister::Flags))
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.write_word(WordRegister::Flags, flags.to_word());
    }

    /// Add a signed relative branch offset (carried as a two's complement
    /// word) to the instruction pointer.
    pub fn jump_relative(&mut self, offset: u16) {
        let pointer = self.read_word(WordRegister::Ip).wrapping_add(offset);
        self.write_word(WordRegister::Ip, pointer);
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Registers [ax:0x{:04x} bx:0x{:04x} cx:0x{:04x} dx:0x{:04x} | ip:0x{:04x} | {}]",
            self.read_word(WordRegister::General(GeneralRegister::Ax)),
            self.read_word(WordRegister::General(GeneralRegister::Bx)),
            self.read_word(WordRegister::General(GeneralRegister::Cx)),
            self.read_word(WordRegister::General(GeneralRegister::Dx)),
            self.read_word(WordRegister::Ip),
            self.flags(),
        )
    }
}

impl fmt::Display for GeneralRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            GeneralRegister::Ax => "ax",
            GeneralRegister::Bx => "bx",
            GeneralRegister::Cx => "cx",
            GeneralRegister::Dx => "dx",
        };

        write!(f, "{}", name)
    }
}

impl fmt::Display for WordRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            WordRegister::General(register) => write!(f, "{}", register),
            WordRegister::Sp => write!(f, "sp"),
            WordRegister::Bp => write!(f, "bp"),
            WordRegister::Si => write!(f, "si"),
            WordRegister::Di => write!(f, "di"),
            WordRegister::Es => write!(f, "es"),
            WordRegister::Cs => write!(f, "cs"),
            WordRegister::Ss => write!(f, "ss"),
            WordRegister::Ds => write!(f, "ds"),
            WordRegister::Ip => write!(f, "ip"),
            WordRegister::Flags => write!(f, "flags"),
        }
    }
}

impl fmt::Display for RegisterAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte_name = |register, half| match (register, half) {
            (GeneralRegister::Ax, ByteHalf::Low) => "al",
            (GeneralRegister::Ax, ByteHalf::High) => "ah",
            (GeneralRegister::Bx, ByteHalf::Low) => "bl",
            (GeneralRegister::Bx, ByteHalf::High) => "bh",
            (GeneralRegister::Cx, ByteHalf::Low) => "cl",
            (GeneralRegister::Cx, ByteHalf::High) => "ch",
            (GeneralRegister::Dx, ByteHalf::Low) => "dl",
            (GeneralRegister::Dx, ByteHalf::High) => "dh",
        };

        match *self {
            RegisterAccess::Word(register) => write!(f, "{}", register),
            RegisterAccess::Byte(register, half) => write!(f, "{}", byte_name(register, half)),
        }
    }
}
