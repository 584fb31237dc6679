use std::fmt;

/*
 * Arithmetic condition flags, stored in the dedicated flags register slot.
 * Bit positions follow the legacy layout:
 * bit 2: Parity flag (even number of set bits in the low byte of the result)
 * bit 6: Zero flag
 * bit 7: Sign flag (bit 15 of the 16 bit result)
 *
 * Only add, sub and cmp touch these; mov and the jumps leave them alone.
 */
const PARITY_FLAG: u16 = 0b0000_0100;
const ZERO_FLAG: u16 = 0b0100_0000;
const SIGN_FLAG: u16 = 0b1000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u16);

impl Flags {
    pub fn from_word(word: u16) -> Flags {
        Flags(word & (PARITY_FLAG | ZERO_FLAG | SIGN_FLAG))
    }

    pub fn to_word(self) -> u16 {
        self.0
    }

    /// Derive the flag set from the truncated 16 bit result of an
    /// arithmetic operation. Byte wide operations also go through here,
    /// the result word is what the flags are computed from.
    pub fn from_result(result: u16) -> Flags {
        let mut word: u16 = 0;

        if (result & 0x00ff).count_ones() % 2 == 0 {
            word |= PARITY_FLAG;
        }
        if result == 0 {
            word |= ZERO_FLAG;
        }
        if result & 0x8000 != 0 {
            word |= SIGN_FLAG;
        }

        Flags(word)
    }

    pub fn parity(&self) -> bool {
        self.0 & PARITY_FLAG == PARITY_FLAG
    }

    pub fn zero(&self) -> bool {
        self.0 & ZERO_FLAG == ZERO_FLAG
    }

    pub fn sign(&self) -> bool {
        self.0 & SIGN_FLAG == SIGN_FLAG
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parity() {
            write!(f, "P")?;
        }
        if self.zero() {
            write!(f, "Z")?;
        }
        if self.sign() {
            write!(f, "S")?;
        }

        Ok(())
    }
}

/// Format a flag transition for the trace, `None` when nothing changed.
pub fn delta(before: Flags, after: Flags) -> Option<String> {
    if before == after {
        None
    } else {
        Some(format!("{}->{}", before, after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_result() {
        let flags = Flags::from_result(0x0000);
        assert!(flags.zero());
        assert!(!flags.sign());
        // zero set bits in the low byte is an even count
        assert!(flags.parity());
    }

    #[test]
    fn test_sign_result() {
        let flags = Flags::from_result(0x8000);
        assert!(!flags.zero());
        assert!(flags.sign());
        assert!(flags.parity());
    }

    #[test]
    fn test_parity_counts_low_byte_only() {
        // 0x0101 has one set bit in the low byte, odd → parity clear
        assert!(!Flags::from_result(0x0101).parity());
        // 0x0103 has two set bits in the low byte, even → parity set
        assert!(Flags::from_result(0x0103).parity());
        // high byte bits do not contribute
        assert!(Flags::from_result(0xff00).parity());
    }

    #[test]
    fn test_format_set_letters() {
        assert_eq!("PZ".to_owned(), format!("{}", Flags::from_result(0x0000)));
        assert_eq!("PS".to_owned(), format!("{}", Flags::from_result(0x8000)));
        assert_eq!("".to_owned(), format!("{}", Flags::from_result(0x0001)));
    }

    #[test]
    fn test_delta() {
        let before = Flags::from_result(0x0001);
        let after = Flags::from_result(0x0000);
        assert_eq!(Some("->PZ".to_owned()), delta(before, after));
        assert_eq!(None, delta(after, after));
    }

    #[test]
    fn test_word_round_trip_masks_unrelated_bits() {
        let flags = Flags::from_word(0xffff);
        assert!(flags.parity() && flags.zero() && flags.sign());
        assert_eq!(0b1100_0100, flags.to_word());
    }
}
