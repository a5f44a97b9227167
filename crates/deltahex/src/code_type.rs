//! Numeral systems used to enter a byte one digit at a time.

use crate::error::{DeltaError, Result};

/// Numeral system of the code area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeType {
    /// Eight binary digits per byte.
    Binary,
    /// Three octal digits per byte.
    Octal,
    /// Three decimal digits per byte.
    Decimal,
    /// Two hexadecimal digits per byte.
    #[default]
    Hexadecimal,
}

impl CodeType {
    /// Number of digits representing one byte.
    pub fn max_digits(self) -> usize {
        match self {
            Self::Binary => 8,
            Self::Octal | Self::Decimal => 3,
            Self::Hexadecimal => 2,
        }
    }

    /// Radix of the numeral system.
    pub fn base(self) -> u8 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }

    /// Checks that `code_offset` addresses a digit of one byte.
    pub fn check_code_offset(self, code_offset: usize) -> Result<()> {
        if code_offset >= self.max_digits() {
            return Err(DeltaError::InvalidCodeOffset {
                code_offset,
                max_digits: self.max_digits(),
            });
        }
        Ok(())
    }

    /// Checks that `digit` exists in this numeral system.
    pub fn check_digit(self, digit: u8) -> Result<()> {
        if digit >= self.base() {
            return Err(DeltaError::InvalidDigit {
                digit,
                code_type: self,
            });
        }
        Ok(())
    }

    /// Replaces the digit at `code_offset` of `byte` with `digit`.
    ///
    /// Decimal entry can overshoot 255: a hundreds digit that does so yields
    /// 200, a tens or units digit that does so has 200 subtracted. Octal entry
    /// keeps the low eight bits.
    pub fn fold_digit(self, byte: u8, code_offset: usize, digit: u8) -> Result<u8> {
        self.check_code_offset(code_offset)?;
        self.check_digit(digit)?;

        let old = u32::from(byte);
        let digit = u32::from(digit);
        let folded = match self {
            Self::Binary => {
                let mask = 0x80u32 >> code_offset;
                (old & !mask) | (digit << (7 - code_offset))
            }
            Self::Hexadecimal => {
                if code_offset == 0 {
                    (old & 0x0f) | (digit << 4)
                } else {
                    (old & 0xf0) | digit
                }
            }
            Self::Decimal => match code_offset {
                0 => {
                    let value = old % 100 + digit * 100;
                    if value > 255 { 200 } else { value }
                }
                1 => {
                    let value = old / 100 * 100 + digit * 10 + old % 10;
                    if value > 255 { value - 200 } else { value }
                }
                _ => {
                    let value = old / 10 * 10 + digit;
                    if value > 255 { value - 200 } else { value }
                }
            },
            Self::Octal => match code_offset {
                0 => old % 64 + digit * 64,
                1 => old / 64 * 64 + digit * 8 + old % 8,
                _ => old / 8 * 8 + digit,
            },
        };

        Ok((folded & 0xff) as u8)
    }
}
