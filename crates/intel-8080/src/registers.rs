//! 8080 register file.

/// A 16-bit register pair (BC, DE or HL).
///
/// One canonical 16-bit value; the high and low byte registers are views of
/// it, so a write through either view is immediately visible through the
/// other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegisterPair(u16);

impl RegisterPair {
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    pub fn set(&mut self, value: u16) {
        self.0 = value;
    }

    /// The first-named register of the pair (B, D or H).
    #[must_use]
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// The second-named register of the pair (C, E or L).
    #[must_use]
    pub const fn low(self) -> u8 {
        self.0 as u8
    }

    pub fn set_high(&mut self, value: u8) {
        self.0 = (u16::from(value) << 8) | (self.0 & 0x00FF);
    }

    pub fn set_low(&mut self, value: u8) {
        self.0 = (self.0 & 0xFF00) | u16::from(value);
    }
}

impl From<u16> for RegisterPair {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// 8080 registers. Flags live separately in [`crate::Flags`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub bc: RegisterPair,
    pub de: RegisterPair,
    pub hl: RegisterPair,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[must_use]
    pub const fn b(&self) -> u8 {
        self.bc.high()
    }

    #[must_use]
    pub const fn c(&self) -> u8 {
        self.bc.low()
    }

    #[must_use]
    pub const fn d(&self) -> u8 {
        self.de.high()
    }

    #[must_use]
    pub const fn e(&self) -> u8 {
        self.de.low()
    }

    #[must_use]
    pub const fn h(&self) -> u8 {
        self.hl.high()
    }

    #[must_use]
    pub const fn l(&self) -> u8 {
        self.hl.low()
    }
}
