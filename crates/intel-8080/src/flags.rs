//! 8080 condition flags and the processor status word.

/// ZSP table bit: result is zero.
pub const ZSP_ZERO: u8 = 0b001;

/// ZSP table bit: bit 7 of the result is set.
pub const ZSP_SIGN: u8 = 0b010;

/// ZSP table bit: the result has an even number of set bits.
pub const ZSP_PARITY: u8 = 0b100;

/// Zero/sign/parity of every byte, computed at compile time.
pub static ZSP: [u8; 256] = build_zsp();

const fn build_zsp() -> [u8; 256] {
    let mut table = [0; 256];
    let mut i = 0;
    while i < 256 {
        let value = i as u8;
        let mut entry = 0;
        if value == 0 {
            entry |= ZSP_ZERO;
        }
        if value & 0x80 != 0 {
            entry |= ZSP_SIGN;
        }
        if value.count_ones().is_multiple_of(2) {
            entry |= ZSP_PARITY;
        }
        table[i] = entry;
        i += 1;
    }
    table
}

// PSW flag byte layout. Bits 1, 3 and 5 are fixed by the hardware.
const PSW_CARRY: u8 = 0b0000_0001;
const PSW_ALWAYS_SET: u8 = 0b0000_0010;
const PSW_PARITY: u8 = 0b0000_0100;
const PSW_AUX_CARRY: u8 = 0b0001_0000;
const PSW_ZERO: u8 = 0b0100_0000;
const PSW_SIGN: u8 = 0b1000_0000;

/// The five 8080 condition flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub zero: bool,
    pub sign: bool,
    pub parity: bool,
    pub carry: bool,
    pub aux_carry: bool,
}

impl Flags {
    /// Set zero, sign and parity from a result byte.
    pub fn set_zsp(&mut self, value: u8) {
        let entry = ZSP[usize::from(value)];
        self.zero = entry & ZSP_ZERO != 0;
        self.sign = entry & ZSP_SIGN != 0;
        self.parity = entry & ZSP_PARITY != 0;
    }

    /// Pack into the low byte of the processor status word.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mut byte = PSW_ALWAYS_SET;
        if self.carry {
            byte |= PSW_CARRY;
        }
        if self.parity {
            byte |= PSW_PARITY;
        }
        if self.aux_carry {
            byte |= PSW_AUX_CARRY;
        }
        if self.zero {
            byte |= PSW_ZERO;
        }
        if self.sign {
            byte |= PSW_SIGN;
        }
        byte
    }

    /// Unpack the flag bits of a status byte. The fixed bits are ignored.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            zero: byte & PSW_ZERO != 0,
            sign: byte & PSW_SIGN != 0,
            parity: byte & PSW_PARITY != 0,
            carry: byte & PSW_CARRY != 0,
            aux_carry: byte & PSW_AUX_CARRY != 0,
        }
    }
}
