//! Flag computation for 8080 arithmetic.
//!
//! Every arithmetic instruction funnels through [`Flags::update_add`].
//! Subtraction is two's-complement addition with the carry inverted
//! afterwards, which is how the 8080 reports a borrow.

use crate::Flags;

/// Which carry flags an addition updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryMode {
    /// Clear carry and auxiliary carry (logical operations).
    Clear,
    /// Compute both from the addition.
    Both,
    /// Compute carry only.
    CarryOnly,
    /// Compute auxiliary carry only; carry is left alone (INR, DCR, DAA).
    AuxOnly,
}

/// Carry out of bit `bit - 1` when adding `a + b + carry_in`.
///
/// The bits where the sum differs from `a ^ b` are exactly the bits that
/// received a carry, so `bit = 8` gives the carry and `bit = 4` the
/// auxiliary (nibble) carry. `bit` must be below 16.
#[must_use]
pub const fn carry_out(a: u8, b: u8, carry_in: u8, bit: u8) -> bool {
    debug_assert!(bit < 16, "carry position out of range");
    let result = a as u16 + b as u16 + carry_in as u16;
    let changed = result ^ a as u16 ^ b as u16;
    changed & (1 << bit) != 0
}

impl Flags {
    /// Flags for `a + b + carry_in`.
    pub fn update_add(&mut self, a: u8, b: u8, carry_in: u8, mode: CarryMode) {
        match mode {
            CarryMode::Clear => {
                self.carry = false;
                self.aux_carry = false;
            }
            CarryMode::Both => {
                self.carry = carry_out(a, b, carry_in, 8);
                self.aux_carry = carry_out(a, b, carry_in, 4);
            }
            CarryMode::CarryOnly => self.carry = carry_out(a, b, carry_in, 8),
            CarryMode::AuxOnly => self.aux_carry = carry_out(a, b, carry_in, 4),
        }
        self.set_zsp(a.wrapping_add(b).wrapping_add(carry_in));
    }

    /// Flags for `a - b - borrow_in`, computed as `a + !b + !borrow_in`.
    ///
    /// Only [`CarryMode::Both`] inverts the resulting carry into a borrow.
    pub fn update_sub(&mut self, a: u8, b: u8, borrow_in: bool, mode: CarryMode) {
        self.update_add(a, !b, u8::from(!borrow_in), mode);
        if mode == CarryMode::Both {
            self.carry = !self.carry;
        }
    }

    /// Flags for `a & b`. The 8080 sets auxiliary carry from bit 3 of the
    /// operands' OR.
    pub fn update_and(&mut self, a: u8, b: u8) {
        self.carry = false;
        self.aux_carry = (a | b) & 0x08 != 0;
        self.set_zsp(a & b);
    }

    /// Decimal-adjust the accumulator after a BCD addition.
    ///
    /// Returns the adjusted accumulator. Carry is only ever set here, never
    /// cleared.
    pub fn decimal_adjust(&mut self, a: u8) -> u8 {
        let low = a & 0x0F;
        let high = a >> 4;
        let mut adjust = 0;
        if low > 9 || self.aux_carry {
            adjust += 0x06;
        }
        if (high >= 9 && low > 9) || high > 9 || self.carry {
            adjust += 0x60;
            self.carry = true;
        }
        self.update_add(a, adjust, 0, CarryMode::AuxOnly);
        a.wrapping_add(adjust)
    }
}
