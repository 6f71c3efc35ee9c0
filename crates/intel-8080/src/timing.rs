//! Instruction timing in machine cycles.

/// Base cycle cost of each opcode, indexed by opcode byte.
///
/// Conditional calls and returns are listed at their not-taken cost and pay
/// [`BRANCH_TAKEN_PENALTY`] on top when the condition holds. Undefined
/// opcodes still cost their table entry.
#[rustfmt::skip]
pub static CYCLES: [u8; 256] = [
//  x0  x1  x2  x3  x4  x5  x6  x7  x8  x9  xA  xB  xC  xD  xE  xF
     4, 10,  7,  5,  5,  5,  7,  4,  4, 10,  7,  5,  5,  5,  7,  4, // 0x
     4, 10,  7,  5,  5,  5,  7,  4,  4, 10,  7,  5,  5,  5,  7,  4, // 1x
     4, 10, 16,  5,  5,  5,  7,  4,  4, 10, 16,  5,  5,  5,  7,  4, // 2x
     4, 10, 13,  5, 10, 10, 10,  4,  4, 10, 13,  5,  5,  5,  7,  4, // 3x
     5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5, // 4x
     5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5, // 5x
     5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5, // 6x
     7,  7,  7,  7,  7,  7,  7,  7,  5,  5,  5,  5,  5,  5,  7,  5, // 7x
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // 8x
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // 9x
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // Ax
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // Bx
     5, 10, 10, 10, 11, 11,  7, 11,  5, 10, 10, 10, 11, 11,  7, 11, // Cx
     5, 10, 10, 10, 11, 11,  7, 11,  5, 10, 10, 10, 11, 11,  7, 11, // Dx
     5, 10, 10, 18, 11, 11,  7, 11,  5,  5, 10,  5, 11, 11,  7, 11, // Ex
     5, 10, 10,  4, 11, 11,  7, 11,  5,  5, 10,  4, 11, 11,  7, 11, // Fx
];

/// Extra cycles charged when a conditional call or return is taken.
pub const BRANCH_TAKEN_PENALTY: u8 = 6;

/// Base cost of `opcode`.
#[must_use]
pub fn base_cycles(opcode: u8) -> u8 {
    CYCLES[usize::from(opcode)]
}
