//! Opcode decoding.
//!
//! The 8080 encodes most instructions with register and condition fields in
//! fixed bit positions, so [`decode`] works class by class on those fields
//! rather than listing 256 cases. [`DECODE`] is the resulting lookup table,
//! built at compile time.
//!
//! Undocumented encodings are kept as the silicon defines them: `$08`,
//! `$10`, `$18`, `$20`, `$28`, `$30` and `$38` are NOP and `$D9` is RET.
//! `$CB`, `$DD`, `$ED` and `$FD` decode to [`Instruction::Unknown`].

use crate::Flags;

/// An 8-bit operand: one of the seven byte registers or `M`, the memory cell
/// addressed by HL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    B,
    C,
    D,
    E,
    H,
    L,
    M,
    A,
}

impl Reg {
    /// Decode a 3-bit register field.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Reg::B,
            1 => Reg::C,
            2 => Reg::D,
            3 => Reg::E,
            4 => Reg::H,
            5 => Reg::L,
            6 => Reg::M,
            _ => Reg::A,
        }
    }
}

/// A register pair operand for 16-bit loads and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pair {
    BC,
    DE,
    HL,
    SP,
}

impl Pair {
    /// Decode the 2-bit pair field (bits 4-5 of the opcode).
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Pair::BC,
            1 => Pair::DE,
            2 => Pair::HL,
            _ => Pair::SP,
        }
    }
}

/// A register pair operand for PUSH and POP, where SP's encoding means PSW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackPair {
    BC,
    DE,
    HL,
    PSW,
}

impl StackPair {
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => StackPair::BC,
            1 => StackPair::DE,
            2 => StackPair::HL,
            _ => StackPair::PSW,
        }
    }
}

/// Branch condition for conditional jumps, calls and returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    /// Decode the 3-bit condition field (bits 3-5 of the opcode).
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }

    #[must_use]
    pub const fn holds(self, flags: Flags) -> bool {
        match self {
            Condition::NotZero => !flags.zero,
            Condition::Zero => flags.zero,
            Condition::NoCarry => !flags.carry,
            Condition::Carry => flags.carry,
            Condition::ParityOdd => !flags.parity,
            Condition::ParityEven => flags.parity,
            Condition::Plus => !flags.sign,
            Condition::Minus => flags.sign,
        }
    }
}

/// Accumulator operation shared by the register and immediate ALU groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            _ => AluOp::Cmp,
        }
    }
}

/// Accumulator rotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotate {
    /// Rotate left, bit 7 into carry and bit 0.
    Rlc,
    /// Rotate right, bit 0 into carry and bit 7.
    Rrc,
    /// Rotate left through carry.
    Ral,
    /// Rotate right through carry.
    Rar,
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Nop,
    Hlt,
    /// MOV dst, src
    Mov(Reg, Reg),
    /// MVI dst, d8
    Mvi(Reg),
    /// LXI rp, d16
    Lxi(Pair),
    /// LDAX rp (BC or DE)
    Ldax(Pair),
    /// STAX rp (BC or DE)
    Stax(Pair),
    Lda,
    Sta,
    Lhld,
    Shld,
    Xthl,
    Xchg,
    Pchl,
    Sphl,
    /// ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP with a register or M
    Alu(AluOp, Reg),
    /// ADI/ACI/SUI/SBI/ANI/XRI/ORI/CPI
    AluImm(AluOp),
    Dad(Pair),
    Inr(Reg),
    Dcr(Reg),
    Inx(Pair),
    Dcx(Pair),
    Daa,
    Cma,
    Stc,
    Cmc,
    Rotate(Rotate),
    Jmp,
    Jcc(Condition),
    Call,
    Ccc(Condition),
    Ret,
    Rcc(Condition),
    /// RST n, a call to `n * 8`
    Rst(u8),
    Push(StackPair),
    Pop(StackPair),
    Ei,
    Di,
    In,
    Out,
    Unknown,
}

impl Instruction {
    /// Instruction length in bytes, opcode included.
    #[must_use]
    pub const fn len(self) -> u16 {
        match self {
            Instruction::Mvi(_) | Instruction::AluImm(_) | Instruction::In | Instruction::Out => 2,
            Instruction::Lxi(_)
            | Instruction::Lda
            | Instruction::Sta
            | Instruction::Lhld
            | Instruction::Shld
            | Instruction::Jmp
            | Instruction::Jcc(_)
            | Instruction::Call
            | Instruction::Ccc(_) => 3,
            _ => 1,
        }
    }
}

/// Decode one opcode byte.
#[must_use]
pub const fn decode(opcode: u8) -> Instruction {
    let pair = Pair::from_bits(opcode >> 4);
    let dst = Reg::from_bits(opcode >> 3);
    let src = Reg::from_bits(opcode);
    let cond = Condition::from_bits(opcode >> 3);

    match opcode {
        // $00-$3F: loads, 16-bit arithmetic, INR/DCR/MVI, rotates, misc
        0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => Instruction::Nop,
        0x01 | 0x11 | 0x21 | 0x31 => Instruction::Lxi(pair),
        0x02 | 0x12 => Instruction::Stax(pair),
        0x0A | 0x1A => Instruction::Ldax(pair),
        0x22 => Instruction::Shld,
        0x2A => Instruction::Lhld,
        0x32 => Instruction::Sta,
        0x3A => Instruction::Lda,
        0x03 | 0x13 | 0x23 | 0x33 => Instruction::Inx(pair),
        0x0B | 0x1B | 0x2B | 0x3B => Instruction::Dcx(pair),
        0x09 | 0x19 | 0x29 | 0x39 => Instruction::Dad(pair),
        0x07 => Instruction::Rotate(Rotate::Rlc),
        0x0F => Instruction::Rotate(Rotate::Rrc),
        0x17 => Instruction::Rotate(Rotate::Ral),
        0x1F => Instruction::Rotate(Rotate::Rar),
        0x27 => Instruction::Daa,
        0x2F => Instruction::Cma,
        0x37 => Instruction::Stc,
        0x3F => Instruction::Cmc,
        0x00..=0x3F if opcode & 7 == 4 => Instruction::Inr(dst),
        0x00..=0x3F if opcode & 7 == 5 => Instruction::Dcr(dst),
        0x00..=0x3F if opcode & 7 == 6 => Instruction::Mvi(dst),

        // $40-$7F: register moves; MOV M,M is HLT
        0x76 => Instruction::Hlt,
        0x40..=0x7F => Instruction::Mov(dst, src),

        // $80-$BF: accumulator arithmetic and logic
        0x80..=0xBF => Instruction::Alu(AluOp::from_bits(opcode >> 3), src),

        // $C0-$FF: branches, stack, immediates, I/O
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Instruction::Pop(StackPair::from_bits(opcode >> 4)),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Instruction::Push(StackPair::from_bits(opcode >> 4)),
        0xC3 => Instruction::Jmp,
        0xC9 | 0xD9 => Instruction::Ret,
        0xCD => Instruction::Call,
        0xD3 => Instruction::Out,
        0xDB => Instruction::In,
        0xE3 => Instruction::Xthl,
        0xE9 => Instruction::Pchl,
        0xEB => Instruction::Xchg,
        0xF3 => Instruction::Di,
        0xF9 => Instruction::Sphl,
        0xFB => Instruction::Ei,
        0xC0..=0xFF if opcode & 7 == 0 => Instruction::Rcc(cond),
        0xC0..=0xFF if opcode & 7 == 2 => Instruction::Jcc(cond),
        0xC0..=0xFF if opcode & 7 == 4 => Instruction::Ccc(cond),
        0xC0..=0xFF if opcode & 7 == 6 => Instruction::AluImm(AluOp::from_bits(opcode >> 3)),
        0xC0..=0xFF if opcode & 7 == 7 => Instruction::Rst((opcode >> 3) & 7),

        _ => Instruction::Unknown,
    }
}

/// Decoded form of every opcode, indexed by opcode byte.
pub static DECODE: [Instruction; 256] = {
    let mut table = [Instruction::Unknown; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode(i as u8);
        i += 1;
    }
    table
};
