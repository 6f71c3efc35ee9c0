//! Instruction execution.

use std::io::Write;

use emu_core::Bus;
use tracing::warn;

use super::I8080;
use crate::timing::{BRANCH_TAKEN_PENALTY, base_cycles};
use crate::{AluOp, CarryMode, DECODE, Instruction, Pair, Reg, Rotate, StackPair};

impl<W: Write> I8080<W> {
    /// Execute an opcode whose byte has already been fetched.
    ///
    /// Operand bytes are read from PC onwards. Returns the cycles charged,
    /// which have also been added to the clock count.
    pub fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        self.instruction_count += 1;
        let mut cycles = u32::from(base_cycles(opcode));

        match DECODE[usize::from(opcode)] {
            Instruction::Nop => {}
            Instruction::Hlt => self.halted = true,

            // Data transfer
            Instruction::Mov(dst, src) => {
                let value = self.read_reg(bus, src);
                self.write_reg(bus, dst, value);
            }
            Instruction::Mvi(dst) => {
                let value = self.fetch_byte(bus);
                self.write_reg(bus, dst, value);
            }
            Instruction::Lxi(pair) => {
                let value = self.fetch_word(bus);
                self.set_pair(pair, value);
            }
            Instruction::Ldax(pair) => self.regs.a = bus.read(self.pair(pair)),
            Instruction::Stax(pair) => bus.write(self.pair(pair), self.regs.a),
            Instruction::Lda => {
                let addr = self.fetch_word(bus);
                self.regs.a = bus.read(addr);
            }
            Instruction::Sta => {
                let addr = self.fetch_word(bus);
                bus.write(addr, self.regs.a);
            }
            Instruction::Lhld => {
                let addr = self.fetch_word(bus);
                let value = bus.read_word(addr);
                self.regs.hl.set(value);
            }
            Instruction::Shld => {
                let addr = self.fetch_word(bus);
                bus.write_word(addr, self.regs.hl.get());
            }
            Instruction::Xthl => {
                let top = bus.read_word(self.regs.sp);
                bus.write_word(self.regs.sp, self.regs.hl.get());
                self.regs.hl.set(top);
            }
            Instruction::Xchg => std::mem::swap(&mut self.regs.de, &mut self.regs.hl),
            Instruction::Pchl => self.regs.pc = self.regs.hl.get(),
            Instruction::Sphl => self.regs.sp = self.regs.hl.get(),

            // Arithmetic and logic
            Instruction::Alu(op, src) => {
                let value = self.read_reg(bus, src);
                self.alu(op, value);
            }
            Instruction::AluImm(op) => {
                let value = self.fetch_byte(bus);
                self.alu(op, value);
            }
            Instruction::Dad(pair) => {
                let (sum, carry) = self.regs.hl.get().overflowing_add(self.pair(pair));
                self.regs.hl.set(sum);
                self.flags.carry = carry;
            }
            Instruction::Inr(reg) => {
                let value = self.read_reg(bus, reg);
                self.flags.update_add(value, 1, 0, CarryMode::AuxOnly);
                self.write_reg(bus, reg, value.wrapping_add(1));
            }
            Instruction::Dcr(reg) => {
                let value = self.read_reg(bus, reg);
                self.flags.update_sub(value, 1, false, CarryMode::AuxOnly);
                self.write_reg(bus, reg, value.wrapping_sub(1));
            }
            Instruction::Inx(pair) => self.set_pair(pair, self.pair(pair).wrapping_add(1)),
            Instruction::Dcx(pair) => self.set_pair(pair, self.pair(pair).wrapping_sub(1)),
            Instruction::Daa => self.regs.a = self.flags.decimal_adjust(self.regs.a),
            Instruction::Cma => self.regs.a = !self.regs.a,
            Instruction::Stc => self.flags.carry = true,
            Instruction::Cmc => self.flags.carry = !self.flags.carry,
            Instruction::Rotate(rotate) => self.rotate(rotate),

            // Branches
            Instruction::Jmp => self.regs.pc = self.fetch_word(bus),
            Instruction::Jcc(cond) => {
                let addr = self.fetch_word(bus);
                if cond.holds(self.flags) {
                    self.regs.pc = addr;
                }
            }
            Instruction::Call => {
                let addr = self.fetch_word(bus);
                self.push(bus, self.regs.pc);
                self.regs.pc = addr;
            }
            Instruction::Ccc(cond) => {
                let addr = self.fetch_word(bus);
                if cond.holds(self.flags) {
                    self.push(bus, self.regs.pc);
                    self.regs.pc = addr;
                    cycles += u32::from(BRANCH_TAKEN_PENALTY);
                }
            }
            Instruction::Ret => self.regs.pc = self.pop(bus),
            Instruction::Rcc(cond) => {
                if cond.holds(self.flags) {
                    self.regs.pc = self.pop(bus);
                    cycles += u32::from(BRANCH_TAKEN_PENALTY);
                }
            }
            Instruction::Rst(n) => {
                self.push(bus, self.regs.pc);
                self.regs.pc = u16::from(n) * 8;
            }

            // Stack
            Instruction::Push(pair) => {
                let value = self.stack_pair(pair);
                self.push(bus, value);
            }
            Instruction::Pop(pair) => {
                let value = self.pop(bus);
                self.set_stack_pair(pair, value);
            }

            // Machine control and I/O
            Instruction::Ei => self.inte = true,
            Instruction::Di => self.inte = false,
            Instruction::In => {
                let port = self.fetch_byte(bus);
                self.regs.a = self.ports.read(port);
            }
            Instruction::Out => {
                let port = self.fetch_byte(bus);
                self.ports.write(port, self.regs.a);
            }

            Instruction::Unknown => {
                warn!(
                    "unknown opcode {opcode:#04X} at {:#06X}",
                    self.regs.pc.wrapping_sub(1)
                );
            }
        }

        self.clock_count += u64::from(cycles);
        cycles
    }

    /// Read an 8-bit operand. `M` reads the byte at HL.
    fn read_reg<B: Bus>(&self, bus: &mut B, reg: Reg) -> u8 {
        match reg {
            Reg::B => self.regs.b(),
            Reg::C => self.regs.c(),
            Reg::D => self.regs.d(),
            Reg::E => self.regs.e(),
            Reg::H => self.regs.h(),
            Reg::L => self.regs.l(),
            Reg::M => bus.read(self.regs.hl.get()),
            Reg::A => self.regs.a,
        }
    }

    fn write_reg<B: Bus>(&mut self, bus: &mut B, reg: Reg, value: u8) {
        match reg {
            Reg::B => self.regs.bc.set_high(value),
            Reg::C => self.regs.bc.set_low(value),
            Reg::D => self.regs.de.set_high(value),
            Reg::E => self.regs.de.set_low(value),
            Reg::H => self.regs.hl.set_high(value),
            Reg::L => self.regs.hl.set_low(value),
            Reg::M => bus.write(self.regs.hl.get(), value),
            Reg::A => self.regs.a = value,
        }
    }

    fn pair(&self, pair: Pair) -> u16 {
        match pair {
            Pair::BC => self.regs.bc.get(),
            Pair::DE => self.regs.de.get(),
            Pair::HL => self.regs.hl.get(),
            Pair::SP => self.regs.sp,
        }
    }

    fn set_pair(&mut self, pair: Pair, value: u16) {
        match pair {
            Pair::BC => self.regs.bc.set(value),
            Pair::DE => self.regs.de.set(value),
            Pair::HL => self.regs.hl.set(value),
            Pair::SP => self.regs.sp = value,
        }
    }

    fn stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::BC => self.regs.bc.get(),
            StackPair::DE => self.regs.de.get(),
            StackPair::HL => self.regs.hl.get(),
            StackPair::PSW => self.psw(),
        }
    }

    fn set_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::BC => self.regs.bc.set(value),
            StackPair::DE => self.regs.de.set(value),
            StackPair::HL => self.regs.hl.set(value),
            StackPair::PSW => self.set_psw(value),
        }
    }

    fn alu(&mut self, op: AluOp, value: u8) {
        let a = self.regs.a;
        match op {
            AluOp::Add => {
                self.flags.update_add(a, value, 0, CarryMode::Both);
                self.regs.a = a.wrapping_add(value);
            }
            AluOp::Adc => {
                let carry = u8::from(self.flags.carry);
                self.flags.update_add(a, value, carry, CarryMode::Both);
                self.regs.a = a.wrapping_add(value).wrapping_add(carry);
            }
            AluOp::Sub => {
                self.flags.update_sub(a, value, false, CarryMode::Both);
                self.regs.a = a.wrapping_sub(value);
            }
            AluOp::Sbb => {
                let borrow = self.flags.carry;
                self.flags.update_sub(a, value, borrow, CarryMode::Both);
                self.regs.a = a.wrapping_sub(value).wrapping_sub(u8::from(borrow));
            }
            AluOp::Ana => {
                self.flags.update_and(a, value);
                self.regs.a = a & value;
            }
            AluOp::Xra => {
                self.regs.a = a ^ value;
                self.flags.update_add(self.regs.a, 0, 0, CarryMode::Clear);
            }
            AluOp::Ora => {
                self.regs.a = a | value;
                self.flags.update_add(self.regs.a, 0, 0, CarryMode::Clear);
            }
            AluOp::Cmp => self.flags.update_sub(a, value, false, CarryMode::Both),
        }
    }

    fn rotate(&mut self, rotate: Rotate) {
        let a = self.regs.a;
        let carry_in = u8::from(self.flags.carry);
        let (result, carry_out) = match rotate {
            Rotate::Rlc => (a.rotate_left(1), a & 0x80 != 0),
            Rotate::Rrc => (a.rotate_right(1), a & 0x01 != 0),
            Rotate::Ral => ((a << 1) | carry_in, a & 0x80 != 0),
            Rotate::Rar => ((a >> 1) | (carry_in << 7), a & 0x01 != 0),
        };
        self.regs.a = result;
        self.flags.carry = carry_out;
    }
}
