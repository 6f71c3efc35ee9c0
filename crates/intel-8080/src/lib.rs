//! Intel 8080 CPU and memory map.
//!
//! Each call to [`I8080::clock`] executes exactly one instruction and charges
//! its cost from a fixed cycle table. The CPU does not own memory: a
//! [`MemoryMap`] (or any other [`emu_core::Bus`]) is passed in on every step.
//!
//! Two session modes are supported. [`Mode::Arcade`] mirrors the work RAM
//! above 0x4000 and write-protects the ROM, and the port bank carries the
//! cabinet's bit-shift peripheral. [`Mode::Console`] gives the program a flat
//! 64 KiB address space and traps the CP/M warm boot and BDOS entry points.

mod alu;
pub mod cpm;
mod cpu;
pub mod decode;
mod error;
mod flags;
mod memory;
mod mode;
mod ports;
mod registers;
pub mod timing;

pub use alu::{CarryMode, carry_out};
pub use cpu::I8080;
pub use decode::{AluOp, Condition, DECODE, Instruction, Pair, Reg, Rotate, StackPair, decode};
pub use error::{Error, Result};
pub use flags::{Flags, ZSP, ZSP_PARITY, ZSP_SIGN, ZSP_ZERO};
pub use memory::{MEMORY_SIZE, MIRROR_END, MIRROR_START, MemoryMap, RAM_START, VRAM_END, VRAM_START};
pub use mode::Mode;
pub use ports::{INPUT_PORTS, OUTPUT_PORTS, Ports, ShiftRegister};
pub use registers::{RegisterPair, Registers};
