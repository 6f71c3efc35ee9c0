//! Core traits for instruction-stepped 8-bit emulation.
//!
//! A CPU never owns its memory. The bus is handed to every step so the
//! machine that owns both can inspect or patch memory between instructions.

mod bus;
mod cpu;
mod observable;

pub use bus::Bus;
pub use cpu::Cpu;
pub use observable::{Observable, Value};
