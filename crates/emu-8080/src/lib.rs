//! Intel 8080 machine.
//!
//! Wraps the CPU and memory map into a runnable system. In arcade mode the
//! machine delivers the board's two interrupts per video frame; in console
//! mode it runs a CP/M program until the program exits through the warm
//! boot vector.

mod config;
mod error;
mod machine;

pub use config::{ARCADE_CLOCK_HZ, ARCADE_INTERRUPT_HZ, MachineConfig};
pub use error::{Error, Result};
pub use machine::{END_OF_SCREEN, MID_SCREEN, Machine};
