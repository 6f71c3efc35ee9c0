//! Top-level 8080 system.
//!
//! # Frame loop
//!
//! The arcade board raises two interrupts per video frame: `RST 1` when the
//! beam reaches the middle of the screen and `RST 2` at the end. `run_frame()`
//! runs `cycles_per_interrupt` cycles before each of them.

use std::io::{self, Write};

use emu_core::{Observable, Value};
use intel_8080::{I8080, INPUT_PORTS, MemoryMap, OUTPUT_PORTS, cpm};
use tracing::debug;

use crate::{Error, MachineConfig, Result};

/// Interrupt id for the mid-screen interrupt (`RST 1`).
pub const MID_SCREEN: u8 = 0;

/// Interrupt id for the end-of-screen interrupt (`RST 2`).
pub const END_OF_SCREEN: u8 = 1;

/// An 8080 with its memory map.
pub struct Machine<W: Write = io::Stdout> {
    cpu: I8080<W>,
    memory: MemoryMap,
    config: MachineConfig,
}

impl Machine {
    /// Create a machine whose console output goes to stdout.
    #[must_use]
    pub fn new(config: MachineConfig) -> Self {
        Self::with_console(config, io::stdout())
    }
}

impl<W: Write> Machine<W> {
    /// Create a machine with the given console sink.
    ///
    /// Execution starts at the configured load address. Console machines
    /// get the CP/M vectors installed.
    pub fn with_console(config: MachineConfig, console: W) -> Self {
        let mut memory = MemoryMap::new(config.mode);
        if config.mode.is_console() {
            cpm::install_vectors(&mut memory);
        }

        let mut cpu = I8080::with_console(config.mode, console);
        cpu.set_pc(config.load_address);

        Self {
            cpu,
            memory,
            config,
        }
    }

    /// Load a program image at the configured load address.
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        self.load_at(image, self.config.load_address)
    }

    /// Load an image at `address`, bypassing ROM write protection.
    pub fn load_at(&mut self, image: &[u8], address: u16) -> Result<()> {
        if image.is_empty() {
            return Err(Error::EmptyImage);
        }
        self.memory.try_load(image, address)?;
        debug!("loaded {} bytes at {address:#06X}", image.len());
        Ok(())
    }

    /// Execute one instruction. Returns the cycles it cost.
    pub fn clock(&mut self) -> u32 {
        self.cpu.clock(&mut self.memory)
    }

    /// Request an interrupt; see [`I8080::interrupt`].
    pub fn interrupt(&mut self, id: u8) -> bool {
        self.cpu.interrupt(&mut self.memory, id)
    }

    /// Run one video frame. Returns the cycles executed.
    ///
    /// Stops early if the CPU halts.
    pub fn run_frame(&mut self) -> u64 {
        let start = self.cpu.clock_count();

        for id in [MID_SCREEN, END_OF_SCREEN] {
            let target = self.cpu.clock_count() + u64::from(self.config.cycles_per_interrupt);
            while self.cpu.clock_count() < target {
                if self.cpu.is_halted() {
                    return self.cpu.clock_count() - start;
                }
                self.clock();
            }
            self.interrupt(id);
        }

        self.cpu.clock_count() - start
    }

    /// Clock until the CPU halts or `limit` instructions have run. Returns
    /// the number of instructions executed.
    pub fn run_until_halt(&mut self, limit: u64) -> u64 {
        let start = self.cpu.instruction_count();
        while !self.cpu.is_halted() && self.cpu.instruction_count() - start < limit {
            self.clock();
        }
        self.cpu.instruction_count() - start
    }

    /// Video RAM ($2400-$3FFF), one bit per pixel.
    #[must_use]
    pub fn vram(&self) -> &[u8] {
        self.memory.vram()
    }

    /// Input port latches, for the host to set switches and controls.
    pub fn input_ports_mut(&mut self) -> &mut [u8; INPUT_PORTS] {
        self.cpu.ports_mut().input_mut()
    }

    /// Output port latches as last written by the program.
    #[must_use]
    pub fn output_ports(&self) -> &[u8; OUTPUT_PORTS] {
        self.cpu.ports().output()
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    #[must_use]
    pub fn clock_count(&self) -> u64 {
        self.cpu.clock_count()
    }

    #[must_use]
    pub fn instruction_count(&self) -> u64 {
        self.cpu.instruction_count()
    }

    pub fn reset_counters(&mut self) {
        self.cpu.reset_counters();
    }

    #[must_use]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    #[must_use]
    pub fn cpu(&self) -> &I8080<W> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut I8080<W> {
        &mut self.cpu
    }

    #[must_use]
    pub fn memory(&self) -> &MemoryMap {
        &self.memory
    }

    /// Give up the machine and return its console sink.
    pub fn into_console(self) -> W {
        self.cpu.into_console()
    }
}

impl<W: Write> Observable for Machine<W> {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let addr = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
                u16::from_str_radix(hex, 16).ok()
            } else if let Some(hex) = rest.strip_prefix('$') {
                u16::from_str_radix(hex, 16).ok()
            } else {
                rest.parse().ok()
            };
            addr.map(|a| Value::U8(self.memory.read_byte(a)))
        } else {
            self.cpu.query(path)
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["cpu.<i8080_paths>", "memory.<address>"]
    }
}
