//! Intel 8080 CPU state and stepping.

mod execute;

use std::io::{self, Write};

use emu_core::{Bus, Cpu, Observable, Value};
use tracing::debug;

use crate::{Flags, Mode, Ports, Registers, cpm};

const OP_DI: u8 = 0xF3;
const OP_RST_1: u8 = 0xCF;
const OP_RST_2: u8 = 0xD7;

/// The Intel 8080 CPU.
///
/// Each [`clock`](Self::clock) executes one whole instruction and charges
/// its cost from the cycle table. The CPU owns its port bank and, for
/// console mode, the sink that BDOS output goes to.
pub struct I8080<W: Write = io::Stdout> {
    regs: Registers,
    flags: Flags,
    mode: Mode,

    /// Interrupt enable (set by EI, cleared by DI and on interrupt entry).
    inte: bool,
    halted: bool,

    ports: Ports,

    instruction_count: u64,
    clock_count: u64,

    console: W,
}

impl I8080 {
    /// Create a CPU that writes console output to stdout.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self::with_console(mode, io::stdout())
    }
}

impl Default for I8080 {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl<W: Write> I8080<W> {
    /// Create a CPU in its power-on state.
    ///
    /// Console programs start at the transient program area; arcade ROMs
    /// start at $0000.
    pub fn with_console(mode: Mode, console: W) -> Self {
        let pc = if mode.is_console() { cpm::TPA_START } else { 0 };
        Self {
            regs: Registers {
                pc,
                ..Registers::default()
            },
            flags: Flags::default(),
            mode,
            inte: false,
            halted: false,
            ports: Ports::new(mode),
            instruction_count: 0,
            clock_count: 0,
            console,
        }
    }

    /// Execute one instruction. Returns the cycles it cost.
    ///
    /// A halted CPU does nothing. In console mode, arriving at the warm boot
    /// vector halts without fetching, and arriving at the BDOS entry point
    /// services the call before the `RET` stored there is executed.
    pub fn clock<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.halted {
            return 0;
        }

        if self.mode.is_console() {
            match self.regs.pc {
                cpm::WARM_BOOT => {
                    debug!("warm boot reached, halting");
                    self.halted = true;
                    return 0;
                }
                cpm::BDOS_ENTRY => {
                    let (function, e, de) = (self.regs.c(), self.regs.e(), self.regs.de.get());
                    cpm::bdos_call(&*bus, &mut self.console, function, e, de);
                }
                _ => {}
            }
        }

        let opcode = self.fetch_byte(bus);
        self.execute(bus, opcode)
    }

    /// Deliver an interrupt request.
    ///
    /// Ignored unless interrupts are enabled. Otherwise a `DI` is executed
    /// followed by `RST 1` for `id` 0 or `RST 2` for `id` 1, both through
    /// the normal dispatch path so they are counted and timed. The service
    /// routine is expected to re-enable interrupts. Returns whether a
    /// restart was taken.
    pub fn interrupt<B: Bus>(&mut self, bus: &mut B, id: u8) -> bool {
        if !self.inte {
            return false;
        }

        self.execute(bus, OP_DI);
        let restart = match id {
            0 => OP_RST_1,
            1 => OP_RST_2,
            _ => {
                debug!("no restart vector for interrupt {id}");
                return false;
            }
        };
        self.execute(bus, restart);
        true
    }

    /// Push a word: SP is decremented by two and the word stored there.
    pub fn push<B: Bus>(&mut self, bus: &mut B, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        bus.write_word(self.regs.sp, value);
    }

    /// Pop the word at SP and increment SP by two.
    pub fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = bus.read_word(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    fn fetch_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let byte = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        byte
    }

    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Processor status word: accumulator high, flags low.
    #[must_use]
    pub fn psw(&self) -> u16 {
        u16::from_be_bytes([self.regs.a, self.flags.to_byte()])
    }

    pub fn set_psw(&mut self, value: u16) {
        let [a, flags] = value.to_be_bytes();
        self.regs.a = a;
        self.flags = Flags::from_byte(flags);
    }

    #[must_use]
    pub fn registers(&self) -> Registers {
        self.regs
    }

    pub fn set_registers(&mut self, regs: Registers) {
        self.regs = regs;
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.regs.pc = pc;
    }

    #[must_use]
    pub fn sp(&self) -> u16 {
        self.regs.sp
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn interrupts_enabled(&self) -> bool {
        self.inte
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Stop or resume execution. A host uses this to end a session.
    pub fn set_halted(&mut self, halted: bool) {
        self.halted = halted;
    }

    #[must_use]
    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    /// Instructions executed since power-on or the last reset.
    #[must_use]
    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Cycles charged since power-on or the last reset.
    #[must_use]
    pub fn clock_count(&self) -> u64 {
        self.clock_count
    }

    pub fn reset_counters(&mut self) {
        self.instruction_count = 0;
        self.clock_count = 0;
    }

    #[must_use]
    pub fn console(&self) -> &W {
        &self.console
    }

    pub fn into_console(self) -> W {
        self.console
    }
}

impl<B: Bus, W: Write> Cpu<B> for I8080<W> {
    fn step(&mut self, bus: &mut B) -> u32 {
        self.clock(bus)
    }

    fn interrupt(&mut self, bus: &mut B, line: u8) -> bool {
        I8080::interrupt(self, bus, line)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn is_halted(&self) -> bool {
        self.halted
    }
}

// === Observable implementation ===

const I8080_QUERY_PATHS: &[&str] = &[
    "a", "b", "c", "d", "e", "h", "l",
    "bc", "de", "hl", "sp", "pc",
    "flags.z", "flags.s", "flags.p", "flags.cy", "flags.ac",
    "psw", "inte", "halted",
    "cycles", "instructions",
    "shift.value", "shift.offset",
];

impl<W: Write> Observable for I8080<W> {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "a" => Some(self.regs.a.into()),
            "b" => Some(self.regs.b().into()),
            "c" => Some(self.regs.c().into()),
            "d" => Some(self.regs.d().into()),
            "e" => Some(self.regs.e().into()),
            "h" => Some(self.regs.h().into()),
            "l" => Some(self.regs.l().into()),
            "bc" => Some(self.regs.bc.get().into()),
            "de" => Some(self.regs.de.get().into()),
            "hl" => Some(self.regs.hl.get().into()),
            "sp" => Some(self.regs.sp.into()),
            "pc" => Some(self.regs.pc.into()),
            "flags.z" => Some(self.flags.zero.into()),
            "flags.s" => Some(self.flags.sign.into()),
            "flags.p" => Some(self.flags.parity.into()),
            "flags.cy" => Some(self.flags.carry.into()),
            "flags.ac" => Some(self.flags.aux_carry.into()),
            "psw" => Some(self.psw().into()),
            "inte" => Some(self.inte.into()),
            "halted" => Some(self.halted.into()),
            "cycles" => Some(Value::U64(self.clock_count)),
            "instructions" => Some(Value::U64(self.instruction_count)),
            "shift.value" => Some(self.ports.shift().value().into()),
            "shift.offset" => Some(self.ports.shift().offset().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        I8080_QUERY_PATHS
    }
}
