//! Machine configuration.

use intel_8080::{Mode, cpm};

/// CPU clock of the arcade board.
pub const ARCADE_CLOCK_HZ: u32 = 2_000_000;

/// Interrupt rate of the arcade board: mid-screen and end of screen, 60
/// frames a second.
pub const ARCADE_INTERRUPT_HZ: u32 = 120;

/// Configuration for creating a [`Machine`](crate::Machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    pub mode: Mode,
    /// Where [`Machine::load`](crate::Machine::load) places the image and
    /// where execution starts.
    pub load_address: u16,
    /// CPU cycles between the two interrupts of a frame.
    pub cycles_per_interrupt: u32,
}

impl MachineConfig {
    /// Arcade board: ROM at $0000, interrupts every half frame.
    #[must_use]
    pub const fn arcade() -> Self {
        Self {
            mode: Mode::Arcade,
            load_address: 0x0000,
            cycles_per_interrupt: ARCADE_CLOCK_HZ / ARCADE_INTERRUPT_HZ,
        }
    }

    /// CP/M console: program in the transient program area.
    #[must_use]
    pub const fn console() -> Self {
        Self {
            mode: Mode::Console,
            load_address: cpm::TPA_START,
            cycles_per_interrupt: ARCADE_CLOCK_HZ / ARCADE_INTERRUPT_HZ,
        }
    }

    #[must_use]
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Arcade => Self::arcade(),
            Mode::Console => Self::console(),
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::for_mode(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arcade_half_frame() {
        let config = MachineConfig::arcade();
        assert_eq!(config.cycles_per_interrupt, 16_666);
        assert_eq!(config.load_address, 0x0000);
    }

    #[test]
    fn console_loads_at_tpa() {
        let config = MachineConfig::for_mode(Mode::Console);
        assert_eq!(config.mode, Mode::Console);
        assert_eq!(config.load_address, 0x0100);
    }
}
