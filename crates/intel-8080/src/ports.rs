//! I/O port bank and the arcade bit-shift peripheral.
//!
//! Input ports 0-2 are latched by the host (controls, DIP switches). Port 3
//! reads the shift register. Output port 2 sets the shift offset and port 4
//! pushes a byte into the shift register; the remaining output ports are
//! latched for the host to read (sound, watchdog).

use tracing::debug;

use crate::Mode;

/// Number of input port latches.
pub const INPUT_PORTS: usize = 4;

/// Number of output port latches.
pub const OUTPUT_PORTS: usize = 7;

const PORT_SHIFT_RESULT: u8 = 3;
const PORT_SHIFT_OFFSET: u8 = 2;
const PORT_SHIFT_DATA: u8 = 4;

/// Power-on state of the arcade input latches: bits 1-3 of port 0 and bit 3
/// of port 1 are tied high on the cabinet.
const ARCADE_INPUTS: [u8; INPUT_PORTS] = [0b0000_1110, 0b0000_1000, 0, 0];

/// Hardware 16-bit shift register with a 3-bit read offset.
///
/// Each write pushes a byte into the high half and moves the previous high
/// byte down. Reading returns the eight bits starting `offset` bits below
/// the top of the register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftRegister {
    value: u16,
    offset: u8,
}

impl ShiftRegister {
    pub fn push(&mut self, data: u8) {
        self.value = (self.value >> 8) | (u16::from(data) << 8);
    }

    pub fn set_offset(&mut self, offset: u8) {
        self.offset = offset & 7;
    }

    #[must_use]
    pub const fn result(&self) -> u8 {
        (self.value >> (8 - self.offset)) as u8
    }

    #[must_use]
    pub const fn value(&self) -> u16 {
        self.value
    }

    #[must_use]
    pub const fn offset(&self) -> u8 {
        self.offset
    }
}

/// The CPU's port bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ports {
    input: [u8; INPUT_PORTS],
    output: [u8; OUTPUT_PORTS],
    shift: ShiftRegister,
}

impl Ports {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        let input = match mode {
            Mode::Arcade => ARCADE_INPUTS,
            Mode::Console => [0; INPUT_PORTS],
        };
        Self {
            input,
            output: [0; OUTPUT_PORTS],
            shift: ShiftRegister::default(),
        }
    }

    /// Service an `IN port` instruction.
    pub fn read(&self, port: u8) -> u8 {
        match port {
            PORT_SHIFT_RESULT => self.shift.result(),
            p if p < PORT_SHIFT_RESULT => self.input[usize::from(p)],
            _ => {
                debug!("IN from unconnected port {port}");
                0
            }
        }
    }

    /// Service an `OUT port` instruction.
    pub fn write(&mut self, port: u8, value: u8) {
        match port {
            PORT_SHIFT_OFFSET => self.shift.set_offset(value),
            PORT_SHIFT_DATA => self.shift.push(value),
            p if usize::from(p) < OUTPUT_PORTS => self.output[usize::from(p)] = value,
            _ => debug!("OUT {value:#04X} to unconnected port {port}"),
        }
    }

    /// Input latches, writable by the host.
    pub fn input_mut(&mut self) -> &mut [u8; INPUT_PORTS] {
        &mut self.input
    }

    #[must_use]
    pub fn input(&self) -> &[u8; INPUT_PORTS] {
        &self.input
    }

    /// Output latches as last written by the program.
    #[must_use]
    pub fn output(&self) -> &[u8; OUTPUT_PORTS] {
        &self.output
    }

    #[must_use]
    pub fn shift(&self) -> &ShiftRegister {
        &self.shift
    }
}

impl Default for Ports {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_peripheral_reads_through_offset() {
        let mut ports = Ports::new(Mode::Arcade);
        ports.write(4, 0xAA);
        ports.write(4, 0x55);
        ports.write(2, 4);
        assert_eq!(ports.shift().value(), 0x55AA);
        assert_eq!(ports.read(3), 0x5A);
    }

    #[test]
    fn shift_offset_is_three_bits() {
        let mut shift = ShiftRegister::default();
        shift.set_offset(0xFF);
        assert_eq!(shift.offset(), 7);
        shift.push(0x01);
        shift.push(0x80);
        // 0x8001 >> 1
        assert_eq!(shift.result(), 0x00);
        shift.set_offset(0);
        assert_eq!(shift.result(), 0x80);
    }

    #[test]
    fn arcade_inputs_power_on_with_fixed_bits() {
        let ports = Ports::new(Mode::Arcade);
        assert_eq!(ports.read(0), 0b0000_1110);
        assert_eq!(ports.read(1), 0b0000_1000);
        assert_eq!(ports.read(2), 0);
        assert_eq!(Ports::new(Mode::Console).read(0), 0);
    }

    #[test]
    fn host_writes_input_latches() {
        let mut ports = Ports::new(Mode::Arcade);
        ports.input_mut()[1] |= 0x01;
        assert_eq!(ports.read(1), 0b0000_1001);
    }

    #[test]
    fn output_latches_and_unconnected_ports() {
        let mut ports = Ports::new(Mode::Arcade);
        ports.write(3, 0x12);
        ports.write(5, 0x34);
        ports.write(6, 0x56);
        ports.write(7, 0x78);
        ports.write(0xFF, 0x9A);
        assert_eq!(ports.output(), &[0, 0, 0, 0x12, 0, 0x34, 0x56]);
        assert_eq!(ports.read(0x10), 0);
    }

    #[test]
    fn shift_ports_do_not_latch() {
        let mut ports = Ports::new(Mode::Arcade);
        ports.write(2, 3);
        ports.write(4, 0xFF);
        assert_eq!(ports.output(), &[0; OUTPUT_PORTS]);
    }
}
