//! Memory bus interface.

/// A 16-bit address bus.
///
/// Implementors decode the address and route it to backing storage. Writes
/// that the hardware would ignore (ROM, unmapped space) are dropped silently;
/// the bus never reports an error to the CPU.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Read a byte without side effects.
    ///
    /// Used by observers and system-call traps that inspect memory outside
    /// the instruction stream.
    fn peek(&self, address: u16) -> u8;

    /// Read a little-endian word: low byte at `address`, high byte at
    /// `address + 1` (wrapping at the top of the address space).
    fn read_word(&mut self, address: u16) -> u16 {
        let lo = self.read(address);
        let hi = self.read(address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Write a little-endian word as two byte writes, low byte first.
    fn write_word(&mut self, address: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write(address, lo);
        self.write(address.wrapping_add(1), hi);
    }
}
