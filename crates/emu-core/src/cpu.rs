use crate::Bus;

/// A CPU that executes whole instructions.
///
/// The type parameter `B` is the bus type this CPU operates on.
pub trait Cpu<B: Bus> {
    /// Execute one instruction. Returns cycles consumed.
    ///
    /// A halted CPU consumes nothing and returns 0.
    fn step(&mut self, bus: &mut B) -> u32;

    /// Signal a maskable interrupt on the given line.
    ///
    /// Returns true if the interrupt was accepted.
    fn interrupt(&mut self, bus: &mut B, line: u8) -> bool;

    /// Get the current program counter.
    fn pc(&self) -> u16;

    /// Returns true if the CPU has stopped executing.
    fn is_halted(&self) -> bool;
}
