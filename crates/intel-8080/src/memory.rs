//! Address decoding for the 64K address space.
//!
//! Arcade layout:
//! - $0000-$1FFF: ROM (writes ignored)
//! - $2000-$23FF: work RAM
//! - $2400-$3FFF: video RAM
//! - $4000-$43FF: mirror of $2000-$23FF
//! - $4400-$FFFF: unmapped (reads 0, writes ignored)
//!
//! Console layout is flat: every address is its own cell and writable.

use emu_core::Bus;
use tracing::trace;

use crate::{Error, Mode, Result};

/// Size of the backing store and of the logical address space.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// First writable address on the arcade board.
pub const RAM_START: u16 = 0x2000;

/// First byte of video RAM.
pub const VRAM_START: u16 = 0x2400;

/// One past the last byte of video RAM.
pub const VRAM_END: u16 = 0x4000;

/// First address of the mirrored RAM window.
pub const MIRROR_START: u16 = 0x4000;

/// Last address of the mirrored RAM window (inclusive).
pub const MIRROR_END: u16 = 0x43FF;

/// Distance from a mirror address back to the cell it aliases.
const MIRROR_OFFSET: u16 = MIRROR_START - RAM_START;

/// The 8080's view of memory: a backing store plus the mode-dependent rules
/// that resolve each logical address to a cell.
pub struct MemoryMap {
    mode: Mode,
    cells: Box<[u8]>,
}

impl MemoryMap {
    /// Create a zero-filled memory map for the given mode.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            cells: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Resolve a logical address to its backing cell, or `None` if the
    /// address is unmapped.
    #[must_use]
    pub const fn resolve(&self, address: u16) -> Option<usize> {
        match self.mode {
            Mode::Console => Some(address as usize),
            Mode::Arcade => match address {
                0x0000..MIRROR_START => Some(address as usize),
                MIRROR_START..=MIRROR_END => Some((address - MIRROR_OFFSET) as usize),
                _ => None,
            },
        }
    }

    /// Whether the hardware accepts a CPU write to this address.
    #[must_use]
    pub const fn is_writable(&self, address: u16) -> bool {
        match self.mode {
            Mode::Console => true,
            Mode::Arcade => address >= RAM_START && address <= MIRROR_END,
        }
    }

    /// Copy `buffer` into memory starting at `address`.
    ///
    /// Bypasses write protection so ROM images can be installed. Addresses
    /// wrap at the top of the address space and unmapped addresses are
    /// skipped; the caller is expected to supply an image that fits.
    pub fn load(&mut self, buffer: &[u8], address: u16) {
        for (i, &byte) in buffer.iter().enumerate() {
            if let Some(cell) = self.resolve(address.wrapping_add(i as u16)) {
                self.cells[cell] = byte;
            }
        }
    }

    /// Like [`MemoryMap::load`], but refuses images that would run past
    /// $FFFF instead of wrapping.
    pub fn try_load(&mut self, buffer: &[u8], address: u16) -> Result<()> {
        if usize::from(address) + buffer.len() > MEMORY_SIZE {
            return Err(Error::LoadOutOfRange {
                address,
                len: buffer.len(),
            });
        }
        self.load(buffer, address);
        Ok(())
    }

    #[must_use]
    pub fn read_byte(&self, address: u16) -> u8 {
        match self.resolve(address) {
            Some(cell) => self.cells[cell],
            None => {
                trace!("read from unmapped address {address:#06X}");
                0
            }
        }
    }

    /// Write a byte, honouring the mode's write protection. Rejected writes
    /// are dropped without any signal to the caller.
    pub fn write_byte(&mut self, address: u16, value: u8) {
        match self.resolve(address) {
            Some(cell) if self.is_writable(address) => self.cells[cell] = value,
            _ => trace!("dropped write of {value:#04X} to {address:#06X}"),
        }
    }

    #[must_use]
    pub fn read_word(&self, address: u16) -> u16 {
        u16::from_le_bytes([
            self.read_byte(address),
            self.read_byte(address.wrapping_add(1)),
        ])
    }

    pub fn write_word(&mut self, address: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(address, lo);
        self.write_byte(address.wrapping_add(1), hi);
    }

    /// Read-only view of video RAM ($2400-$3FFF) for the host renderer.
    #[must_use]
    pub fn vram(&self) -> &[u8] {
        &self.cells[usize::from(VRAM_START)..usize::from(VRAM_END)]
    }
}

impl Bus for MemoryMap {
    fn read(&mut self, address: u16) -> u8 {
        self.read_byte(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.write_byte(address, value);
    }

    fn peek(&self, address: u16) -> u8 {
        self.read_byte(address)
    }
}
