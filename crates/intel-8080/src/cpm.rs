//! Minimal CP/M environment for console-mode programs.
//!
//! Programs are loaded into the transient program area at [`TPA_START`] and
//! call the BDOS by jumping to [`BDOS_ENTRY`] with the function number in C.
//! The CPU traps that address before fetching, services the call here, and
//! then executes the `RET` that [`install_vectors`] placed there. A jump to
//! [`WARM_BOOT`] ends the program.

use std::io::{self, Write};

use emu_core::Bus;
use tracing::{debug, warn};

/// Warm boot vector. Reaching it halts the session.
pub const WARM_BOOT: u16 = 0x0000;

/// BDOS entry point.
pub const BDOS_ENTRY: u16 = 0x0005;

/// Load and start address of a CP/M program.
pub const TPA_START: u16 = 0x0100;

/// BDOS function 2: write the character in E.
pub const C_WRITE: u8 = 2;

/// BDOS function 9: write the `$`-terminated string at DE.
pub const C_WRITESTR: u8 = 9;

const STRING_TERMINATOR: u8 = b'$';
/// Bytes buffered on the stack between console writes.
const STRING_CHUNK: usize = 64;
const OP_RET: u8 = 0xC9;

/// Top of the transient program area, stored at $0006 for programs that
/// size their stack from it.
const TPA_TOP: u16 = 0xFFFF;

/// Write the BDOS return stub and the top-of-memory word.
pub fn install_vectors<B: Bus>(bus: &mut B) {
    bus.write(BDOS_ENTRY, OP_RET);
    bus.write_word(BDOS_ENTRY + 1, TPA_TOP);
}

/// Service a BDOS call.
///
/// `function` is register C, `e` register E and `de` the DE pair. Console
/// write failures are logged and otherwise ignored.
pub fn bdos_call<B: Bus, W: Write>(bus: &B, console: &mut W, function: u8, e: u8, de: u16) {
    let result = match function {
        C_WRITE => console.write_all(&[e]),
        C_WRITESTR => write_string(bus, console, de),
        _ => {
            debug!("ignoring BDOS function {function}");
            return;
        }
    };

    if let Err(err) = result.and_then(|()| console.flush()) {
        warn!("console write failed: {err}");
    }
}

/// Copy bytes from `start` up to the terminator to `console`, wrapping at
/// $FFFF. Gives up after one pass over the address space.
fn write_string<B: Bus, W: Write>(bus: &B, console: &mut W, start: u16) -> io::Result<()> {
    let mut chunk = [0u8; STRING_CHUNK];
    let mut len = 0;
    let mut address = start;
    for _ in 0..=u16::MAX {
        let byte = bus.peek(address);
        if byte == STRING_TERMINATOR {
            return console.write_all(&chunk[..len]);
        }
        chunk[len] = byte;
        len += 1;
        if len == STRING_CHUNK {
            console.write_all(&chunk)?;
            len = 0;
        }
        address = address.wrapping_add(1);
    }
    warn!("no '$' terminator in string at {start:#06X}");
    console.write_all(&chunk[..len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryMap, Mode};

    #[test]
    fn vectors() {
        let mut memory = MemoryMap::new(Mode::Console);
        install_vectors(&mut memory);
        assert_eq!(memory.read_byte(0x0005), 0xC9);
        assert_eq!(memory.read_word(0x0006), 0xFFFF);
    }

    #[test]
    fn write_character() {
        let memory = MemoryMap::new(Mode::Console);
        let mut out = Vec::new();
        bdos_call(&memory, &mut out, C_WRITE, b'A', 0);
        assert_eq!(out, b"A");
    }

    #[test]
    fn write_string_stops_at_dollar() {
        let mut memory = MemoryMap::new(Mode::Console);
        memory.load(b"HELLO$WORLD$", 0x0200);
        let mut out = Vec::new();
        bdos_call(&memory, &mut out, C_WRITESTR, 0, 0x0200);
        assert_eq!(out, b"HELLO");
    }

    #[test]
    fn string_scan_is_bounded() {
        let memory = MemoryMap::new(Mode::Console);
        let mut out = Vec::new();
        bdos_call(&memory, &mut out, C_WRITESTR, 0, 0x1234);
        assert_eq!(out.len(), 0x1_0000);
    }

    /// Records write sizes; fails once `fail_after` bytes have been taken.
    #[derive(Default)]
    struct CountingConsole {
        bytes: usize,
        writes: usize,
        largest_write: usize,
        fail_after: Option<usize>,
    }

    impl Write for CountingConsole {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_after.is_some_and(|limit| self.bytes >= limit) {
                return Err(io::Error::other("console closed"));
            }
            self.bytes += buf.len();
            self.writes += 1;
            self.largest_write = self.largest_write.max(buf.len());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unterminated_string_streams_in_chunks() {
        let mut memory = MemoryMap::new(Mode::Console);
        memory.load(&[b'x'; 0x300], 0x8000);
        let mut console = CountingConsole::default();
        bdos_call(&memory, &mut console, C_WRITESTR, 0, 0x8000);
        assert_eq!(console.bytes, 0x1_0000);
        assert_eq!(console.writes, 0x1_0000 / STRING_CHUNK);
        assert_eq!(console.largest_write, STRING_CHUNK);
    }

    #[test]
    fn long_string_is_written_in_order() {
        let mut memory = MemoryMap::new(Mode::Console);
        let text: Vec<u8> = (0..200u8).map(|i| b'a' + i % 26).collect();
        memory.load(&text, 0x0300);
        memory.load(b"$", 0x0300 + 200);
        let mut out = Vec::new();
        bdos_call(&memory, &mut out, C_WRITESTR, 0, 0x0300);
        assert_eq!(out, text);
    }

    #[test]
    fn write_failure_stops_the_string() {
        let memory = MemoryMap::new(Mode::Console);
        let mut console = CountingConsole {
            fail_after: Some(STRING_CHUNK),
            ..CountingConsole::default()
        };
        bdos_call(&memory, &mut console, C_WRITESTR, 0, 0x1000);
        assert_eq!(console.bytes, STRING_CHUNK);
    }

    #[test]
    fn other_functions_are_ignored() {
        let memory = MemoryMap::new(Mode::Console);
        let mut out = Vec::new();
        bdos_call(&memory, &mut out, 0, b'A', 0);
        bdos_call(&memory, &mut out, 11, b'A', 0);
        assert!(out.is_empty());
    }
}
