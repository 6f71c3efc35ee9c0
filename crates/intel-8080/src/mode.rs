//! Session mode.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The kind of software a session runs. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Arcade board: 8K ROM, 1K work RAM, 7K video RAM, mirrored RAM window,
    /// write-protected ROM and the bit-shift peripheral on ports 2-4.
    #[default]
    Arcade,
    /// CP/M-style console program: flat 64K RAM with the warm boot and BDOS
    /// entry points trapped.
    Console,
}

impl Mode {
    #[must_use]
    pub const fn is_console(self) -> bool {
        matches!(self, Mode::Console)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Arcade => "arcade",
            Mode::Console => "console",
        })
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arcade" => Ok(Mode::Arcade),
            "console" => Ok(Mode::Console),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Mode;
    use crate::Error;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Arcade".parse::<Mode>(), Ok(Mode::Arcade));
        assert_eq!("CONSOLE".parse::<Mode>(), Ok(Mode::Console));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "cpm".parse::<Mode>(),
            Err(Error::InvalidMode("cpm".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        for mode in [Mode::Arcade, Mode::Console] {
            assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
        }
    }
}
