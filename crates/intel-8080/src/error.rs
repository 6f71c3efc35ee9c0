//! Errors reported to the host.
//!
//! The instruction engine itself never fails; these cover the host-facing
//! setup calls only.

use thiserror::Error;

/// Result alias for host-facing operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A checked load would run past the top of the address space.
    #[error("{len}-byte image at {address:#06X} does not fit in the 64 KiB address space")]
    LoadOutOfRange { address: u16, len: usize },

    /// A mode name that is neither `arcade` nor `console`.
    #[error("unknown mode `{0}` (expected `arcade` or `console`)")]
    InvalidMode(String),
}
