use std::io;

/// Errors raised while setting up a machine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Load(#[from] intel_8080::Error),

    #[error("program image is empty")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, Error>;
