#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a wad: {0}")]
    InvalidFormat(String),

    #[error("corrupt wad: {0}")]
    CorruptHeader(String),

    #[error("integrity: {0}")]
    Integrity(String),

    #[error("aborted by user")]
    Aborted,
}

pub type WadResult<T> = Result<T, WadError>;
