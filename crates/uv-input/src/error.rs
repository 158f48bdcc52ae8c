//! Decoder and stream error type (`spec.md` §7 "Error Handling Design").
//!
//! `Decoder::decode` never fails; only the async streaming wrapper has an
//! I/O boundary to report through.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error("this platform does not support the requested input mode")]
    PlatformUnsupported,
}

pub type Result<T> = std::result::Result<T, Error>;
