//! Renderer error type (`spec.md` §7 "Error Handling Design").
//!
//! `render`/`resize` reject zero-area targets before touching the diff
//! engine; `flush` is the only call that can fail for any other reason, since
//! it is the one place this crate performs I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid render target dimensions: {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("render sink write failed")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
