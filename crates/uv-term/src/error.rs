//! The five error kinds a caller of `uv-term` can see (`spec.md` §7).

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("stream is not a terminal")]
    NotATerminal,
    #[error("platform does not support this terminal capability")]
    PlatformUnsupported,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
