//! External terminal interfaces: capability detection, color profile
//! inference, the `Sink`/`Source` traits, and a `crossterm`-backed
//! raw-mode/alt-screen backend.

mod backend;
mod capabilities;
mod color;
mod error;
mod io;

pub use backend::{CrosstermBackend, TerminalBackend, TerminalGuard};
pub use capabilities::TerminalCapabilities;
pub use color::{detect_color_profile, infer_color_profile, ColorProfile};
pub use error::{Error, Result};
pub use io::{Sink, Source};
