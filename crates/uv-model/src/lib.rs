//! The cell-grid data model: colors, styles, hyperlinks, cells, lines, and
//! the frame buffer the renderer diffs against.
//!
//! Nothing in this crate performs I/O or byte-level encoding/decoding; it is
//! the shared vocabulary that `uv-style` (SGR bytes <-> `Style`), `uv-input`
//! (bytes -> `Event`), and `uv-render` (`Buffer` -> bytes) all build on.

pub mod buffer;
pub mod cell;
pub mod color;
pub mod geometry;
pub mod link;
pub mod style;

pub use buffer::{Buffer, TouchRange};
pub use cell::{Cell, Line};
pub use color::{Color, ColorProfile};
pub use geometry::{Position, Rect, Size};
pub use link::Link;
pub use style::{Attributes, Style, UnderlineStyle};
