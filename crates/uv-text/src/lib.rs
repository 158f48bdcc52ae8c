//! Text utilities for building buffers: grapheme segmentation, line
//! splitting, width-bounded reflow, and styled-source segmentation.

mod segment;
mod styled;
mod width;
mod wrap;

pub use segment::{characters, lines};
pub use styled::styled_characters;
pub use width::{cluster_width, WidthMethod};
pub use wrap::Wrapper;
