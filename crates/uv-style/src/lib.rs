//! SGR style parsing/encoding and OSC 8 hyperlink parsing/encoding.

mod link;
mod params;
mod sgr;

pub use link::{encode_close, encode_open, LinkParser};
pub use params::{parse_params, Param};
pub use sgr::{diff, StyleParser};
