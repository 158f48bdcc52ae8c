//! OSC 8 hyperlink parsing and encoding (`spec.md` §4.2 "Link parser
//! (OSC 8)").

use uv_model::Link;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Consuming the `8` command id, waiting for the separator before the
    /// params field.
    Start,
    Params,
    Url,
}

/// Incrementally parses an OSC 8 payload (`8;params;url`, with the leading
/// `8` and the `OSC`/`ST` framing already stripped by the caller). Reusable
/// across links via [`LinkParser::reset`].
#[derive(Debug, Clone)]
pub struct LinkParser {
    state: State,
    params: Vec<u8>,
    url: Vec<u8>,
}

impl Default for LinkParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkParser {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            params: Vec::new(),
            url: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Start;
        self.params.clear();
        self.url.clear();
    }

    pub fn advance(&mut self, chunk: &[u8]) {
        for &b in chunk {
            match self.state {
                State::Start => {
                    if b == b';' {
                        self.state = State::Params;
                    }
                }
                State::Params => {
                    if b == b';' {
                        self.state = State::Url;
                    } else {
                        self.params.push(b);
                    }
                }
                State::Url => self.url.push(b),
            }
        }
    }

    pub fn build(&self) -> Link {
        Link::new(
            String::from_utf8_lossy(&self.url).into_owned(),
            String::from_utf8_lossy(&self.params).into_owned(),
        )
    }
}

/// Encodes an OSC 8 "open" sequence for the given link.
pub fn encode_open(link: &Link) -> Vec<u8> {
    format!("\x1b]8;{};{}\x1b\\", link.params, link.url).into_bytes()
}

/// Encodes an OSC 8 "close" sequence (an empty-url re-announcement).
pub fn encode_close() -> Vec<u8> {
    b"\x1b]8;;\x1b\\".to_vec()
}
