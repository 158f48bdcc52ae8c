//! `styled_characters`: feeds source text carrying embedded SGR/OSC-8
//! escapes through `uv_style`'s parsers so a caller can build a buffer
//! directly from e.g. `ls --color` output instead of stripping it first.

use crate::segment::characters;
use crate::width::WidthMethod;
use uv_model::{Cell, Link, Style};
use uv_style::{parse_params, LinkParser, StyleParser};

fn find_osc_terminator(bytes: &[u8], from: usize) -> usize {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == 0x07 {
            return j;
        }
        if bytes[j] == 0x1b && bytes.get(j + 1) == Some(&b'\\') {
            return j;
        }
        j += 1;
    }
    j
}

/// Segments `input` (raw bytes, possibly containing SGR and OSC 8 escapes)
/// into styled `Cell`s, tracking a running pen the way a terminal emulator
/// would.
pub fn styled_characters(input: &[u8], width_method: WidthMethod) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut pen_style = Style::default();
    let mut pen_link = Link::default();
    let mut style_parser = StyleParser::new();

    let mut i = 0;
    while i < input.len() {
        if input[i] == 0x1b && input.get(i + 1) == Some(&b'[') {
            let start = i + 2;
            let mut j = start;
            while j < input.len() && !(0x40..=0x7e).contains(&input[j]) {
                j += 1;
            }
            if j >= input.len() {
                break;
            }
            if input[j] == b'm' {
                let param_str = std::str::from_utf8(&input[start..j]).unwrap_or("");
                style_parser.reset();
                style_parser.advance(&parse_params(param_str));
                style_parser.apply(&mut pen_style);
            }
            i = j + 1;
            continue;
        }

        if input[i] == 0x1b && input.get(i + 1) == Some(&b']') {
            let start = i + 2;
            let end = find_osc_terminator(input, start);
            let payload = &input[start..end.min(input.len())];
            if payload.starts_with(b"8;") {
                let mut link_parser = LinkParser::new();
                link_parser.advance(payload);
                pen_link = link_parser.build();
            }
            i = if input.get(end) == Some(&0x07) {
                end + 1
            } else {
                (end + 2).min(input.len())
            };
            continue;
        }

        let start = i;
        while i < input.len() && input[i] != 0x1b {
            i += 1;
        }
        let text = std::str::from_utf8(&input[start..i]).unwrap_or("");
        for cell in characters(text, width_method) {
            cells.push(Cell::new(cell.content, cell.width, pen_style, pen_link.clone()));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use uv_model::Color;

    #[test]
    fn sgr_red_bold_applies_to_following_text() {
        let input = b"\x1b[1;31mhi\x1b[0m there";
        let cells = styled_characters(input, WidthMethod::Unicode);
        assert_eq!(cells[0].content, "h");
        assert_eq!(cells[0].style.fg, Color::Named(1));
        assert!(cells[0].style.attrs.contains(uv_model::Attributes::BOLD));
        let space_idx = cells.iter().position(|c| c.content == " ").unwrap();
        assert_eq!(cells[space_idx].style.fg, Color::Default);
    }

    #[test]
    fn osc8_link_applies_to_following_text() {
        let input = b"\x1b]8;;https://example.com\x1b\\click\x1b]8;;\x1b\\";
        let cells = styled_characters(input, WidthMethod::Unicode);
        assert_eq!(cells[0].link.url, "https://example.com");
        assert!(cells.last().unwrap().link.is_empty());
    }

    #[test]
    fn plain_text_has_no_style() {
        let cells = styled_characters(b"hello", WidthMethod::Unicode);
        assert!(cells.iter().all(|c| c.style.is_empty() && c.link.is_empty()));
    }
}
