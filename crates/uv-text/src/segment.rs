//! `characters`/`lines`: grapheme segmentation into `Cell`s (`spec.md`
//! §4.7).

use crate::width::{cluster_width, WidthMethod};
use unicode_segmentation::UnicodeSegmentation;
use uv_model::{Cell, Link, Style};

fn is_standalone_zero_width(cluster: &str) -> bool {
    matches!(cluster, "\r" | "\u{200D}")
}

/// Grapheme-segments `input` into `Cell`s: a leader cell per cluster,
/// followed by `width - 1` placeholder cells for wide clusters. Tabs expand
/// to 8 spaces before segmentation; standalone zero-width clusters (a lone
/// CR, a lone ZWJ) are dropped.
pub fn characters(input: &str, width_method: WidthMethod) -> Vec<Cell> {
    let expanded = input.replace('\t', "        ");
    let mut cells = Vec::new();
    for cluster in expanded.graphemes(true) {
        if is_standalone_zero_width(cluster) {
            continue;
        }
        let width = cluster_width(cluster, width_method);
        cells.push(Cell::new(cluster, width, Style::default(), Link::default()));
        for _ in 1..width {
            cells.push(Cell::placeholder(Style::default(), Link::default()));
        }
    }
    cells
}

/// Splits `input` on LF (normalizing CRLF to LF first), then segments each
/// line with [`characters`]. Empty input yields no lines; a trailing LF
/// yields a trailing empty line.
pub fn lines(input: &str, width_method: WidthMethod) -> Vec<Vec<Cell>> {
    if input.is_empty() {
        return Vec::new();
    }
    let normalized = input.replace("\r\n", "\n");
    normalized
        .split('\n')
        .map(|line| characters(line, width_method))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_cluster_gets_a_placeholder() {
        let cells = characters("\u{4e2d}", WidthMethod::Unicode);
        assert_eq!(cells.len(), 2);
        assert!(cells[0].is_wide());
        assert!(cells[1].is_placeholder());
    }

    #[test]
    fn lone_cr_and_zwj_are_dropped() {
        let cells = characters("a\rb\u{200d}c", WidthMethod::Unicode);
        let joined: String = cells.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(joined, "abc");
    }

    #[test]
    fn tabs_expand_to_eight_spaces() {
        let cells = characters("a\tb", WidthMethod::Unicode);
        assert_eq!(cells.len(), 10);
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(lines("", WidthMethod::Unicode).is_empty());
    }

    #[test]
    fn trailing_lf_yields_trailing_empty_line() {
        let result = lines("a\n", WidthMethod::Unicode);
        assert_eq!(result.len(), 2);
        assert!(result[1].is_empty());
    }

    #[test]
    fn crlf_normalizes_to_lf() {
        let result = lines("a\r\nb", WidthMethod::Unicode);
        assert_eq!(result.len(), 2);
    }
}
