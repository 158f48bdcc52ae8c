//! Grapheme cluster display width (`spec.md` §4.7 "either per-grapheme
//! Unicode width or per-wcwidth").

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthMethod {
    /// `unicode-width`'s East-Asian-Width table, widened for pictographic
    /// sequences `unicode-width` itself under-measures (ZWJ emoji, flags,
    /// keycaps) — matches what a modern GUI terminal renders.
    Unicode,
    /// Strict `wcwidth(3)` pass-through: no pictographic widening. Matches
    /// terminals that still size emoji at their base character's width.
    Wcwidth,
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

/// Width, in terminal cells, of a single grapheme cluster.
pub fn cluster_width(cluster: &str, method: WidthMethod) -> u8 {
    if cluster.is_empty() {
        return 0;
    }
    let base = cluster.width().min(2) as u8;
    if method == WidthMethod::Wcwidth {
        return base.max(1);
    }
    if base < 2 && cluster.chars().any(|c| is_extended_pictographic(c) || is_regional_indicator(c))
    {
        return 2;
    }
    base.max(1)
}
