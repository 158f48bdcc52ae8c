//! `Style`: the SGR-addressable part of a cell's appearance.
//!
//! The byte-level SGR parser and the diff-to-sequence encoder both live in
//! `uv-style`; this module only owns the data and its structural equality /
//! emptiness rules (`spec.md` §3).

use crate::color::Color;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attributes: u16 {
        const BOLD          = 0b0000_0000_0001;
        const FAINT         = 0b0000_0000_0010;
        const ITALIC        = 0b0000_0000_0100;
        const BLINK         = 0b0000_0000_1000;
        const RAPID_BLINK   = 0b0000_0001_0000;
        const REVERSE       = 0b0000_0010_0000;
        const CONCEAL       = 0b0000_0100_0000;
        const STRIKETHROUGH = 0b0000_1000_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub underline_color: Color,
    pub attrs: Attributes,
    pub underline_style: UnderlineStyle,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        self.fg.is_default()
            && self.bg.is_default()
            && self.underline_color.is_default()
            && self.attrs.is_empty()
            && self.underline_style == UnderlineStyle::None
    }

    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs |= attrs;
        self
    }

    pub fn with_underline(mut self, style: UnderlineStyle) -> Self {
        self.underline_style = style;
        self
    }

    /// Downsample every color field to the given profile, in place.
    pub fn downsample(&self, profile: crate::color::ColorProfile) -> Style {
        use crate::color::ColorProfile;
        if matches!(profile, ColorProfile::NoTty) {
            return Style::default();
        }
        Style {
            fg: self.fg.downsample(profile),
            bg: self.bg.downsample(profile),
            underline_color: self.underline_color.downsample(profile),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_empty() {
        assert!(Style::default().is_empty());
    }

    #[test]
    fn any_field_set_is_not_empty() {
        assert!(!Style::default().with_attrs(Attributes::BOLD).is_empty());
        assert!(!Style::default().with_fg(Color::Named(1)).is_empty());
        assert!(
            !Style::default()
                .with_underline(UnderlineStyle::Curly)
                .is_empty()
        );
    }
}
