//! SGR (`ESC[...m`) style parser and the style diff-to-sequence encoder
//! (`spec.md` §3 "Style" diff rules, §4.2 "Style parser").

use crate::params::Param;
use smallvec::SmallVec;
use uv_model::{Attributes, Color, ColorProfile, Style, UnderlineStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Fg,
    Bg,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// `AttrState`: consumes one primary parameter at a time.
    Attr,
    /// Just saw a bare `38`/`48`/`58`; the next primary parameter is the
    /// color mode.
    ColorMode { slot: Slot },
    /// Mode selected (semicolon form); collecting `need` more primary
    /// parameters as color components.
    ColorParams { slot: Slot, mode: u8 },
}

#[derive(Debug, Clone, Default)]
struct Delta {
    full_reset: bool,
    fg: Option<Color>,
    bg: Option<Color>,
    underline_color: Option<Color>,
    underline_style: Option<UnderlineStyle>,
    attrs_set: Attributes,
    attrs_clear: Attributes,
}

/// Parses one SGR parameter stream at a time into a [`Delta`] that can be
/// applied onto a running pen. Call [`StyleParser::reset`] between
/// sequences; it is cheap and the parser is meant to be reused.
#[derive(Debug, Clone)]
pub struct StyleParser {
    state: State,
    delta: Delta,
    collected: SmallVec<[i64; 4]>,
}

impl Default for StyleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleParser {
    pub fn new() -> Self {
        Self {
            state: State::Attr,
            delta: Delta::default(),
            collected: SmallVec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Attr;
        self.delta = Delta::default();
        self.collected.clear();
    }

    /// Feed the next group of parameters (as tokenized by
    /// [`crate::params::parse_params`]). Safe to call more than once per
    /// sequence if the caller only has a prefix of the parameters so far.
    pub fn advance(&mut self, params: &[Param]) {
        for p in params {
            self.feed_one(p);
        }
    }

    fn feed_one(&mut self, p: &Param) {
        match self.state {
            State::Attr => self.feed_attr(p),
            State::ColorMode { slot } => self.feed_color_mode(slot, p),
            State::ColorParams { slot, mode } => self.feed_color_param(slot, mode, p),
        }
    }

    fn feed_attr(&mut self, p: &Param) {
        if p.is_colon_separated() {
            match p.primary {
                38 => self.finalize_color_from_param(Slot::Fg, p),
                48 => self.finalize_color_from_param(Slot::Bg, p),
                58 => self.finalize_color_from_param(Slot::Underline, p),
                4 => {
                    let n = p.subparams.first().copied().unwrap_or(1);
                    self.delta.underline_style = Some(underline_style_from_code(n));
                }
                other => self.apply_attr_code(other),
            }
            return;
        }
        match p.primary {
            38 => self.state = State::ColorMode { slot: Slot::Fg },
            48 => self.state = State::ColorMode { slot: Slot::Bg },
            58 => self.state = State::ColorMode { slot: Slot::Underline },
            other => self.apply_attr_code(other),
        }
    }

    fn feed_color_mode(&mut self, slot: Slot, p: &Param) {
        let mode = p.primary.clamp(0, 255) as u8;
        let need = expected_component_count(mode);
        if need == 0 {
            self.finalize_color(slot, mode, &[]);
            self.state = State::Attr;
        } else {
            self.collected.clear();
            self.state = State::ColorParams { slot, mode };
        }
    }

    fn feed_color_param(&mut self, slot: Slot, mode: u8, p: &Param) {
        self.collected.push(p.primary);
        if self.collected.len() >= expected_component_count(mode) {
            let collected = self.collected.clone();
            self.finalize_color(slot, mode, &collected);
            self.collected.clear();
            self.state = State::Attr;
        }
    }

    fn finalize_color_from_param(&mut self, slot: Slot, p: &Param) {
        if p.subparams.is_empty() {
            return;
        }
        let mode = p.subparams[0].clamp(0, 255) as u8;
        let comps: Vec<i64> = p.subparams[1..].to_vec();
        self.finalize_color(slot, mode, &comps);
    }

    fn finalize_color(&mut self, slot: Slot, mode: u8, comps: &[i64]) {
        let need = expected_component_count(mode);
        // Drop leading "extra" params (typically an omitted colorspace id)
        // down to the expected component count; trailing tolerance params
        // beyond what a mode needs are simply never read.
        let comps = if comps.len() > need {
            &comps[comps.len() - need..]
        } else {
            comps
        };
        let color = match mode {
            0 => return,
            1 => Some(Color::Default),
            2 if comps.len() >= 3 => Some(Color::rgb(b8(comps[0]), b8(comps[1]), b8(comps[2]))),
            3 if comps.len() >= 3 => Some(cmy_to_rgb(comps[0], comps[1], comps[2])),
            4 if comps.len() >= 4 => Some(cmyk_to_rgb(comps[0], comps[1], comps[2], comps[3])),
            5 if !comps.is_empty() => Some(Color::Indexed(b8(comps[0]))),
            6 if comps.len() >= 4 => Some(Color::Rgba {
                r: b8(comps[0]),
                g: b8(comps[1]),
                b: b8(comps[2]),
                a: b8(comps[3]),
            }),
            _ => None,
        };
        if let Some(c) = color {
            match slot {
                Slot::Fg => self.delta.fg = Some(c),
                Slot::Bg => self.delta.bg = Some(c),
                Slot::Underline => self.delta.underline_color = Some(c),
            }
        }
    }

    fn apply_attr_code(&mut self, code: i64) {
        match code {
            0 => self.delta = Delta {
                full_reset: true,
                ..Delta::default()
            },
            1 => self.delta.attrs_set |= Attributes::BOLD,
            2 => self.delta.attrs_set |= Attributes::FAINT,
            3 => self.delta.attrs_set |= Attributes::ITALIC,
            4 => self.delta.underline_style = Some(UnderlineStyle::Single),
            5 => self.delta.attrs_set |= Attributes::BLINK,
            6 => self.delta.attrs_set |= Attributes::RAPID_BLINK,
            7 => self.delta.attrs_set |= Attributes::REVERSE,
            8 => self.delta.attrs_set |= Attributes::CONCEAL,
            9 => self.delta.attrs_set |= Attributes::STRIKETHROUGH,
            22 => self.delta.attrs_clear |= Attributes::BOLD | Attributes::FAINT,
            23 => self.delta.attrs_clear |= Attributes::ITALIC,
            24 => self.delta.underline_style = Some(UnderlineStyle::None),
            25 => self.delta.attrs_clear |= Attributes::BLINK | Attributes::RAPID_BLINK,
            27 => self.delta.attrs_clear |= Attributes::REVERSE,
            28 => self.delta.attrs_clear |= Attributes::CONCEAL,
            29 => self.delta.attrs_clear |= Attributes::STRIKETHROUGH,
            30..=37 => self.delta.fg = Some(Color::Named((code - 30) as u8)),
            39 => self.delta.fg = Some(Color::Default),
            40..=47 => self.delta.bg = Some(Color::Named((code - 40) as u8)),
            49 => self.delta.bg = Some(Color::Default),
            59 => self.delta.underline_color = Some(Color::Default),
            90..=97 => self.delta.fg = Some(Color::Named((code - 90 + 8) as u8)),
            100..=107 => self.delta.bg = Some(Color::Named((code - 100 + 8) as u8)),
            _ => {}
        }
    }

    pub fn build(&self) -> Style {
        let mut style = Style::default();
        self.apply(&mut style);
        style
    }

    /// Applies the parsed delta onto a running pen. Fields the parser never
    /// touched are left untouched on `target`, matching real SGR semantics
    /// (each escape mutates the pen, it does not replace it).
    pub fn apply(&self, target: &mut Style) {
        if self.delta.full_reset {
            tracing::trace!(target: "style.sgr", "full_reset_applied");
            *target = Style::default();
        }
        if let Some(c) = self.delta.fg {
            target.fg = c;
        }
        if let Some(c) = self.delta.bg {
            target.bg = c;
        }
        if let Some(c) = self.delta.underline_color {
            target.underline_color = c;
        }
        if let Some(u) = self.delta.underline_style {
            target.underline_style = u;
        }
        target.attrs |= self.delta.attrs_set;
        target.attrs &= !self.delta.attrs_clear;
    }
}

fn b8(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}

fn expected_component_count(mode: u8) -> usize {
    match mode {
        2 | 3 => 3,
        4 => 4,
        5 => 1,
        6 => 4,
        _ => 0,
    }
}

fn underline_style_from_code(n: i64) -> UnderlineStyle {
    match n {
        0 => UnderlineStyle::None,
        2 => UnderlineStyle::Double,
        3 => UnderlineStyle::Curly,
        4 => UnderlineStyle::Dotted,
        5 => UnderlineStyle::Dashed,
        _ => UnderlineStyle::Single,
    }
}

fn underline_style_to_code(style: UnderlineStyle) -> u8 {
    match style {
        UnderlineStyle::None => 0,
        UnderlineStyle::Single => 1,
        UnderlineStyle::Double => 2,
        UnderlineStyle::Curly => 3,
        UnderlineStyle::Dotted => 4,
        UnderlineStyle::Dashed => 5,
    }
}

fn cmy_to_rgb(c: i64, m: i64, y: i64) -> Color {
    Color::rgb(255u8.saturating_sub(b8(c)), 255u8.saturating_sub(b8(m)), 255u8.saturating_sub(b8(y)))
}

fn cmyk_to_rgb(c: i64, m: i64, y: i64, k: i64) -> Color {
    let k = b8(k) as u32;
    let apply = |v: i64| {
        let v = b8(v) as u32;
        let value = (255 - v) * (255 - k) / 255;
        value as u8
    };
    Color::rgb(apply(c), apply(m), apply(y))
}

// ---------------------------------------------------------------------
// Diff-to-sequence encoder
// ---------------------------------------------------------------------

struct ColorCodes {
    default: u8,
    extended: u8,
    basic_base: Option<u8>,
    bright_base: Option<u8>,
}

const FG_CODES: ColorCodes = ColorCodes {
    default: 39,
    extended: 38,
    basic_base: Some(30),
    bright_base: Some(90),
};
const BG_CODES: ColorCodes = ColorCodes {
    default: 49,
    extended: 48,
    basic_base: Some(40),
    bright_base: Some(100),
};
const UL_CODES: ColorCodes = ColorCodes {
    default: 59,
    extended: 58,
    basic_base: None,
    bright_base: None,
};

fn encode_color(codes: &ColorCodes, color: Color, out: &mut Vec<String>) {
    match color {
        Color::Default => out.push(codes.default.to_string()),
        Color::Named(n) => match (codes.basic_base, codes.bright_base) {
            (Some(basic), Some(bright)) if n < 8 => out.push((basic + n).to_string()),
            (Some(_), Some(bright)) => out.push((bright + (n - 8)).to_string()),
            _ => out.push(format!("{};5;{}", codes.extended, n)),
        },
        Color::Indexed(n) => out.push(format!("{};5;{}", codes.extended, n)),
        Color::Rgba { r, g, b, .. } => out.push(format!("{};2;{};{};{}", codes.extended, r, g, b)),
    }
}

/// Builds the shortest SGR sequence that transforms a pen in state `from`
/// into state `to` (`spec.md` §3 "Style" diff rules, scenario S1).
/// Returns an empty vector if no bytes are needed.
pub fn diff(from: &Style, to: &Style, profile: ColorProfile) -> Vec<u8> {
    let from = from.downsample(profile);
    let to = to.downsample(profile);
    if from == to {
        return Vec::new();
    }

    let off_attrs = from.attrs & !to.attrs;
    let mut on_attrs = to.attrs & !from.attrs;

    let mut tokens: Vec<String> = Vec::new();

    let intensity_pair = Attributes::BOLD | Attributes::FAINT;
    if off_attrs.intersects(intensity_pair) {
        tokens.push("22".to_string());
        // `22` clears both bold and faint; re-affirm whichever of the pair
        // `to` still wants even if it was already on before the clear.
        on_attrs |= to.attrs & intensity_pair;
    }
    if off_attrs.contains(Attributes::ITALIC) {
        tokens.push("23".to_string());
    }
    if off_attrs.intersects(Attributes::BLINK | Attributes::RAPID_BLINK) {
        tokens.push("25".to_string());
    }
    if off_attrs.contains(Attributes::REVERSE) {
        tokens.push("27".to_string());
    }
    if off_attrs.contains(Attributes::CONCEAL) {
        tokens.push("28".to_string());
    }
    if off_attrs.contains(Attributes::STRIKETHROUGH) {
        tokens.push("29".to_string());
    }
    if from.underline_style != UnderlineStyle::None && to.underline_style == UnderlineStyle::None {
        tokens.push("24".to_string());
    }

    if on_attrs.contains(Attributes::BOLD) {
        tokens.push("1".to_string());
    }
    if on_attrs.contains(Attributes::FAINT) {
        tokens.push("2".to_string());
    }
    if on_attrs.contains(Attributes::ITALIC) {
        tokens.push("3".to_string());
    }
    if on_attrs.contains(Attributes::BLINK) {
        tokens.push("5".to_string());
    }
    if on_attrs.contains(Attributes::RAPID_BLINK) {
        tokens.push("6".to_string());
    }
    if on_attrs.contains(Attributes::REVERSE) {
        tokens.push("7".to_string());
    }
    if on_attrs.contains(Attributes::CONCEAL) {
        tokens.push("8".to_string());
    }
    if on_attrs.contains(Attributes::STRIKETHROUGH) {
        tokens.push("9".to_string());
    }
    if to.underline_style != UnderlineStyle::None && to.underline_style != from.underline_style {
        match to.underline_style {
            UnderlineStyle::Single => tokens.push("4".to_string()),
            other => tokens.push(format!("4:{}", underline_style_to_code(other))),
        }
    }

    if from.fg != to.fg {
        encode_color(&FG_CODES, to.fg, &mut tokens);
    }
    if from.bg != to.bg {
        encode_color(&BG_CODES, to.bg, &mut tokens);
    }
    if from.underline_color != to.underline_color {
        encode_color(&UL_CODES, to.underline_color, &mut tokens);
    }

    if tokens.is_empty() {
        return Vec::new();
    }
    format!("\x1b[{}m", tokens.join(";")).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(raw: &str) -> Style {
        let mut parser = StyleParser::new();
        parser.advance(&crate::params::parse_params(raw));
        parser.build()
    }

    #[test]
    fn s1_style_diff_scenario() {
        let from = Style::default()
            .with_fg(Color::rgb(255, 0, 0))
            .with_attrs(Attributes::BOLD);
        let to = Style::default()
            .with_fg(Color::rgb(0, 0, 255))
            .with_attrs(Attributes::ITALIC);
        let bytes = diff(&from, &to, ColorProfile::TrueColor);
        assert_eq!(bytes, b"\x1b[22;3;38;2;0;0;255m".to_vec());
    }

    #[test]
    fn s2_sgr_colon_rgb_drops_leading_colorspace() {
        let style = parse_one("38:2:0:255:128:64");
        assert_eq!(style.fg, Color::rgb(255, 128, 64));
    }

    #[test]
    fn semicolon_rgb_three_params() {
        let style = parse_one("38;2;10;20;30");
        assert_eq!(style.fg, Color::rgb(10, 20, 30));
    }

    #[test]
    fn indexed_color_both_forms() {
        assert_eq!(parse_one("38;5;200").fg, Color::Indexed(200));
        assert_eq!(parse_one("38:5:200").fg, Color::Indexed(200));
    }

    #[test]
    fn basic_and_bright_codes() {
        assert_eq!(parse_one("31").fg, Color::Named(1));
        assert_eq!(parse_one("91").fg, Color::Named(9));
        assert_eq!(parse_one("44").bg, Color::Named(4));
        assert_eq!(parse_one("104").bg, Color::Named(12));
    }

    #[test]
    fn default_fg_bg_underline_color() {
        let style = parse_one("39;49;59");
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
        assert_eq!(style.underline_color, Color::Default);
    }

    #[test]
    fn underline_bare_and_extended() {
        assert_eq!(parse_one("4").underline_style, UnderlineStyle::Single);
        assert_eq!(parse_one("4:3").underline_style, UnderlineStyle::Curly);
        assert_eq!(parse_one("24").underline_style, UnderlineStyle::None);
    }

    #[test]
    fn bold_faint_mutual_exclusion_via_22() {
        let mut pen = Style::default().with_attrs(Attributes::BOLD);
        let mut parser = StyleParser::new();
        // "22;2" => both off, then faint on.
        parser.advance(&crate::params::parse_params("22;2"));
        parser.apply(&mut pen);
        assert!(!pen.attrs.contains(Attributes::BOLD));
        assert!(pen.attrs.contains(Attributes::FAINT));
    }

    #[test]
    fn full_reset_then_reapply_in_one_sequence() {
        let mut pen = Style::default()
            .with_fg(Color::Named(1))
            .with_attrs(Attributes::BOLD);
        let mut parser = StyleParser::new();
        parser.advance(&crate::params::parse_params("0;3"));
        parser.apply(&mut pen);
        assert_eq!(pen.fg, Color::Default);
        assert!(!pen.attrs.contains(Attributes::BOLD));
        assert!(pen.attrs.contains(Attributes::ITALIC));
    }

    #[test]
    fn apply_only_touches_parsed_fields() {
        let mut pen = Style::default().with_fg(Color::Named(2));
        let mut parser = StyleParser::new();
        parser.advance(&crate::params::parse_params("1"));
        parser.apply(&mut pen);
        // fg untouched by a lone "1" (bold).
        assert_eq!(pen.fg, Color::Named(2));
        assert!(pen.attrs.contains(Attributes::BOLD));
    }

    proptest::proptest! {
        #[test]
        fn style_diff_round_trips(
            fg_r in 0u8..=255, fg_g in 0u8..=255, fg_b in 0u8..=255,
            bg_r in 0u8..=255, bg_g in 0u8..=255, bg_b in 0u8..=255,
            attrs_bits in 0u16..256,
        ) {
            let from = Style::default()
                .with_fg(Color::rgb(fg_r, fg_g, fg_b))
                .with_attrs(Attributes::BOLD | Attributes::ITALIC);
            let to = Style {
                fg: Color::rgb(fg_r, fg_g, fg_b),
                bg: Color::rgb(bg_r, bg_g, bg_b),
                underline_color: Color::Default,
                attrs: Attributes::from_bits_truncate(attrs_bits) & Attributes::all(),
                underline_style: UnderlineStyle::None,
            };
            let bytes = diff(&from, &to, ColorProfile::TrueColor);
            let mut pen = from;
            if !bytes.is_empty() {
                // Strip "ESC[" and trailing "m" to recover the raw param string.
                let raw = std::str::from_utf8(&bytes[2..bytes.len()-1]).unwrap();
                let mut parser = StyleParser::new();
                parser.advance(&crate::params::parse_params(raw));
                parser.apply(&mut pen);
            }
            prop_assert_eq!(pen, to);
        }
    }
}
