//! Abstract terminal color and the downsample profiles a renderer targets.

/// An abstract color value.
///
/// `Default` means "no color" (the terminal's own foreground/background),
/// not a specific RGB value — it downsamples to itself on every profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    #[default]
    Default,
    /// One of the 16 basic ANSI colors, 0..=15 (0..=7 normal, 8..=15 bright).
    Named(u8),
    /// A 256-color palette index.
    Indexed(u8),
    /// 24-bit color with an alpha channel (the WezTerm RGBA extension on
    /// the wire; alpha is ignored by terminals that only understand RGB).
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgba { r, g, b, a: 0xff }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Color::Default)
    }

    /// Downsample to whatever the given profile can express.
    pub fn downsample(&self, profile: ColorProfile) -> Color {
        match (profile, *self) {
            (_, Color::Default) => Color::Default,
            (ColorProfile::NoTty | ColorProfile::Ascii, _) => Color::Default,
            (ColorProfile::TrueColor, c) => c,
            (ColorProfile::Ansi256, Color::Named(n)) => Color::Indexed(n),
            (ColorProfile::Ansi256, c @ Color::Indexed(_)) => c,
            (ColorProfile::Ansi256, Color::Rgba { r, g, b, .. }) => {
                Color::Indexed(rgb_to_256(r, g, b))
            }
            (ColorProfile::Ansi16, Color::Named(n)) => Color::Named(n),
            (ColorProfile::Ansi16, Color::Indexed(i)) => Color::Named(index_to_16(i)),
            (ColorProfile::Ansi16, Color::Rgba { r, g, b, .. }) => {
                Color::Named(index_to_16(rgb_to_256(r, g, b)))
            }
        }
    }
}

/// Downsample target a renderer is configured for. Inferred externally from
/// `$COLORTERM`/`$TERM` (terminfo/env detection is out of scope here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorProfile {
    /// Not a terminal: strip styles and links entirely.
    NoTty,
    /// No color support: strip color, keep other attributes.
    Ascii,
    Ansi16,
    Ansi256,
    TrueColor,
}

/// Maps an RGB triple onto the xterm 256-color cube (16..=231) or the
/// grayscale ramp (232..=255), whichever is closer.
fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    const STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let to_cube = |c: u8| {
        STEPS
            .iter()
            .enumerate()
            .min_by_key(|(_, &s)| (s as i32 - c as i32).abs())
            .map(|(i, _)| i as u8)
            .unwrap_or(0)
    };
    let (cr, cg, cb) = (to_cube(r), to_cube(g), to_cube(b));
    let cube_idx = 16 + 36 * cr + 6 * cg + cb;
    let cube_rgb = (STEPS[cr as usize], STEPS[cg as usize], STEPS[cb as usize]);

    let gray_level = ((r as u32 + g as u32 + b as u32) / 3).min(255) as u8;
    let gray_idx = if gray_level < 8 {
        232
    } else if gray_level > 238 {
        255
    } else {
        232 + (gray_level - 8) / 10
    };
    let gray_val = if gray_idx == 232 {
        8
    } else {
        8 + (gray_idx - 232) as u32 * 10
    };

    let cube_dist = dist2(r, g, b, cube_rgb.0, cube_rgb.1, cube_rgb.2);
    let gray_dist = dist2(r, g, b, gray_val as u8, gray_val as u8, gray_val as u8);
    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn dist2(r1: u8, g1: u8, b1: u8, r2: u8, g2: u8, b2: u8) -> i32 {
    let dr = r1 as i32 - r2 as i32;
    let dg = g1 as i32 - g2 as i32;
    let db = b1 as i32 - b2 as i32;
    dr * dr + dg * dg + db * db
}

/// Collapses a 256-color index onto the nearest of the 16 basic colors.
fn index_to_16(idx: u8) -> u8 {
    if idx < 16 {
        return idx;
    }
    // Crude but standard: reuse the 256-color table's RGB approximation and
    // snap to whichever basic color is closest.
    const BASIC: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    let (r, g, b) = index_256_to_rgb(idx);
    BASIC
        .iter()
        .enumerate()
        .min_by_key(|(_, &(br, bg, bb))| dist2(r, g, b, br, bg, bb))
        .map(|(i, _)| i as u8)
        .unwrap_or(7)
}

fn index_256_to_rgb(idx: u8) -> (u8, u8, u8) {
    const STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    if idx >= 232 {
        let v = 8 + (idx - 232) as u32 * 10;
        let v = v.min(255) as u8;
        (v, v, v)
    } else if idx >= 16 {
        let i = idx - 16;
        let r = STEPS[(i / 36) as usize];
        let g = STEPS[((i / 6) % 6) as usize];
        let b = STEPS[(i % 6) as usize];
        (r, g, b)
    } else {
        // Basic colors; approximate.
        let bright = idx >= 8;
        let base = if bright { 0xff } else { 0x80 };
        let bit = idx & 7;
        (
            if bit & 1 != 0 { base } else { 0 },
            if bit & 2 != 0 { base } else { 0 },
            if bit & 4 != 0 { base } else { 0 },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_never_downsamples() {
        for profile in [
            ColorProfile::NoTty,
            ColorProfile::Ascii,
            ColorProfile::Ansi16,
            ColorProfile::Ansi256,
            ColorProfile::TrueColor,
        ] {
            assert_eq!(Color::Default.downsample(profile), Color::Default);
        }
    }

    #[test]
    fn ascii_and_notty_strip_color() {
        let c = Color::rgb(255, 0, 0);
        assert_eq!(c.downsample(ColorProfile::Ascii), Color::Default);
        assert_eq!(c.downsample(ColorProfile::NoTty), Color::Default);
    }

    #[test]
    fn truecolor_passes_through() {
        let c = Color::rgb(10, 20, 30);
        assert_eq!(c.downsample(ColorProfile::TrueColor), c);
    }

    #[test]
    fn red_rgb_maps_near_red_in_256() {
        let c = Color::rgb(255, 0, 0);
        let down = c.downsample(ColorProfile::Ansi256);
        assert_eq!(down, Color::Indexed(196));
    }

    #[test]
    fn named_survives_ansi16() {
        assert_eq!(
            Color::Named(3).downsample(ColorProfile::Ansi16),
            Color::Named(3)
        );
    }
}
