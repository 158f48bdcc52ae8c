//! Color profile inference from the environment (`spec.md` §6 "Color
//! profile").

pub use uv_model::ColorProfile;

/// Infers the downsample target from `$COLORTERM`/`$TERM` and whether the
/// output stream is a TTY. Mirrors the precedence most terminal libraries
/// use: an explicit `COLORTERM=truecolor`/`24bit` wins, then `$TERM`'s
/// `-256color` suffix, then a conservative 16-color default.
pub fn infer_color_profile(colorterm: Option<&str>, term: Option<&str>, is_tty: bool) -> ColorProfile {
    if !is_tty {
        return ColorProfile::NoTty;
    }
    if let Some(ct) = colorterm {
        if ct == "truecolor" || ct == "24bit" {
            return ColorProfile::TrueColor;
        }
    }
    match term {
        Some(t) if t.contains("256color") => ColorProfile::Ansi256,
        Some(t) if t == "dumb" => ColorProfile::Ascii,
        Some(_) => ColorProfile::Ansi16,
        None => ColorProfile::Ascii,
    }
}

/// Reads `$COLORTERM`/`$TERM` from the process environment.
pub fn detect_color_profile(is_tty: bool) -> ColorProfile {
    infer_color_profile(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
        is_tty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_tty_disables_everything() {
        assert_eq!(infer_color_profile(Some("truecolor"), Some("xterm"), false), ColorProfile::NoTty);
    }

    #[test]
    fn colorterm_truecolor_wins() {
        assert_eq!(infer_color_profile(Some("truecolor"), Some("xterm"), true), ColorProfile::TrueColor);
    }

    #[test]
    fn term_256color_suffix() {
        assert_eq!(infer_color_profile(None, Some("xterm-256color"), true), ColorProfile::Ansi256);
    }

    #[test]
    fn dumb_term_is_ascii() {
        assert_eq!(infer_color_profile(None, Some("dumb"), true), ColorProfile::Ascii);
    }

    #[test]
    fn plain_term_is_ansi16() {
        assert_eq!(infer_color_profile(None, Some("xterm"), true), ColorProfile::Ansi16);
    }
}
