//! Logical key codes and the `MatchString` grammar (`spec.md` §9) used to
//! test and print them without reflection.

use crate::modifiers::KeyModifiers;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    BackTab,
    Enter,
    Backspace,
    Delete,
    Insert,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Begin,
    PageUp,
    PageDown,
    F(u8),
    KeypadBegin,
    /// A single-codepoint printable character.
    Char(char),
    /// A multi-codepoint grapheme cluster (combining marks, ZWJ sequences,
    /// flags) that cannot be represented as one `char`.
    Extended(String),
}

impl Key {
    pub fn name(&self) -> String {
        match self {
            Key::Escape => "escape".into(),
            Key::Tab => "tab".into(),
            Key::BackTab => "backtab".into(),
            Key::Enter => "enter".into(),
            Key::Backspace => "backspace".into(),
            Key::Delete => "delete".into(),
            Key::Insert => "insert".into(),
            Key::Space => "space".into(),
            Key::Up => "up".into(),
            Key::Down => "down".into(),
            Key::Left => "left".into(),
            Key::Right => "right".into(),
            Key::Home => "home".into(),
            Key::End => "end".into(),
            Key::Begin => "begin".into(),
            Key::PageUp => "pageup".into(),
            Key::PageDown => "pagedown".into(),
            Key::F(n) => format!("f{n}"),
            Key::KeypadBegin => "kpbegin".into(),
            Key::Char(c) => c.to_string(),
            Key::Extended(s) => s.clone(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parses and matches the `ctrl+alt+x` grammar: zero or more
/// modifier tokens separated by `+`, then a key name drawn from the fixed
/// enumeration above or a single printable character.
pub fn match_string(key: &Key, mods: KeyModifiers, pattern: &str) -> bool {
    let mut want_mods = KeyModifiers::empty();
    let mut key_token: Option<&str> = None;
    for part in pattern.split('+') {
        if part.is_empty() {
            continue;
        }
        if let Some(m) = want_mods.token_name(part) {
            want_mods |= m;
        } else {
            key_token = Some(part);
        }
    }
    let Some(token) = key_token else {
        return false;
    };
    if want_mods != mods {
        return false;
    }
    if token.chars().count() == 1 {
        let ch = token.chars().next().unwrap();
        return matches!(key, Key::Char(c) if *c == ch);
    }
    token.eq_ignore_ascii_case(&key.name())
}

pub fn format_key_combo(key: &Key, mods: KeyModifiers) -> String {
    let mut parts = Vec::new();
    for (flag, name) in [
        (KeyModifiers::CTRL, "ctrl"),
        (KeyModifiers::ALT, "alt"),
        (KeyModifiers::SHIFT, "shift"),
        (KeyModifiers::META, "meta"),
        (KeyModifiers::HYPER, "hyper"),
        (KeyModifiers::SUPER, "super"),
        (KeyModifiers::CAPSLOCK, "capslock"),
        (KeyModifiers::NUMLOCK, "numlock"),
        (KeyModifiers::SCROLLLOCK, "scrolllock"),
    ] {
        if mods.contains(flag) {
            parts.push(name.to_string());
        }
    }
    parts.push(key.name());
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ctrl_plus_letter() {
        assert!(match_string(
            &Key::Char('a'),
            KeyModifiers::CTRL,
            "ctrl+a"
        ));
        assert!(!match_string(&Key::Char('a'), KeyModifiers::empty(), "ctrl+a"));
    }

    #[test]
    fn matches_named_key_without_modifiers() {
        assert!(match_string(&Key::Enter, KeyModifiers::empty(), "enter"));
    }

    #[test]
    fn format_round_trips_through_match() {
        let combo = format_key_combo(&Key::Char('x'), KeyModifiers::CTRL | KeyModifiers::ALT);
        assert!(match_string(
            &Key::Char('x'),
            KeyModifiers::CTRL | KeyModifiers::ALT,
            &combo
        ));
    }
}
