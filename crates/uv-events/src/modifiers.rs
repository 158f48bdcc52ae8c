//! Key modifier bitset, shared by keyboard and mouse events.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct KeyModifiers: u16 {
        const SHIFT      = 0b0_0000_0001;
        const ALT        = 0b0_0000_0010;
        const CTRL       = 0b0_0000_0100;
        const SUPER      = 0b0_0000_1000;
        const HYPER      = 0b0_0001_0000;
        const META       = 0b0_0010_0000;
        const CAPSLOCK   = 0b0_0100_0000;
        const NUMLOCK    = 0b0_1000_0000;
        const SCROLLLOCK = 0b1_0000_0000;
    }
}

impl KeyModifiers {
    /// Decode the Kitty/fixterms `mod` sub-parameter: the wire value minus 1
    /// is a bitmask over `{shift,alt,ctrl,super,hyper,meta,capslock,numlock}`
    /// (`spec.md` §4.1 CSI dispatch table).
    pub fn from_kitty_param(raw: u32) -> Self {
        let bits = raw.saturating_sub(1);
        let mut out = KeyModifiers::empty();
        if bits & 0b0000_0001 != 0 {
            out |= KeyModifiers::SHIFT;
        }
        if bits & 0b0000_0010 != 0 {
            out |= KeyModifiers::ALT;
        }
        if bits & 0b0000_0100 != 0 {
            out |= KeyModifiers::CTRL;
        }
        if bits & 0b0000_1000 != 0 {
            out |= KeyModifiers::SUPER;
        }
        if bits & 0b0001_0000 != 0 {
            out |= KeyModifiers::HYPER;
        }
        if bits & 0b0010_0000 != 0 {
            out |= KeyModifiers::META;
        }
        if bits & 0b0100_0000 != 0 {
            out |= KeyModifiers::CAPSLOCK;
        }
        if bits & 0b1000_0000 != 0 {
            out |= KeyModifiers::NUMLOCK;
        }
        out
    }

    pub fn token_name(self, token: &str) -> Option<Self> {
        Some(match token.to_ascii_lowercase().as_str() {
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            "ctrl" | "control" => KeyModifiers::CTRL,
            "super" => KeyModifiers::SUPER,
            "hyper" => KeyModifiers::HYPER,
            "meta" => KeyModifiers::META,
            "capslock" => KeyModifiers::CAPSLOCK,
            "numlock" => KeyModifiers::NUMLOCK,
            "scrolllock" => KeyModifiers::SCROLLLOCK,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kitty_param_1_is_no_modifiers() {
        assert_eq!(KeyModifiers::from_kitty_param(1), KeyModifiers::empty());
    }

    #[test]
    fn kitty_param_decodes_shift_and_ctrl() {
        // shift(1) | ctrl(4) = 5, +1 => wire value 6
        let m = KeyModifiers::from_kitty_param(6);
        assert!(m.contains(KeyModifiers::SHIFT));
        assert!(m.contains(KeyModifiers::CTRL));
        assert!(!m.contains(KeyModifiers::ALT));
    }
}
