//! `$TERM` → capability bits (`spec.md` §6).

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct TerminalCapabilities: u16 {
        const VPA = 0b0000_0001;
        const HPA = 0b0000_0010;
        const CHT = 0b0000_0100;
        const CBT = 0b0000_1000;
        const REP = 0b0001_0000;
        const ECH = 0b0010_0000;
        const ICH = 0b0100_0000;
        const SD  = 0b1000_0000;
        const SU  = 0b1_0000_0000;
    }
}

const ALL_BUT_CHT: TerminalCapabilities = TerminalCapabilities::all().difference(TerminalCapabilities::CHT);
const ALL_BUT_REP: TerminalCapabilities = TerminalCapabilities::all().difference(TerminalCapabilities::REP);
const LINUX_SUBSET: TerminalCapabilities = TerminalCapabilities::VPA
    .union(TerminalCapabilities::HPA)
    .union(TerminalCapabilities::ECH)
    .union(TerminalCapabilities::ICH);

impl TerminalCapabilities {
    /// Looks the `$TERM` value up in the prefix table. Unrecognized or
    /// absent values get no capabilities at all.
    pub fn from_term(term: &str) -> Self {
        const FULL: &[&str] = &[
            "contour", "foot", "ghostty", "kitty", "rio", "st", "tmux", "wezterm", "xterm",
        ];
        if FULL.iter().any(|p| term.starts_with(p)) {
            Self::all()
        } else if term.starts_with("alacritty") {
            ALL_BUT_CHT
        } else if term.starts_with("screen") {
            ALL_BUT_REP
        } else if term.starts_with("linux") {
            LINUX_SUBSET
        } else {
            Self::empty()
        }
    }

    /// Reads `$TERM` from the process environment.
    pub fn detect() -> Self {
        match std::env::var("TERM") {
            Ok(term) => Self::from_term(&term),
            Err(_) => Self::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xterm_gets_everything() {
        assert_eq!(TerminalCapabilities::from_term("xterm-256color"), TerminalCapabilities::all());
    }

    #[test]
    fn alacritty_lacks_cht_only() {
        let caps = TerminalCapabilities::from_term("alacritty");
        assert!(!caps.contains(TerminalCapabilities::CHT));
        assert!(caps.contains(TerminalCapabilities::CBT));
    }

    #[test]
    fn screen_lacks_rep_only() {
        let caps = TerminalCapabilities::from_term("screen-256color");
        assert!(!caps.contains(TerminalCapabilities::REP));
        assert!(caps.contains(TerminalCapabilities::VPA));
    }

    #[test]
    fn linux_gets_minimal_subset() {
        let caps = TerminalCapabilities::from_term("linux");
        assert_eq!(caps, LINUX_SUBSET);
        assert!(!caps.contains(TerminalCapabilities::SU));
    }

    #[test]
    fn unknown_term_gets_nothing() {
        assert_eq!(TerminalCapabilities::from_term("dumb"), TerminalCapabilities::empty());
    }
}
