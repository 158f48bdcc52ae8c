//! Legacy key escape lookup table (`spec.md` §4.1 "Legacy key lookup").
//!
//! Terminfo database lookup is an external collaborator (`spec.md` §1); this
//! is the small built-in table of sequences the general CSI/SS3 dispatch
//! doesn't already recognize, keyed on `$TERM`. Unknown CSI/SS3 sequences
//! fall back to this table before becoming `UnknownEvent`/`UnknownCsi`.

use std::collections::HashMap;
use uv_events::Key;

#[derive(Debug, Clone, Default)]
pub struct LegacyTable {
    entries: HashMap<Vec<u8>, Key>,
}

impl LegacyTable {
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Builds the table appropriate for a `$TERM` value. `linux` and the
    /// `rxvt` family diverge from the xterm CSI conventions this decoder's
    /// general dispatch otherwise assumes.
    pub fn from_term(term: &str) -> Self {
        let mut entries = HashMap::new();
        if term.starts_with("linux") {
            for (seq, key) in [
                (&b"\x1b[[A"[..], Key::F(1)),
                (&b"\x1b[[B"[..], Key::F(2)),
                (&b"\x1b[[C"[..], Key::F(3)),
                (&b"\x1b[[D"[..], Key::F(4)),
                (&b"\x1b[[E"[..], Key::F(5)),
            ] {
                entries.insert(seq.to_vec(), key);
            }
        }
        if term.starts_with("rxvt") {
            for (seq, key) in [
                (&b"\x1b[7~"[..], Key::Home),
                (&b"\x1b[8~"[..], Key::End),
                (&b"\x1bOa"[..], Key::Up),
                (&b"\x1bOb"[..], Key::Down),
                (&b"\x1bOc"[..], Key::Right),
                (&b"\x1bOd"[..], Key::Left),
            ] {
                entries.insert(seq.to_vec(), key);
            }
        }
        Self { entries }
    }

    pub fn lookup(&self, seq: &[u8]) -> Option<Key> {
        self.entries.get(seq).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_term_maps_function_keys() {
        let table = LegacyTable::from_term("linux");
        assert_eq!(table.lookup(b"\x1b[[A"), Some(Key::F(1)));
    }

    #[test]
    fn rxvt_term_maps_home_end() {
        let table = LegacyTable::from_term("rxvt-unicode");
        assert_eq!(table.lookup(b"\x1b[7~"), Some(Key::Home));
        assert_eq!(table.lookup(b"\x1bOc"), Some(Key::Right));
    }

    #[test]
    fn unknown_term_has_empty_table() {
        let table = LegacyTable::from_term("xterm-256color");
        assert_eq!(table.lookup(b"\x1b[[A"), None);
    }
}
