//! The top-level `Decoder`: resolves the lone-ESC ambiguity, bracketed
//! paste, and dispatches completed CSI/SS3/OSC/DCS/SOS/PM/APC sequences
//! (`spec.md` §4.1).

use crate::bytes::{is_c0_control, is_c1_control, BEL, CAN, ESC, PASTE_END, ST_FINAL, SUB};
use crate::csi;
use crate::legacy::LegacyTable;
use crate::{dcs, osc, sos_pm_apc};
use unicode_segmentation::UnicodeSegmentation;
use uv_config::LegacyKeyEncoding;
use uv_events::{Event, Key, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasteState {
    Idle,
    Active,
}

/// A single-threaded, resumable ANSI decoder. Holds the legacy-key lookup
/// table and the handful of bits of state that survive across `decode`
/// calls: bracketed-paste mode and the configured legacy control-byte
/// mappings.
pub struct Decoder {
    legacy: LegacyTable,
    legacy_keys: LegacyKeyEncoding,
    paste: PasteState,
}

/// `consumed == 0` means "need more bytes"; the accompanying `Event` is a
/// placeholder the caller must not act on.
fn need_more() -> (usize, Event) {
    (0, Event::UnknownEvent(Vec::new()))
}

fn find_sub(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Finds a BEL or 7-bit ST terminator. Returns `(payload_len, total_len)`.
fn find_terminator(buf: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < buf.len() {
        if buf[i] == BEL {
            return Some((i, i + 1));
        }
        if buf[i] == ESC && buf.get(i + 1) == Some(&ST_FINAL) {
            return Some((i, i + 2));
        }
        i += 1;
    }
    None
}

impl Decoder {
    pub fn new(legacy: LegacyTable, legacy_keys: LegacyKeyEncoding) -> Self {
        Self { legacy, legacy_keys, paste: PasteState::Idle }
    }

    /// One-shot decode of the longest recognized prefix of `input`.
    /// `expired` forces disambiguation of a pending ambiguous prefix (the
    /// ESC-timeout in `stream_events` having fired).
    pub fn decode(&mut self, input: &[u8], expired: bool) -> (usize, Event) {
        if input.is_empty() {
            return need_more();
        }
        if self.paste == PasteState::Active {
            return self.decode_paste(input);
        }
        let b = input[0];
        if b == ESC {
            return self.decode_escape(input, expired);
        }
        if is_c0_control(b) || is_c1_control(b) {
            return (1, self.decode_control(b));
        }
        self.decode_printable(input)
    }

    fn decode_paste(&mut self, input: &[u8]) -> (usize, Event) {
        let term_pos = find_sub(input, PASTE_END);
        let cancel_pos = input.iter().position(|&b| b == CAN || b == SUB);
        match (term_pos, cancel_pos) {
            (Some(t), Some(c)) if c < t => {
                self.paste = PasteState::Idle;
                (c + 1, Event::UnknownEvent(input[..c].to_vec()))
            }
            (Some(t), _) => {
                self.paste = PasteState::Idle;
                let text = String::from_utf8_lossy(&input[..t]).into_owned();
                (t + PASTE_END.len(), Event::MultiEvent(vec![Event::Paste(text), Event::PasteEnd]))
            }
            (None, Some(c)) => {
                self.paste = PasteState::Idle;
                (c + 1, Event::UnknownEvent(input[..c].to_vec()))
            }
            (None, None) => need_more(),
        }
    }

    fn decode_control(&self, b: u8) -> Event {
        let legacy = self.legacy_keys;
        match b {
            0x00 if legacy.contains(LegacyKeyEncoding::CTRL_AT) => Event::key_press(Key::Char('@'), KeyModifiers::CTRL),
            0x00 => Event::key_press(Key::Space, KeyModifiers::CTRL),
            0x09 if legacy.contains(LegacyKeyEncoding::CTRL_I) => Event::key_press(Key::Char('i'), KeyModifiers::CTRL),
            0x09 => Event::key_press(Key::Tab, KeyModifiers::empty()),
            0x0D if legacy.contains(LegacyKeyEncoding::CTRL_M) => Event::key_press(Key::Char('m'), KeyModifiers::CTRL),
            0x0D => Event::key_press(Key::Enter, KeyModifiers::empty()),
            0x01..=0x1A => Event::key_press(Key::Char((b + 0x60) as char), KeyModifiers::CTRL),
            0x1C..=0x1F => Event::key_press(Key::Char((b + 0x40) as char), KeyModifiers::CTRL),
            0x7F if legacy.contains(LegacyKeyEncoding::BACKSPACE) => Event::key_press(Key::Delete, KeyModifiers::empty()),
            0x7F => Event::key_press(Key::Backspace, KeyModifiers::empty()),
            0x80..=0x9F => Event::key_press(Key::Char((b - 0x40) as char), KeyModifiers::CTRL | KeyModifiers::ALT),
            _ => Event::UnknownEvent(vec![b]),
        }
    }

    fn decode_escape(&mut self, input: &[u8], expired: bool) -> (usize, Event) {
        match input.get(1) {
            None => {
                if expired {
                    (1, Event::key_press(Key::Escape, KeyModifiers::empty()))
                } else {
                    need_more()
                }
            }
            Some(b'[') => self.decode_csi(input, expired),
            Some(b']') => self.decode_string(input, 2, expired, osc::dispatch, Event::UnknownOsc),
            Some(b'P') => self.decode_string(input, 2, expired, dcs::dispatch, Event::UnknownDcs),
            Some(b'X') => self.decode_string(input, 2, expired, sos_pm_apc::dispatch_sos, Event::UnknownSos),
            Some(b'^') => self.decode_string(input, 2, expired, sos_pm_apc::dispatch_pm, Event::UnknownPm),
            Some(b'_') => self.decode_string(input, 2, expired, sos_pm_apc::dispatch_apc, Event::UnknownApc),
            Some(b'O') => self.decode_ss3(input, expired),
            Some(&ESC) => (2, Event::key_press(Key::Escape, KeyModifiers::ALT)),
            Some(&b) if (0x21..=0x7E).contains(&b) => {
                (2, Event::key_press(Key::Char(b as char), KeyModifiers::ALT))
            }
            Some(&b) if is_c0_control(b) => (2, apply_alt(self.decode_control(b))),
            _ => {
                if expired || input.len() >= 2 {
                    (2, Event::UnknownEvent(input[..2].to_vec()))
                } else {
                    need_more()
                }
            }
        }
    }

    fn decode_csi(&mut self, input: &[u8], expired: bool) -> (usize, Event) {
        let rest = &input[2..];
        if rest.first() == Some(&b'M') {
            if rest.len() < 4 {
                return if expired {
                    (input.len(), Event::UnknownEvent(input.to_vec()))
                } else {
                    need_more()
                };
            }
            let cb = rest[1].wrapping_sub(32) as i64;
            let x = rest[2].wrapping_sub(32).saturating_sub(1) as u16;
            let y = rest[3].wrapping_sub(32).saturating_sub(1) as u16;
            return (6, csi::mouse_event_from(cb, x, y, None));
        }
        match csi::scan(rest) {
            Some((n, parsed)) => {
                let consumed = 2 + n;
                let raw = &input[..consumed];
                let event = csi::dispatch(&parsed, raw, &self.legacy);
                if matches!(event, Event::PasteStart) {
                    self.paste = PasteState::Active;
                }
                (consumed, event)
            }
            None => {
                if expired {
                    (input.len(), Event::UnknownEvent(input.to_vec()))
                } else {
                    need_more()
                }
            }
        }
    }

    fn decode_ss3(&self, input: &[u8], expired: bool) -> (usize, Event) {
        let rest = &input[2..];
        let mut i = 0;
        while i < rest.len() && matches!(rest[i], b'0'..=b'9' | b';') {
            i += 1;
        }
        let Some(&final_byte) = rest.get(i) else {
            return if expired {
                (input.len(), Event::UnknownEvent(input.to_vec()))
            } else {
                need_more()
            };
        };
        let params_str = std::str::from_utf8(&rest[..i]).unwrap_or("");
        let mods = params_str
            .split(';')
            .nth(1)
            .and_then(|s| s.parse::<u32>().ok())
            .map(KeyModifiers::from_kitty_param)
            .unwrap_or(KeyModifiers::empty());

        let consumed = 2 + i + 1;
        let raw = &input[..consumed];
        let key = match final_byte {
            b'A' => Some(Key::Up),
            b'B' => Some(Key::Down),
            b'C' => Some(Key::Right),
            b'D' => Some(Key::Left),
            b'H' => Some(Key::Home),
            b'F' => Some(Key::End),
            b'P' => Some(Key::F(1)),
            b'Q' => Some(Key::F(2)),
            b'R' => Some(Key::F(3)),
            b'S' => Some(Key::F(4)),
            _ => None,
        };
        let event = match key {
            Some(k) => Event::key_press(k, mods),
            None => self
                .legacy
                .lookup(raw)
                .map(|k| Event::key_press(k, mods))
                .unwrap_or_else(|| Event::UnknownSs3(raw.to_vec())),
        };
        (consumed, event)
    }

    fn decode_string<F, U>(&self, input: &[u8], header_len: usize, expired: bool, f: F, unknown: U) -> (usize, Event)
    where
        F: Fn(&[u8]) -> Event,
        U: Fn(Vec<u8>) -> Event,
    {
        let rest = &input[header_len..];
        match find_terminator(rest) {
            Some((payload_len, total)) => (header_len + total, f(&rest[..payload_len])),
            None => {
                if expired {
                    (input.len(), unknown(rest.to_vec()))
                } else {
                    need_more()
                }
            }
        }
    }

    fn decode_printable(&self, input: &[u8]) -> (usize, Event) {
        let mut end = 0;
        while end < input.len() {
            let b = input[end];
            if b < 0x20 || b == 0x7F || b == ESC {
                break;
            }
            end += 1;
        }
        let slice = &input[..end];
        let text = match std::str::from_utf8(slice) {
            Ok(s) => s,
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if valid_up_to == 0 {
                    if end == input.len() {
                        return need_more();
                    }
                    return (1, Event::UnknownEvent(vec![input[0]]));
                }
                // SAFETY-free: re-validate the known-good prefix.
                std::str::from_utf8(&slice[..valid_up_to]).unwrap_or("")
            }
        };
        if text.is_empty() {
            return need_more();
        }
        let Some(cluster) = text.graphemes(true).next() else {
            return need_more();
        };
        let consumed = cluster.len();
        let mut chars = cluster.chars();
        let first = chars.next().expect("non-empty cluster");
        if chars.next().is_none() {
            if first.is_ascii_uppercase() {
                let ev = KeyEvent {
                    code: Key::Char(first),
                    base_code: Some(Key::Char(first.to_ascii_lowercase())),
                    shifted_code: Some(Key::Char(first)),
                    text: Some(cluster.to_string()),
                    mods: KeyModifiers::SHIFT,
                    is_repeat: false,
                };
                (consumed, Event::KeyPress(ev))
            } else {
                (consumed, Event::key_press(Key::Char(first), KeyModifiers::empty()))
            }
        } else {
            let ev = KeyEvent {
                code: Key::Extended(cluster.to_string()),
                base_code: None,
                shifted_code: None,
                text: Some(cluster.to_string()),
                mods: KeyModifiers::empty(),
                is_repeat: false,
            };
            (consumed, Event::KeyPress(ev))
        }
    }
}

fn apply_alt(event: Event) -> Event {
    match event {
        Event::KeyPress(mut k) => {
            k.mods |= KeyModifiers::ALT;
            Event::KeyPress(k)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> Decoder {
        Decoder::new(LegacyTable::empty(), LegacyKeyEncoding::empty())
    }

    #[test]
    fn plain_ascii_char() {
        let (n, ev) = decoder().decode(b"a", false);
        assert_eq!(n, 1);
        assert!(matches!(ev, Event::KeyPress(k) if k.code == Key::Char('a')));
    }

    #[test]
    fn uppercase_sets_shift() {
        let (_, ev) = decoder().decode(b"A", false);
        match ev {
            Event::KeyPress(k) => {
                assert_eq!(k.code, Key::Char('A'));
                assert!(k.mods.contains(KeyModifiers::SHIFT));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn ctrl_a_from_soh() {
        let (n, ev) = decoder().decode(&[0x01], false);
        assert_eq!(n, 1);
        match ev {
            Event::KeyPress(k) => {
                assert_eq!(k.code, Key::Char('a'));
                assert!(k.mods.contains(KeyModifiers::CTRL));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn lone_escape_is_ambiguous_until_expired() {
        let mut d = decoder();
        let (n, _) = d.decode(b"\x1b", false);
        assert_eq!(n, 0);
        let (n, ev) = d.decode(b"\x1b", true);
        assert_eq!(n, 1);
        assert!(matches!(ev, Event::KeyPress(k) if k.code == Key::Escape));
    }

    #[test]
    fn escape_then_printable_is_alt_combo() {
        let (n, ev) = decoder().decode(b"\x1bx", false);
        assert_eq!(n, 2);
        match ev {
            Event::KeyPress(k) => {
                assert_eq!(k.code, Key::Char('x'));
                assert!(k.mods.contains(KeyModifiers::ALT));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn incomplete_csi_needs_more_bytes() {
        let (n, _) = decoder().decode(b"\x1b[1;", false);
        assert_eq!(n, 0);
    }

    #[test]
    fn csi_arrow_key() {
        let (n, ev) = decoder().decode(b"\x1b[A", false);
        assert_eq!(n, 3);
        assert!(matches!(ev, Event::KeyPress(k) if k.code == Key::Up));
    }

    #[test]
    fn bracketed_paste_round_trip() {
        let mut d = decoder();
        let (n, ev) = d.decode(b"\x1b[200~", false);
        assert_eq!(n, 6);
        assert!(matches!(ev, Event::PasteStart));

        let (n, ev) = d.decode(b"hello\x1b[201~", false);
        assert_eq!(n, b"hello\x1b[201~".len());
        match ev {
            Event::MultiEvent(events) => {
                assert!(matches!(&events[0], Event::Paste(s) if s == "hello"));
                assert!(matches!(events[1], Event::PasteEnd));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn paste_cancelled_by_can_byte() {
        let mut d = decoder();
        d.decode(b"\x1b[200~", false);
        let (n, ev) = d.decode(b"abc\x18", false);
        assert_eq!(n, 4);
        assert!(matches!(ev, Event::UnknownEvent(_)));
    }

    #[test]
    fn x10_mouse_press() {
        let (n, ev) = decoder().decode(&[ESC, b'[', b'M', 32, 33, 34], false);
        assert_eq!(n, 6);
        assert!(matches!(ev, Event::MouseClick(_)));
    }

    #[test]
    fn ss3_arrow_key() {
        let (n, ev) = decoder().decode(b"\x1bOA", false);
        assert_eq!(n, 3);
        assert!(matches!(ev, Event::KeyPress(k) if k.code == Key::Up));
    }

    #[test]
    fn osc_color_report() {
        let (n, ev) = decoder().decode(b"\x1b]10;rgb:ffff/0000/0000\x07", false);
        assert_eq!(n, b"\x1b]10;rgb:ffff/0000/0000\x07".len());
        assert!(matches!(ev, Event::ForegroundColor(_)));
    }

    #[test]
    fn multibyte_grapheme_consumes_whole_cluster() {
        let (n, ev) = decoder().decode("é".as_bytes(), false);
        assert_eq!(n, "é".len());
        assert!(matches!(ev, Event::KeyPress(k) if k.code == Key::Char('é')));
    }
}
