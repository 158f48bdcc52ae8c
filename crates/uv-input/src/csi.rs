//! CSI scanning and dispatch (`spec.md` §4.1 "CSI dispatch").

use crate::legacy::LegacyTable;
use uv_events::{Event, Key, KeyEvent, KeyModifiers, MouseButton, MouseEvent};
use uv_style::{parse_params, Param};

pub struct Csi<'a> {
    pub prefix: Option<u8>,
    pub params: &'a str,
    pub has_dollar: bool,
    pub final_byte: u8,
}

/// Scans `rest` (the bytes immediately after `ESC [`) for a complete CSI
/// sequence. Returns the number of bytes consumed *from `rest`* and the
/// parsed sequence, or `None` if no final byte (0x40..=0x7E) appears yet.
pub fn scan(rest: &[u8]) -> Option<(usize, Csi<'_>)> {
    let mut i = 0;
    let mut prefix = None;
    if let Some(&b) = rest.first() {
        if matches!(b, b'<' | b'>' | b'=' | b'?') {
            prefix = Some(b);
            i += 1;
        }
    }
    let param_start = i;
    while i < rest.len() && matches!(rest[i], 0x30..=0x3B) {
        i += 1;
    }
    let param_end = i;
    while i < rest.len() && matches!(rest[i], 0x20..=0x2F) {
        i += 1;
    }
    let has_dollar = rest[param_end..i].contains(&b'$');
    let &final_byte = rest.get(i)?;
    if !(0x40..=0x7E).contains(&final_byte) {
        return None;
    }
    let params = std::str::from_utf8(&rest[param_start..param_end]).unwrap_or("");
    Some((i + 1, Csi { prefix, params, has_dollar, final_byte }))
}

fn mods_and_kind(params: &[Param], idx: usize) -> (KeyModifiers, bool, bool) {
    let Some(p) = params.get(idx) else {
        return (KeyModifiers::empty(), false, false);
    };
    let mods = KeyModifiers::from_kitty_param(p.primary.max(0) as u32);
    let kind = p.subparams.first().copied().unwrap_or(1);
    (mods, kind == 2, kind == 3)
}

fn simple_key(code: Key, params: &[Param]) -> Event {
    let (mods, is_repeat, is_release) = mods_and_kind(params, 1);
    let ev = KeyEvent {
        code,
        base_code: None,
        shifted_code: None,
        text: None,
        mods,
        is_repeat,
    };
    if is_release { Event::KeyRelease(ev) } else { Event::KeyPress(ev) }
}

fn decode_cb(cb: i64) -> (bool, bool, u8, KeyModifiers) {
    let base = (cb & 0x3) as u8;
    let mut mods = KeyModifiers::empty();
    if cb & 4 != 0 {
        mods |= KeyModifiers::SHIFT;
    }
    if cb & 8 != 0 {
        mods |= KeyModifiers::ALT;
    }
    if cb & 16 != 0 {
        mods |= KeyModifiers::CTRL;
    }
    let motion = cb & 32 != 0;
    let wheel = cb & 64 != 0;
    (wheel, motion, base, mods)
}

fn mouse_button(wheel: bool, base: u8) -> MouseButton {
    if wheel {
        match base {
            0 => MouseButton::WheelUp,
            1 => MouseButton::WheelDown,
            2 => MouseButton::WheelLeft,
            _ => MouseButton::WheelRight,
        }
    } else {
        match base {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        }
    }
}

/// Builds a mouse event from a raw `Cb` byte. `force_press` disambiguates
/// SGR's explicit `M`/`m` final byte; `None` means infer release from the
/// X10 "no button" marker (`base == 3`).
pub fn mouse_event_from(cb: i64, x: u16, y: u16, force_press: Option<bool>) -> Event {
    let (wheel, motion, base, mods) = decode_cb(cb);
    if wheel {
        return Event::MouseWheel(MouseEvent { x, y, button: mouse_button(true, base), mods });
    }
    if motion {
        return Event::MouseMotion(MouseEvent { x, y, button: mouse_button(false, base), mods });
    }
    let button = mouse_button(false, base);
    let press = force_press.unwrap_or(base != 3);
    let ev = MouseEvent { x, y, button, mods };
    if press { Event::MouseClick(ev) } else { Event::MouseRelease(ev) }
}

fn tilde_key(code: i64) -> Option<Key> {
    Some(match code {
        1 | 7 => Key::Home,
        2 => Key::Insert,
        3 => Key::Delete,
        4 | 8 => Key::End,
        5 => Key::PageUp,
        6 => Key::PageDown,
        15 => Key::F(5),
        17 => Key::F(6),
        18 => Key::F(7),
        19 => Key::F(8),
        20 => Key::F(9),
        21 => Key::F(10),
        23 => Key::F(11),
        24 => Key::F(12),
        25 => Key::F(13),
        26 => Key::F(14),
        28 => Key::F(15),
        29 => Key::F(16),
        31 => Key::F(17),
        32 => Key::F(18),
        33 => Key::F(19),
        34 => Key::F(20),
        _ => return None,
    })
}

fn kitty_functional_key(codepoint: i64) -> Option<Key> {
    Some(match codepoint {
        57344 => Key::Escape,
        57345 => Key::Enter,
        57346 => Key::Tab,
        57347 => Key::Backspace,
        57348 => Key::Insert,
        57349 => Key::Delete,
        57350 => Key::Left,
        57351 => Key::Right,
        57352 => Key::Up,
        57353 => Key::Down,
        57354 => Key::PageUp,
        57355 => Key::PageDown,
        57356 => Key::Home,
        57357 => Key::End,
        57358..=57369 => Key::F((codepoint - 57358 + 1) as u8),
        _ => return None,
    })
}

fn kitty_csi_u(params: &[Param]) -> Event {
    let Some(key_param) = params.first() else {
        return Event::UnknownCsi(Vec::new());
    };
    let codepoint = key_param.primary;
    let shifted_code = key_param
        .subparams
        .first()
        .and_then(|&cp| char::from_u32(cp as u32))
        .map(Key::Char);
    let (mods, is_repeat, is_release) = mods_and_kind(params, 1);
    let code = kitty_functional_key(codepoint)
        .or_else(|| char::from_u32(codepoint as u32).map(Key::Char))
        .unwrap_or(Key::Escape);

    let ev = KeyEvent { code, base_code: None, shifted_code, text: None, mods, is_repeat };
    if is_release { Event::KeyRelease(ev) } else { Event::KeyPress(ev) }
}

const WIN32_CTRL_SHIFT: i64 = 0x10;
const WIN32_CTRL_LEFT_CTRL: i64 = 0x8;
const WIN32_CTRL_RIGHT_CTRL: i64 = 0x4;
const WIN32_CTRL_LEFT_ALT: i64 = 0x2;
const WIN32_CTRL_RIGHT_ALT: i64 = 0x1;

fn win32_dispatch(ints: &[i64]) -> Event {
    // CSI Vk ; Sc ; Uc ; Kd ; Cs ; Rc _
    let uc = ints.get(2).copied().unwrap_or(0);
    let kd = ints.get(3).copied().unwrap_or(1);
    let cs = ints.get(4).copied().unwrap_or(0);
    let repeat = ints.get(5).copied().unwrap_or(1).max(1);

    let mut mods = KeyModifiers::empty();
    if cs & WIN32_CTRL_SHIFT != 0 {
        mods |= KeyModifiers::SHIFT;
    }
    if cs & (WIN32_CTRL_LEFT_CTRL | WIN32_CTRL_RIGHT_CTRL) != 0 {
        mods |= KeyModifiers::CTRL;
    }
    if cs & (WIN32_CTRL_LEFT_ALT | WIN32_CTRL_RIGHT_ALT) != 0 {
        mods |= KeyModifiers::ALT;
    }

    let code = char::from_u32(uc as u32).filter(|c| !c.is_control()).map(Key::Char).unwrap_or(Key::Escape);
    let make = || KeyEvent { code: code.clone(), base_code: None, shifted_code: None, text: None, mods, is_repeat: repeat > 1 };
    let one = if kd != 0 { Event::KeyPress(make()) } else { Event::KeyRelease(make()) };

    if repeat > 1 {
        Event::MultiEvent(std::iter::repeat_n(one, repeat as usize).collect())
    } else {
        one
    }
}

fn window_op(ints: &[i64]) -> Event {
    match ints.first().copied() {
        Some(4) => Event::WindowPixelSize {
            height: ints.get(1).copied().unwrap_or(0) as u16,
            width: ints.get(2).copied().unwrap_or(0) as u16,
        },
        Some(6) => Event::CellSize {
            height: ints.get(1).copied().unwrap_or(0) as u16,
            width: ints.get(2).copied().unwrap_or(0) as u16,
        },
        Some(8) => Event::WindowSize {
            height: ints.get(1).copied().unwrap_or(0) as u16,
            width: ints.get(2).copied().unwrap_or(0) as u16,
        },
        Some(op) => Event::WindowOp { op: op as u16, args: ints[1..].to_vec() },
        None => Event::WindowOp { op: 0, args: Vec::new() },
    }
}

pub fn dispatch(csi: &Csi<'_>, raw: &[u8], legacy: &LegacyTable) -> Event {
    let params = parse_params(csi.params);
    let ints: Vec<i64> = params.iter().map(|p| p.primary).collect();

    match (csi.final_byte, csi.prefix) {
        (b'A', None) => simple_key(Key::Up, &params),
        (b'B', None) => simple_key(Key::Down, &params),
        (b'C', None) => simple_key(Key::Right, &params),
        (b'D', None) => simple_key(Key::Left, &params),
        (b'F', None) => simple_key(Key::End, &params),
        (b'H', None) => simple_key(Key::Home, &params),
        (b'E', None) => simple_key(Key::Begin, &params),
        (b'P', None) => simple_key(Key::F(1), &params),
        (b'Q', None) => simple_key(Key::F(2), &params),
        (b'S', None) => simple_key(Key::F(4), &params),
        (b'Z', None) => Event::key_press(Key::BackTab, KeyModifiers::SHIFT),
        (b'R', None) => {
            let row = (ints.first().copied().unwrap_or(1).max(0) as u16).saturating_sub(1);
            let col = (ints.get(1).copied().unwrap_or(1).max(0) as u16).saturating_sub(1);
            let (mods, _, _) = mods_and_kind(&params, 1);
            Event::MultiEvent(vec![
                Event::CursorPosition { x: col, y: row },
                Event::key_press(Key::F(3), mods),
            ])
        }
        (b'R', Some(b'?')) => {
            let row = (ints.first().copied().unwrap_or(1).max(0) as u16).saturating_sub(1);
            let col = (ints.get(1).copied().unwrap_or(1).max(0) as u16).saturating_sub(1);
            Event::CursorPosition { x: col, y: row }
        }
        (b'~', None) => {
            if ints.first() == Some(&27) {
                let code = ints.get(2).copied().unwrap_or(0);
                let (mods, _, _) = mods_and_kind(&params, 1);
                let key = char::from_u32(code as u32).map(Key::Char).unwrap_or(Key::Escape);
                Event::key_press(key, mods)
            } else {
                match ints.first().copied() {
                    Some(200) => Event::PasteStart,
                    Some(201) => Event::PasteEnd,
                    Some(code) => match tilde_key(code) {
                        Some(key) => simple_key(key, &params),
                        None => Event::UnknownCsi(raw.to_vec()),
                    },
                    None => Event::UnknownCsi(raw.to_vec()),
                }
            }
        }
        (b'M', Some(b'<')) => {
            let cb = ints.first().copied().unwrap_or(0);
            let x = (ints.get(1).copied().unwrap_or(1) - 1).max(0) as u16;
            let y = (ints.get(2).copied().unwrap_or(1) - 1).max(0) as u16;
            mouse_event_from(cb, x, y, Some(true))
        }
        (b'm', Some(b'<')) => {
            let cb = ints.first().copied().unwrap_or(0);
            let x = (ints.get(1).copied().unwrap_or(1) - 1).max(0) as u16;
            let y = (ints.get(2).copied().unwrap_or(1) - 1).max(0) as u16;
            mouse_event_from(cb, x, y, Some(false))
        }
        (b'I', None) => Event::Focus,
        (b'O', None) => Event::Blur,
        (b'u', Some(b'?')) => Event::KittyEnhancements(ints.first().copied().unwrap_or(0) as u8),
        (b'u', None) => kitty_csi_u(&params),
        (b'c', Some(b'?')) => Event::PrimaryDeviceAttrs(ints),
        (b'c', Some(b'>')) => Event::SecondaryDeviceAttrs(ints),
        (b'y', _) if csi.has_dollar => Event::ModeReport {
            mode: ints.first().copied().unwrap_or(0) as u16,
            value: ints.get(1).copied().unwrap_or(0) as u8,
        },
        (b't', None) => window_op(&ints),
        (b'_', None) => win32_dispatch(&ints),
        (b'm', Some(b'>')) => Event::ModifyOtherKeys(ints.get(1).copied().unwrap_or(0) as u8),
        _ => legacy
            .lookup(raw)
            .map(|key| Event::key_press(key, KeyModifiers::empty()))
            .unwrap_or_else(|| Event::UnknownCsi(raw.to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_simple_arrow() {
        let (n, csi) = scan(b"A").unwrap();
        assert_eq!(n, 1);
        assert_eq!(csi.final_byte, b'A');
        assert!(csi.prefix.is_none());
    }

    #[test]
    fn scans_sgr_mouse_prefix() {
        let (n, csi) = scan(b"<0;10;20M").unwrap();
        assert_eq!(n, 9);
        assert_eq!(csi.prefix, Some(b'<'));
        assert_eq!(csi.final_byte, b'M');
        assert_eq!(csi.params, "0;10;20");
    }

    #[test]
    fn incomplete_sequence_returns_none() {
        assert!(scan(b"1;5").is_none());
    }

    #[test]
    fn arrow_key_dispatch_with_modifier() {
        let legacy = LegacyTable::empty();
        let (_, csi) = scan(b"1;5C").unwrap();
        let ev = dispatch(&csi, b"\x1b[1;5C", &legacy);
        match ev {
            Event::KeyPress(k) => {
                assert_eq!(k.code, Key::Right);
                assert!(k.mods.contains(KeyModifiers::CTRL));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn tilde_delete_key() {
        let legacy = LegacyTable::empty();
        let (_, csi) = scan(b"3~").unwrap();
        let ev = dispatch(&csi, b"\x1b[3~", &legacy);
        assert!(matches!(ev, Event::KeyPress(k) if k.code == Key::Delete));
    }

    #[test]
    fn sgr_mouse_press_decodes_button_and_position() {
        let legacy = LegacyTable::empty();
        let (_, csi) = scan(b"<0;11;21M").unwrap();
        let ev = dispatch(&csi, b"", &legacy);
        match ev {
            Event::MouseClick(m) => {
                assert_eq!(m.x, 10);
                assert_eq!(m.y, 20);
                assert_eq!(m.button, MouseButton::Left);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn cursor_position_report_is_ambiguous_with_f3() {
        let legacy = LegacyTable::empty();
        let (_, csi) = scan(b"5;10R").unwrap();
        let ev = dispatch(&csi, b"", &legacy);
        match ev {
            Event::MultiEvent(events) => {
                assert_eq!(events.len(), 2);
                assert!(matches!(events[0], Event::CursorPosition { x: 9, y: 4 }));
                assert!(matches!(&events[1], Event::KeyPress(k) if k.code == Key::F(3)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn s8_f3_ambiguity_scenario() {
        let legacy = LegacyTable::empty();
        let (_, csi) = scan(b"1;5R").unwrap();
        let ev = dispatch(&csi, b"", &legacy);
        match ev {
            Event::MultiEvent(events) => {
                assert_eq!(events.len(), 2);
                assert!(matches!(events[0], Event::CursorPosition { x: 4, y: 0 }));
                assert!(matches!(&events[1], Event::KeyPress(k) if k.code == Key::F(3) && k.mods.contains(KeyModifiers::CTRL)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn win32_repeat_count_expands_to_multi_event() {
        let ints = vec![0, 0, 'j' as i64, 1, 0, 3];
        let ev = win32_dispatch(&ints);
        match ev {
            Event::MultiEvent(events) => assert_eq!(events.len(), 3),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn window_op_text_area_size() {
        let ev = window_op(&[8, 40, 120]);
        assert!(matches!(ev, Event::WindowSize { height: 40, width: 120 }));
    }
}
