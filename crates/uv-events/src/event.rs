//! The tagged `Event` sum type produced by the input decoder (`spec.md` §3
//! "Events", §9 "Replacing runtime-dispatched event hierarchy").

use crate::key::Key;
use crate::modifiers::KeyModifiers;
use crate::mouse::MouseEvent;
use uv_model::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub code: Key,
    /// The key as it would read with no modifiers applied (e.g. `a` for
    /// `ctrl+a` on a US layout), when the decoder can tell them apart.
    pub base_code: Option<Key>,
    /// The key as it would read with Shift applied, when distinct from
    /// `code` (Kitty/fixterms protocols report this explicitly).
    pub shifted_code: Option<Key>,
    /// The literal text the keystroke would have inserted, if any —
    /// distinct from `code` for multi-codepoint clusters.
    pub text: Option<String>,
    pub mods: KeyModifiers,
    pub is_repeat: bool,
}

impl KeyEvent {
    pub fn simple(code: Key, mods: KeyModifiers) -> Self {
        Self {
            code,
            base_code: None,
            shifted_code: None,
            text: None,
            mods,
            is_repeat: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardSelection {
    System,
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    /// The terminal is asking the application for its clipboard contents
    /// (OSC 52 with a `?` payload).
    Query,
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),

    MouseClick(MouseEvent),
    MouseRelease(MouseEvent),
    MouseMotion(MouseEvent),
    MouseWheel(MouseEvent),

    Focus,
    Blur,

    PasteStart,
    Paste(String),
    PasteEnd,

    WindowSize { width: u16, height: u16 },
    WindowPixelSize { width: u16, height: u16 },
    CellSize { width: u16, height: u16 },
    WindowOp { op: u16, args: Vec<i64> },

    CursorPosition { x: u16, y: u16 },
    ForegroundColor(Color),
    BackgroundColor(Color),
    CursorColor(Color),
    DarkColorScheme,
    LightColorScheme,

    PrimaryDeviceAttrs(Vec<i64>),
    SecondaryDeviceAttrs(Vec<i64>),
    TertiaryDeviceAttrs(String),

    TerminalVersion(String),
    Capability(String),
    ModeReport { mode: u16, value: u8 },
    ModifyOtherKeys(u8),
    KittyEnhancements(u8),
    Clipboard { selection: ClipboardSelection, content: ClipboardContent },
    KittyGraphics { opts: String, payload: Vec<u8> },

    UnknownCsi(Vec<u8>),
    UnknownSs3(Vec<u8>),
    UnknownOsc(Vec<u8>),
    UnknownDcs(Vec<u8>),
    UnknownSos(Vec<u8>),
    UnknownPm(Vec<u8>),
    UnknownApc(Vec<u8>),
    UnknownEvent(Vec<u8>),

    /// Fan-out envelope: repeat-counted key events (win32) and the F3 /
    /// cursor-position-report ambiguity (`spec.md` §4.1 CSI dispatch "R").
    MultiEvent(Vec<Event>),
}

impl Event {
    pub fn key_press(code: Key, mods: KeyModifiers) -> Self {
        Event::KeyPress(KeyEvent::simple(code, mods))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_constructor() {
        let ev = Event::key_press(Key::Char('a'), KeyModifiers::CTRL);
        match ev {
            Event::KeyPress(k) => {
                assert_eq!(k.code, Key::Char('a'));
                assert!(k.mods.contains(KeyModifiers::CTRL));
            }
            _ => panic!("wrong variant"),
        }
    }
}
