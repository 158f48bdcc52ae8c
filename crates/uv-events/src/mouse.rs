//! Mouse button vocabulary shared by X10 and SGR mouse reports.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    /// A button number the legacy encoding can carry but this decoder does
    /// not assign a name to (rare on the 3-button X10 wire, more common
    /// with SGR's wider button field).
    Other(u8),
    /// Motion report with no button currently pressed.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub button: MouseButton,
    pub mods: crate::modifiers::KeyModifiers,
}
