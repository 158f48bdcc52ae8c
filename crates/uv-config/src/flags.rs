//! Mouse mode and legacy-key-encoding bit flags (`spec.md` §6
//! "Configuration options recognized").

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct MouseMode: u8 {
        /// Report button releases in addition to presses.
        const RELEASES_MODE   = 0b01;
        /// Report motion events even with no button held.
        const ALL_MOTION_MODE = 0b10;
    }
}

bitflags! {
    /// Alternative key mappings for terminals that predate the modern
    /// `CSI u` / xterm `modifyOtherKeys` encodings (`spec.md` §4.1).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct LegacyKeyEncoding: u16 {
        const CTRL_AT           = 0b0000_0001;
        const CTRL_I            = 0b0000_0010;
        const CTRL_M            = 0b0000_0100;
        const CTRL_OPEN_BRACKET = 0b0000_1000;
        const BACKSPACE         = 0b0001_0000;
        const FIND               = 0b0010_0000;
        const SELECT             = 0b0100_0000;
    }
}
