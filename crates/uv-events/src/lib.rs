//! Input event vocabulary: the `Event` sum type and the key/mouse/modifier
//! types it is built from. Produced by `uv-input`, consumed by application
//! code — this crate has no parsing logic of its own.

mod event;
mod key;
mod modifiers;
mod mouse;

pub use event::{ClipboardContent, ClipboardSelection, Event, KeyEvent};
pub use key::{format_key_combo, match_string, Key};
pub use modifiers::KeyModifiers;
pub use mouse::{MouseButton, MouseEvent};
