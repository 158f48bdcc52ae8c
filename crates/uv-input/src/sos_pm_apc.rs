//! SOS/PM/APC string dispatch (`spec.md` §4.1 "OSC / DCS / APC dispatch").
//!
//! SOS and PM carry no defined semantics here, only the `UnknownSos`/
//! `UnknownPm` escape hatch. APC's `G<opts>;<payload>` form is Kitty
//! graphics.

use uv_events::Event;

pub fn dispatch_sos(payload: &[u8]) -> Event {
    Event::UnknownSos(payload.to_vec())
}

pub fn dispatch_pm(payload: &[u8]) -> Event {
    Event::UnknownPm(payload.to_vec())
}

pub fn dispatch_apc(payload: &[u8]) -> Event {
    if let Some(rest) = payload.strip_prefix(b"G") {
        if let Some(sep) = rest.iter().position(|&b| b == b';') {
            let opts = String::from_utf8_lossy(&rest[..sep]).into_owned();
            let payload = rest[sep + 1..].to_vec();
            return Event::KittyGraphics { opts, payload };
        }
    }
    Event::UnknownApc(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kitty_graphics_splits_opts_and_payload() {
        let ev = dispatch_apc(b"Ga=T,f=100;aGVsbG8=");
        match ev {
            Event::KittyGraphics { opts, payload } => {
                assert_eq!(opts, "a=T,f=100");
                assert_eq!(payload, b"aGVsbG8=");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_graphics_apc_is_unknown() {
        assert_eq!(dispatch_apc(b"other"), Event::UnknownApc(b"other".to_vec()));
    }
}
