//! DCS string dispatch (`spec.md` §4.1 "OSC / DCS / APC dispatch").

use uv_events::Event;

fn hex_decode_ascii(hex: &str) -> Option<String> {
    if hex.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(hex.len() / 2);
    let bytes = hex.as_bytes();
    for pair in bytes.chunks(2) {
        let byte = u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok()?;
        out.push(byte);
    }
    String::from_utf8(out).ok()
}

pub fn dispatch(payload: &[u8]) -> Event {
    let Ok(text) = std::str::from_utf8(payload) else {
        return Event::UnknownDcs(payload.to_vec());
    };

    if let Some(version) = text.strip_prefix(">|") {
        return Event::TerminalVersion(version.to_string());
    }
    if let Some(hex) = text.strip_prefix("!|") {
        return hex_decode_ascii(hex).map(Event::TertiaryDeviceAttrs).unwrap_or_else(|| Event::UnknownDcs(payload.to_vec()));
    }
    if let Some(rest) = text.strip_prefix("1+r") {
        if let Some((name_hex, value_hex)) = rest.split_once('=') {
            if let (Some(name), Some(value)) = (hex_decode_ascii(name_hex), hex_decode_ascii(value_hex)) {
                return Event::Capability(format!("{name}={value}"));
            }
        }
        return Event::UnknownDcs(payload.to_vec());
    }
    Event::UnknownDcs(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xtversion_report() {
        assert_eq!(dispatch(b">|foo 1.0"), Event::TerminalVersion("foo 1.0".to_string()));
    }

    #[test]
    fn da3_hex_decodes_to_ascii() {
        // "ABC" = 414243
        assert_eq!(dispatch(b"!|414243"), Event::TertiaryDeviceAttrs("ABC".to_string()));
    }

    #[test]
    fn xtgettcap_capability() {
        // name "Co" = 436f, value "256" = 323536
        assert_eq!(dispatch(b"1+r436f=323536"), Event::Capability("Co=256".to_string()));
    }

    #[test]
    fn unrecognized_falls_back_to_unknown() {
        assert_eq!(dispatch(b"garbage"), Event::UnknownDcs(b"garbage".to_vec()));
    }
}
