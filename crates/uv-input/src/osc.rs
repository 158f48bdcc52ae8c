//! OSC string dispatch (`spec.md` §4.1 "OSC / DCS / APC dispatch").

use base64::Engine;
use uv_events::{ClipboardContent, ClipboardSelection, Event};
use uv_model::Color;

fn parse_color(spec: &str) -> Option<Color> {
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Color::rgb(r, g, b));
        }
        return None;
    }
    let rest = spec.strip_prefix("rgb:")?;
    let mut parts = rest.split('/');
    let component = |s: &str| -> Option<u8> {
        // Each component is 1-4 hex digits; take the most significant byte.
        let value = u32::from_str_radix(s, 16).ok()?;
        let scale_bits = (s.len() * 4) as u32;
        Some((value << (16 - scale_bits.min(16)) >> 8) as u8)
    };
    let r = component(parts.next()?)?;
    let g = component(parts.next()?)?;
    let b = component(parts.next()?)?;
    Some(Color::rgb(r, g, b))
}

pub fn dispatch(payload: &[u8]) -> Event {
    let Ok(text) = std::str::from_utf8(payload) else {
        return Event::UnknownOsc(payload.to_vec());
    };
    let mut fields = text.splitn(2, ';');
    let Some(cmd) = fields.next() else {
        return Event::UnknownOsc(payload.to_vec());
    };
    let rest = fields.next().unwrap_or("");

    match cmd {
        "10" => parse_color(rest).map(Event::ForegroundColor).unwrap_or_else(|| Event::UnknownOsc(payload.to_vec())),
        "11" => parse_color(rest).map(Event::BackgroundColor).unwrap_or_else(|| Event::UnknownOsc(payload.to_vec())),
        "12" => parse_color(rest).map(Event::CursorColor).unwrap_or_else(|| Event::UnknownOsc(payload.to_vec())),
        "52" => {
            let mut parts = rest.splitn(2, ';');
            let selection = match parts.next() {
                Some("p") => ClipboardSelection::Primary,
                _ => ClipboardSelection::System,
            };
            let data = parts.next().unwrap_or("");
            let content = if data == "?" {
                ClipboardContent::Query
            } else {
                match base64::engine::general_purpose::STANDARD.decode(data) {
                    Ok(bytes) => ClipboardContent::Data(bytes),
                    Err(_) => return Event::UnknownOsc(payload.to_vec()),
                }
            };
            Event::Clipboard { selection, content }
        }
        _ => Event::UnknownOsc(payload.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hash_hex_color() {
        assert_eq!(parse_color("#ff8040"), Some(Color::rgb(0xff, 0x80, 0x40)));
    }

    #[test]
    fn parses_rgb_colon_color() {
        assert_eq!(parse_color("rgb:ffff/8080/4040"), Some(Color::rgb(0xff, 0x80, 0x40)));
    }

    #[test]
    fn foreground_color_report() {
        let ev = dispatch(b"10;rgb:ffff/0000/0000");
        assert_eq!(ev, Event::ForegroundColor(Color::rgb(0xff, 0, 0)));
    }

    #[test]
    fn clipboard_query_is_distinguished_from_data() {
        assert_eq!(
            dispatch(b"52;c;?"),
            Event::Clipboard { selection: ClipboardSelection::System, content: ClipboardContent::Query }
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode("hi");
        let payload = format!("52;p;{encoded}");
        assert_eq!(
            dispatch(payload.as_bytes()),
            Event::Clipboard {
                selection: ClipboardSelection::Primary,
                content: ClipboardContent::Data(b"hi".to_vec())
            }
        );
    }

    #[test]
    fn unknown_command_falls_back() {
        assert_eq!(dispatch(b"9;foo"), Event::UnknownOsc(b"9;foo".to_vec()));
    }
}
