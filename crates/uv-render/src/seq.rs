//! Raw ANSI/VT byte builders shared by the motion planner, line transformer,
//! and scroll optimizer. Kept free of any higher-level state so each can be
//! unit tested against a literal byte string.

pub fn cup(col1: u16, row1: u16) -> Vec<u8> {
    format!("\x1b[{row1};{col1}H").into_bytes()
}

pub fn cuu(n: u16) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        b"\x1b[A".to_vec()
    } else {
        format!("\x1b[{n}A").into_bytes()
    }
}

pub fn cud(n: u16) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        b"\x1b[B".to_vec()
    } else {
        format!("\x1b[{n}B").into_bytes()
    }
}

pub fn cuf(n: u16) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        b"\x1b[C".to_vec()
    } else {
        format!("\x1b[{n}C").into_bytes()
    }
}

pub fn cub(n: u16) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        b"\x1b[D".to_vec()
    } else {
        format!("\x1b[{n}D").into_bytes()
    }
}

pub fn vpa(row1: u16) -> Vec<u8> {
    format!("\x1b[{row1}d").into_bytes()
}

pub fn hpa(col1: u16) -> Vec<u8> {
    format!("\x1b[{col1}G").into_bytes()
}

pub fn cr() -> Vec<u8> {
    b"\r".to_vec()
}

pub fn lf(n: u16) -> Vec<u8> {
    b"\n".repeat(n as usize)
}

pub fn ri() -> Vec<u8> {
    b"\x1bM".to_vec()
}

pub fn backspace(n: u16) -> Vec<u8> {
    b"\x08".repeat(n as usize)
}

pub fn tab(n: u16) -> Vec<u8> {
    b"\t".repeat(n as usize)
}

pub fn cbt(n: u16) -> Vec<u8> {
    format!("\x1b[{n}Z").into_bytes()
}

pub fn cursor_home() -> Vec<u8> {
    b"\x1b[H".to_vec()
}

pub fn erase_display_all() -> Vec<u8> {
    b"\x1b[2J".to_vec()
}

pub fn erase_below() -> Vec<u8> {
    b"\x1b[0J".to_vec()
}

pub fn erase_line_right() -> Vec<u8> {
    b"\x1b[0K".to_vec()
}

pub fn erase_line_left() -> Vec<u8> {
    b"\x1b[1K".to_vec()
}

pub fn ech(n: u16) -> Vec<u8> {
    format!("\x1b[{n}X").into_bytes()
}

pub fn rep(n: u16) -> Vec<u8> {
    format!("\x1b[{n}b").into_bytes()
}

pub fn ich(n: u16) -> Vec<u8> {
    format!("\x1b[{n}@").into_bytes()
}

pub fn dch(n: u16) -> Vec<u8> {
    format!("\x1b[{n}P").into_bytes()
}

pub fn su(n: u16) -> Vec<u8> {
    format!("\x1b[{n}S").into_bytes()
}

pub fn sd(n: u16) -> Vec<u8> {
    format!("\x1b[{n}T").into_bytes()
}

pub fn dl(n: u16) -> Vec<u8> {
    format!("\x1b[{n}M").into_bytes()
}

pub fn il(n: u16) -> Vec<u8> {
    format!("\x1b[{n}L").into_bytes()
}

pub fn decstbm(top1: u16, bottom1: u16) -> Vec<u8> {
    format!("\x1b[{top1};{bottom1}r").into_bytes()
}

pub fn decstbm_reset() -> Vec<u8> {
    b"\x1b[r".to_vec()
}

pub fn autowrap(enabled: bool) -> Vec<u8> {
    if enabled {
        b"\x1b[?7h".to_vec()
    } else {
        b"\x1b[?7l".to_vec()
    }
}

pub fn cursor_visible(visible: bool) -> Vec<u8> {
    if visible {
        b"\x1b[?25h".to_vec()
    } else {
        b"\x1b[?25l".to_vec()
    }
}

pub fn enter_alt_screen() -> Vec<u8> {
    b"\x1b[?1049h".to_vec()
}

pub fn exit_alt_screen() -> Vec<u8> {
    b"\x1b[?1049l".to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_motions_omit_count() {
        assert_eq!(cuu(1), b"\x1b[A");
        assert_eq!(cud(1), b"\x1b[B");
        assert_eq!(cuf(1), b"\x1b[C");
        assert_eq!(cub(1), b"\x1b[D");
    }

    #[test]
    fn multi_step_motions_include_count() {
        assert_eq!(cuu(3), b"\x1b[3A");
        assert_eq!(cup(5, 7), b"\x1b[7;5H");
    }

    #[test]
    fn zero_length_motions_are_empty() {
        assert!(cuu(0).is_empty());
        assert!(cub(0).is_empty());
    }
}
