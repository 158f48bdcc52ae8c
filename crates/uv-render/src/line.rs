//! Line transformer (`spec.md` §4.5). Diffs one row of `current_buffer`
//! against the target and writes the minimal byte span, collapsing runs via
//! `ECH`/`REP` and detecting whole-row shifts via `ICH`/`DCH`. Cursor motion
//! to the start of the dirty span is the caller's job (the motion planner);
//! this module only emits the cell-writing bytes and reports where the
//! cursor ends up.

use crate::seq;
use uv_model::{Cell, ColorProfile, Line, Link, Style};
use uv_term::TerminalCapabilities;

const RUN_THRESHOLD: usize = 4;

/// The renderer's idea of "what the terminal would print next", tracked
/// across line writes so style/link escapes are only emitted on change.
#[derive(Debug, Clone, Default)]
pub struct Pen {
    pub style: Style,
    pub link: Link,
}

pub struct Outcome {
    pub bytes: Vec<u8>,
    /// Column the cursor ends up at after the emitted bytes.
    pub end_col: u16,
    pub at_phantom: bool,
}

fn cells_equal(a: &Cell, b: &Cell) -> bool {
    a.content == b.content && a.width == b.width && a.style == b.style && a.link == b.link
}

pub(crate) fn first_diff(current: &Line, target: &Line) -> Option<usize> {
    (0..target.len_cols()).find(|&x| !cells_equal(current.at(x).unwrap(), target.at(x).unwrap()))
}

fn last_diff(current: &Line, target: &Line) -> usize {
    (0..target.len_cols())
        .rev()
        .find(|&x| !cells_equal(current.at(x).unwrap(), target.at(x).unwrap()))
        .unwrap_or(0)
}

fn last_non_blank(line: &Line) -> Option<usize> {
    (0..line.len_cols()).rev().find(|&x| !line.at(x).unwrap().is_blank())
}

/// Writes one cell through the pen, emitting a style/link escape first if
/// either differs from the pen's current state. Placeholder cells are
/// invisible: no bytes, no pen change.
fn write_cell(out: &mut Vec<u8>, pen: &mut Pen, cell: &Cell, profile: ColorProfile) {
    if cell.is_placeholder() {
        return;
    }
    if cell.style != pen.style {
        out.extend(uv_style::diff(&pen.style, &cell.style, profile));
        pen.style = cell.style;
    }
    if cell.link != pen.link {
        if cell.link.is_empty() {
            out.extend(uv_style::encode_close());
        } else {
            out.extend(uv_style::encode_open(&cell.link));
        }
        pen.link = cell.link.clone();
    }
    out.extend(cell.content.as_bytes());
}

/// Detects a rightward shift: does `target[from+k..=to]` equal
/// `current[from..=to-k]`? Returns the smallest qualifying `k`.
fn detect_ich_shift(current: &Line, target: &Line, from: usize, to: usize) -> Option<usize> {
    let span = to - from + 1;
    for k in 1..span {
        let matches = (from + k..=to).all(|x| cells_equal(current.at(x - k).unwrap(), target.at(x).unwrap()));
        if matches {
            return Some(k);
        }
    }
    None
}

/// Detects a leftward shift: does `target[from..=to-k]` equal
/// `current[from+k..=to]`?
fn detect_dch_shift(current: &Line, target: &Line, from: usize, to: usize) -> Option<usize> {
    let span = to - from + 1;
    for k in 1..span {
        if to < from + k {
            break;
        }
        let matches = (from..=to - k).all(|x| cells_equal(current.at(x + k).unwrap(), target.at(x).unwrap()));
        if matches {
            return Some(k);
        }
    }
    None
}

/// Counts columns from the left edge that are blank.
fn leading_blank_count(line: &Line) -> usize {
    (0..line.len_cols()).take_while(|&x| line.at(x).unwrap().is_blank()).count()
}

/// `spec.md` §4.5 step 2: if the target row has grown more leading blanks
/// than the current row, erasing from column 0 with `EL1` can be cheaper
/// than overwriting the newly-blanked span cell by cell. Assumes the
/// cursor is at `first`; returns the column the cursor ends up at if it
/// emitted anything.
fn leading_blank_erase(
    current: &Line,
    target: &Line,
    first: usize,
    caps: TerminalCapabilities,
    out: &mut Vec<u8>,
) -> Option<usize> {
    let current_lead = leading_blank_count(current);
    let target_lead = leading_blank_count(target);
    if target_lead <= current_lead || first != current_lead {
        return None;
    }
    let gap = target_lead - first;
    let overwrite_cost = if caps.contains(TerminalCapabilities::ECH) { 4 } else { gap };
    let el1_cost = (if gap > 1 { seq::cuf((gap - 1) as u16).len() } else { 0 })
        + seq::erase_line_left().len()
        + seq::cuf(1).len();
    if el1_cost >= overwrite_cost {
        return None;
    }
    if gap > 1 {
        out.extend(seq::cuf((gap - 1) as u16));
    }
    out.extend(seq::erase_line_left());
    out.extend(seq::cuf(1));
    Some(target_lead)
}

/// Emits `target[from..=to]`, collapsing blank runs via `ECH` and identical
/// ASCII runs via `REP` when the terminal supports them.
fn emit_range(
    out: &mut Vec<u8>,
    target: &Line,
    from: usize,
    to: usize,
    width: u16,
    caps: TerminalCapabilities,
    pen: &mut Pen,
    profile: ColorProfile,
) {
    let mut x = from;
    while x <= to {
        let cell = target.at(x).unwrap();

        if cell.is_blank() && caps.contains(TerminalCapabilities::ECH) {
            let mut run_end = x;
            while run_end < to && target.at(run_end + 1).unwrap().is_blank() {
                run_end += 1;
            }
            let run_len = run_end - x + 1;
            if run_len >= RUN_THRESHOLD {
                if cell.style != pen.style || !cell.link.is_empty() {
                    write_cell(out, pen, cell, profile);
                    out.extend(seq::ech((run_len - 1) as u16));
                    out.extend(seq::cuf((run_len - 1) as u16));
                } else {
                    out.extend(seq::ech(run_len as u16));
                    out.extend(seq::cuf(run_len as u16));
                }
                x = run_end + 1;
                continue;
            }
        }

        if cell.width == 1
            && cell.content.len() == 1
            && cell.content.as_bytes()[0].is_ascii_graphic()
            && caps.contains(TerminalCapabilities::REP)
        {
            let mut run_end = x;
            while run_end < to && cells_equal(target.at(run_end + 1).unwrap(), cell) {
                run_end += 1;
            }
            let run_len = run_end - x + 1;
            if run_len >= RUN_THRESHOLD {
                let reaches_margin = run_end as u16 == width - 1;
                let rep_count = if reaches_margin { run_len - 2 } else { run_len - 1 };
                write_cell(out, pen, cell, profile);
                if rep_count > 0 {
                    out.extend(seq::rep(rep_count as u16));
                }
                if reaches_margin {
                    out.extend(cell.content.as_bytes());
                }
                x = run_end + 1;
                continue;
            }
        }

        write_cell(out, pen, cell, profile);
        x += 1;
    }
}

/// Emits the tail of the dirty span (from `from` through `last`), applying
/// the trailing-blank `ECH` trim and the last-column autowrap guard. Returns
/// the column the cursor ends up at.
#[allow(clippy::too_many_arguments)]
fn emit_tail(
    out: &mut Vec<u8>,
    target: &Line,
    from: usize,
    last: usize,
    target_tail: Option<usize>,
    width: u16,
    caps: TerminalCapabilities,
    alt_screen: bool,
    is_last_row: bool,
    pen: &mut Pen,
    profile: ColorProfile,
) -> usize {
    let effective_last = match target_tail {
        Some(tb) if tb < last && caps.contains(TerminalCapabilities::ECH) => tb,
        _ => last,
    };

    let corner = alt_screen && is_last_row && effective_last as u16 == width - 1;
    if corner {
        out.extend(seq::autowrap(false));
    }
    emit_range(out, target, from, effective_last, width, caps, pen, profile);
    if effective_last < last {
        out.extend(seq::erase_line_right());
    }
    if corner {
        out.extend(seq::autowrap(true));
    }
    effective_last + 1
}

/// Transforms row `current` into row `target`, returning `None` if the row
/// is already clean. Assumes the cursor is already positioned at the start
/// of the dirty span (the caller plans that motion separately).
pub fn transform_line(
    current: &Line,
    target: &Line,
    width: u16,
    caps: TerminalCapabilities,
    profile: ColorProfile,
    alt_screen: bool,
    is_last_row: bool,
    pen: &mut Pen,
) -> Option<Outcome> {
    let first = first_diff(current, target)?;
    let last = last_diff(current, target);
    let target_tail = last_non_blank(target);

    let mut out = Vec::new();

    if let Some(start) = leading_blank_erase(current, target, first, caps, &mut out) {
        if start > last {
            return Some(finish(out, start, width, alt_screen, last));
        }
        let end_col = emit_tail(&mut out, target, start, last, target_tail, width, caps, alt_screen, is_last_row, pen, profile);
        return Some(finish(out, end_col, width, alt_screen, last));
    }

    if let Some(k) = detect_ich_shift(current, target, first, last) {
        if caps.contains(TerminalCapabilities::ICH) && k < last - first + 1 {
            out.extend(seq::ich(k as u16));
            emit_range(&mut out, target, first, first + k - 1, width, caps, pen, profile);
            return Some(finish(out, first + k, width, alt_screen, last));
        }
    }
    if let Some(k) = detect_dch_shift(current, target, first, last) {
        if k < last - first + 1 {
            out.extend(seq::dch(k as u16));
            let revealed_from = last + 1 - k;
            let revealed_to = last.min(target.len_cols() - 1);
            if revealed_from <= revealed_to {
                emit_range(&mut out, target, revealed_from, revealed_to, width, caps, pen, profile);
            }
            return Some(finish(out, revealed_to + 1, width, alt_screen, last));
        }
    }

    let end_col = emit_tail(&mut out, target, first, last, target_tail, width, caps, alt_screen, is_last_row, pen, profile);
    Some(finish(out, end_col, width, alt_screen, last))
}

fn finish(bytes: Vec<u8>, end_col: usize, width: u16, _alt_screen: bool, _last: usize) -> Outcome {
    let at_phantom = end_col as u16 >= width;
    let end_col = if at_phantom { width - 1 } else { end_col as u16 };
    Outcome { bytes, end_col, at_phantom }
}
