//! Cursor motion planner (`spec.md` §4.4).
//!
//! Builds several candidate byte sequences for moving the cursor from one
//! cell to another and picks the shortest. Stateless: callers own cursor
//! tracking and feed back `from`/`to` each time.

use crate::seq;
use uv_model::Position;
use uv_term::TerminalCapabilities;

/// Distance beyond which a move is no longer "local" and an absolute
/// positioning candidate should be favored.
const LOCAL_THRESHOLD: i32 = 8;

#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    pub capabilities: TerminalCapabilities,
    pub hard_tabs: bool,
    pub backspace: bool,
    pub relative_cursor: bool,
    pub alt_screen: bool,
    pub width: u16,
    pub height: u16,
    /// Deepest row reached so far this frame in inline mode; bounds how far
    /// an `LF` burst is allowed to run without triggering an unplanned
    /// scroll.
    pub scroll_height: u16,
    pub tab_stops: &'a [u16],
}

fn is_local(from: Position, to: Position, _ctx: &MotionContext) -> bool {
    if from.is_unknown() {
        return false;
    }
    let manhattan = (from.col - to.col).unsigned_abs() as i32 + (from.row - to.row).unsigned_abs() as i32;
    let near_edge = to.col <= 1 || to.row <= 1;
    manhattan <= LOCAL_THRESHOLD || near_edge
}

fn shortest(candidates: Vec<Vec<u8>>) -> Vec<u8> {
    candidates.into_iter().min_by_key(|c| c.len()).unwrap_or_default()
}

fn forward_tabs(from_col: u16, to_col: u16, tab_stops: &[u16]) -> Option<u16> {
    let mut col = from_col;
    let mut count = 0u16;
    for &stop in tab_stops.iter().filter(|&&s| s > from_col) {
        if stop > to_col {
            break;
        }
        col = stop;
        count += 1;
        if col == to_col {
            return Some(count);
        }
    }
    None
}

fn backward_tabs(from_col: u16, to_col: u16, tab_stops: &[u16]) -> Option<u16> {
    let mut col = from_col;
    let mut count = 0u16;
    for &stop in tab_stops.iter().rev().filter(|&&s| s < from_col) {
        if stop < to_col {
            break;
        }
        col = stop;
        count += 1;
        if col == to_col {
            return Some(count);
        }
    }
    None
}

/// Vertical-only component of the move, or `None` if no candidate applies.
fn vertical(from_row: u16, to_row: u16, ctx: &MotionContext) -> Vec<u8> {
    if from_row == to_row {
        return Vec::new();
    }
    let mut candidates = Vec::new();
    if to_row > from_row {
        let n = to_row - from_row;
        candidates.push(seq::cud(n));
        if !ctx.relative_cursor && ctx.capabilities.contains(TerminalCapabilities::VPA) {
            candidates.push(seq::vpa(to_row + 1));
        }
        let reaches_within_screen = to_row < ctx.height || !ctx.alt_screen;
        if reaches_within_screen {
            candidates.push(seq::lf(n));
        }
    } else {
        let n = from_row - to_row;
        candidates.push(seq::cuu(n));
        if !ctx.relative_cursor && ctx.capabilities.contains(TerminalCapabilities::VPA) {
            candidates.push(seq::vpa(to_row + 1));
        }
        if n == 1 {
            candidates.push(seq::ri());
        }
    }
    shortest(candidates)
}

/// Horizontal-only component. `overwrite_forward`, if given, is the exact
/// byte span that would be printed to advance the cursor by re-emitting
/// cells whose style already matches the pen (only valid moving forward).
fn horizontal(
    from_col: u16,
    to_col: u16,
    ctx: &MotionContext,
    overwrite_forward: Option<&[u8]>,
) -> Vec<u8> {
    if from_col == to_col {
        return Vec::new();
    }
    let mut candidates = Vec::new();
    if to_col > from_col {
        let n = to_col - from_col;
        candidates.push(seq::cuf(n));
        if !ctx.relative_cursor && ctx.capabilities.contains(TerminalCapabilities::HPA) {
            candidates.push(seq::hpa(to_col + 1));
        }
        if let Some(bytes) = overwrite_forward {
            candidates.push(bytes.to_vec());
        }
        if ctx.hard_tabs && ctx.capabilities.contains(TerminalCapabilities::CHT) {
            if let Some(k) = forward_tabs(from_col, to_col, ctx.tab_stops) {
                candidates.push(seq::tab(k));
            }
        }
    } else {
        let n = from_col - to_col;
        candidates.push(seq::cub(n));
        if !ctx.relative_cursor && ctx.capabilities.contains(TerminalCapabilities::HPA) {
            candidates.push(seq::hpa(to_col + 1));
        }
        if ctx.backspace {
            candidates.push(seq::backspace(n));
        }
        if ctx.hard_tabs && ctx.capabilities.contains(TerminalCapabilities::CBT) {
            if let Some(k) = backward_tabs(from_col, to_col, ctx.tab_stops) {
                candidates.push(seq::cbt(k));
            }
        }
    }
    shortest(candidates)
}

/// Plans the move `from -> to`, returning the shortest candidate sequence.
///
/// `never_moved` anchors a leading `\r` when relative-cursor tracking is in
/// effect and the cursor has not yet been explicitly placed this session.
pub fn plan(
    from: Position,
    to: Position,
    ctx: &MotionContext,
    overwrite_forward: Option<&[u8]>,
    never_moved: bool,
) -> Vec<u8> {
    let mut candidates = Vec::new();
    let force_absolute = from.is_unknown() || !is_local(from, to, ctx);

    candidates.push(seq::cup(to.col as u16 + 1, to.row as u16 + 1));

    if !force_absolute {
        let mut combo = vertical(from.row as u16, to.row as u16, ctx);
        combo.extend(horizontal(from.col as u16, to.col as u16, ctx, overwrite_forward));
        candidates.push(combo);
    }

    if !from.is_unknown() && from.row == to.row {
        let mut combo = seq::cr();
        combo.extend(horizontal(0, to.col as u16, ctx, overwrite_forward));
        candidates.push(combo);
    }

    if !ctx.relative_cursor {
        let mut combo = seq::cursor_home();
        combo.extend(vertical(0, to.row as u16, ctx));
        combo.extend(horizontal(0, to.col as u16, ctx, overwrite_forward));
        candidates.push(combo);
    }

    let mut best = shortest(candidates);
    if ctx.relative_cursor && !ctx.alt_screen && never_moved {
        let mut anchored = seq::cr();
        anchored.extend(best);
        best = anchored;
    }
    best
}
