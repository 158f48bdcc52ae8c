//! Scroll optimizer (`spec.md` §4.6). Detects whole-row shifts between
//! `current_buffer` and the target so a single `SU`/`SD`/`DECSTBM` sequence
//! can replace many individual `transform_line` calls. Alt-screen only.

use crate::seq;
use ahash::RandomState;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use uv_model::Line;
use uv_term::TerminalCapabilities;

/// Fixed so the same content hashes identically across frames; randomizing
/// per-process would make `oldhash`/`newhash` incomparable.
const HASH_SEEDS: (u64, u64, u64, u64) = (0x9E37_79B9, 0x85EB_CA6B, 0xC2B2_AE35, 0x27D4_EB2F);

const MIN_HUNK_LEN: usize = 3;
const SHIFT_SLACK: usize = 2;

pub fn line_hash(line: &Line) -> u64 {
    let state = RandomState::with_seeds(HASH_SEEDS.0, HASH_SEEDS.1, HASH_SEEDS.2, HASH_SEEDS.3);
    let mut hasher = state.build_hasher();
    for cell in line.iter() {
        cell.hash(&mut hasher);
    }
    hasher.finish()
}

pub fn hash_all(lines: &[Line]) -> Vec<u64> {
    lines.iter().map(line_hash).collect()
}

#[derive(Debug, Clone, Copy)]
struct Hunk {
    new_start: usize,
    old_start: usize,
    len: usize,
    shift: i64,
}

/// For each new row, the unique old row it matches, or `None` if ambiguous
/// (duplicate hash on either side) or unmatched.
fn match_rows(old_hashes: &[u64], new_hashes: &[u64]) -> Vec<Option<usize>> {
    let mut old_count: HashMap<u64, usize> = HashMap::new();
    let mut old_pos: HashMap<u64, usize> = HashMap::new();
    for (i, &h) in old_hashes.iter().enumerate() {
        *old_count.entry(h).or_insert(0) += 1;
        old_pos.insert(h, i);
    }
    let mut new_count: HashMap<u64, usize> = HashMap::new();
    for &h in new_hashes {
        *new_count.entry(h).or_insert(0) += 1;
    }

    new_hashes
        .iter()
        .map(|h| {
            if old_count.get(h) == Some(&1) && new_count.get(h) == Some(&1) {
                old_pos.get(h).copied()
            } else {
                None
            }
        })
        .collect()
}

fn find_hunks(oldnum: &[Option<usize>]) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut y = 0;
    while y < oldnum.len() {
        let Some(old_start) = oldnum[y] else {
            y += 1;
            continue;
        };
        let shift = old_start as i64 - y as i64;
        let mut end = y;
        while end + 1 < oldnum.len() {
            match oldnum[end + 1] {
                Some(next_old) if next_old as i64 - (end + 1) as i64 == shift => end += 1,
                _ => break,
            }
        }
        let len = end - y + 1;
        if shift != 0 && len >= MIN_HUNK_LEN && shift.unsigned_abs() as usize <= len + SHIFT_SLACK {
            hunks.push(Hunk { new_start: y, old_start, len, shift });
        }
        y = end + 1;
    }
    hunks
}

fn best_hunk(hunks: &[Hunk]) -> Option<Hunk> {
    hunks.iter().copied().max_by_key(|h| h.len)
}

/// Emits the scroll sequence for `hunk` and mutates `current` in place to
/// reflect it (so the caller's subsequent `transform_line` passes compare
/// against the post-scroll baseline). Returns `None` if no capability-backed
/// path exists, in which case the caller should fall back to per-line
/// transforms.
fn apply_hunk(
    hunk: Hunk,
    current: &mut [Line],
    width: u16,
    height: u16,
    caps: TerminalCapabilities,
) -> Option<Vec<u8>> {
    let shift = hunk.shift;
    let mut out = Vec::new();

    if shift > 0 {
        let s = shift as u16;
        // Scrolling up: the matched content starts at row 0 and the hunk
        // runs to exactly where the `s` freshly-exposed rows begin.
        let full_screen = hunk.new_start == 0 && hunk.new_start + hunk.len == height as usize - s as usize;
        if full_screen && caps.contains(TerminalCapabilities::SU) {
            out.extend(seq::su(s));
        } else if full_screen {
            // No SU: with the hunk spanning the whole screen, `DL` at the
            // top row or plain newlines at the bottom row both reproduce a
            // full-screen scroll without needing a custom region. Pick
            // whichever is fewer bytes.
            let mut dl_tier = seq::cup(1, 1);
            dl_tier.extend(seq::dl(s));
            let mut nl_tier = seq::cup(1, height);
            nl_tier.extend(seq::lf(s));
            out.extend(if dl_tier.len() <= nl_tier.len() { dl_tier } else { nl_tier });
        } else {
            let top = hunk.new_start as u16 + 1;
            let bottom = (hunk.new_start + hunk.len) as u16 + s;
            out.extend(seq::decstbm(top, bottom));
            out.extend(seq::cup(1, bottom));
            out.extend(seq::su(s));
            out.extend(seq::decstbm_reset());
        }
    } else {
        let s = (-shift) as u16;
        // Scrolling down: the hunk ends at the last row and starts exactly
        // where the `s` freshly-exposed rows leave off.
        let full_screen = hunk.new_start == s as usize && hunk.new_start + hunk.len == height as usize;
        if full_screen && caps.contains(TerminalCapabilities::SD) {
            out.extend(seq::sd(s));
        } else if full_screen {
            // No SD: `IL` at the top row spans the whole screen the same
            // way a custom region would, without needing one.
            out.extend(seq::cup(1, 1));
            out.extend(seq::il(s));
        } else {
            let top = hunk.new_start as u16 + 1 - s;
            let bottom = (hunk.new_start + hunk.len) as u16;
            out.extend(seq::decstbm(top, bottom));
            out.extend(seq::cup(1, top));
            out.extend(seq::sd(s));
            out.extend(seq::decstbm_reset());
        }
    }

    let blank = Line::blank(width);
    let old_snapshot: Vec<Line> = current.to_vec();
    for i in 0..hunk.len {
        let new_y = hunk.new_start + i;
        let old_y = hunk.old_start + i;
        current[new_y] = old_snapshot.get(old_y).cloned().unwrap_or_else(|| blank.clone());
    }

    Some(out)
}

/// Attempts a scroll-based shortcut for this frame. `current` is mutated to
/// reflect whatever the chosen scroll sequence achieves; remaining
/// differences are left for the per-line transformer. Runs only when
/// `alt_screen` is set, per `spec.md` §4.6.
pub fn scroll_optimize(
    current: &mut [Line],
    target: &[Line],
    width: u16,
    height: u16,
    caps: TerminalCapabilities,
    alt_screen: bool,
) -> Vec<u8> {
    if !alt_screen || current.len() != target.len() {
        return Vec::new();
    }
    let old_hashes = hash_all(current);
    let new_hashes = hash_all(target);
    let oldnum = match_rows(&old_hashes, &new_hashes);
    let hunks = find_hunks(&oldnum);
    match best_hunk(&hunks) {
        Some(hunk) => {
            tracing::trace!(target: "render.scroll", shift = hunk.shift, len = hunk.len, "scroll_hunk_accepted");
            apply_hunk(hunk, current, width, height, caps).unwrap_or_default()
        }
        None => Vec::new(),
    }
}
