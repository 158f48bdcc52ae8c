//! Render telemetry (`spec.md` §4.3 supplement). A plain atomic counter set,
//! deliberately independent of any specific metrics crate so callers can
//! sample it into whatever exporter they use.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderMetrics {
    frames: AtomicU64,
    bytes_emitted: AtomicU64,
    scroll_hunks_applied: AtomicU64,
    full_clears: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderMetricsSnapshot {
    pub frames: u64,
    pub bytes_emitted: u64,
    pub scroll_hunks_applied: u64,
    pub full_clears: u64,
}

impl RenderMetrics {
    pub(crate) fn record_frame(&self, bytes: usize) {
        self.frames.fetch_add(1, Ordering::Relaxed);
        self.bytes_emitted.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_scroll_hunk(&self) {
        self.scroll_hunks_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_full_clear(&self) {
        self.full_clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RenderMetricsSnapshot {
        RenderMetricsSnapshot {
            frames: self.frames.load(Ordering::Relaxed),
            bytes_emitted: self.bytes_emitted.load(Ordering::Relaxed),
            scroll_hunks_applied: self.scroll_hunks_applied.load(Ordering::Relaxed),
            full_clears: self.full_clears.load(Ordering::Relaxed),
        }
    }
}
