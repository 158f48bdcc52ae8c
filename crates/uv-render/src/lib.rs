//! Ultraviolet's differential renderer: turns a caller-built [`Buffer`] into
//! the minimal ANSI byte stream that transforms the terminal's actual state
//! into the target, by diffing against a shadow copy of the last frame
//! (`spec.md` §4.3 "Renderer").

mod error;
mod line;
mod metrics;
mod motion;
mod scroll;
mod seq;

pub use error::{Error, Result};
pub use line::Pen;
pub use metrics::{RenderMetrics, RenderMetricsSnapshot};
pub use motion::MotionContext;

use uv_config::RenderFlags;
use uv_model::{Buffer, Cell, ColorProfile, Position};
use uv_term::{Sink, TerminalCapabilities};

const DEFAULT_TAB_WIDTH: u16 = 8;

fn default_tab_stops(width: u16) -> Vec<u16> {
    (DEFAULT_TAB_WIDTH..width).step_by(DEFAULT_TAB_WIDTH as usize).collect()
}

/// Owns the shadow buffer, cursor tracking, and pending output for one
/// terminal. Parameterized over [`Sink`] so tests can render into a `Vec<u8>`
/// instead of a real terminal.
pub struct Renderer<W: Sink> {
    sink: W,
    pending: Vec<u8>,
    current: Option<Buffer>,
    cursor: Position,
    pen: Pen,
    cursor_visible: bool,
    never_moved: bool,
    at_phantom: bool,
    capabilities: TerminalCapabilities,
    flags: RenderFlags,
    color_profile: ColorProfile,
    tab_stops: Vec<u16>,
    clear_pending: bool,
    scroll_height: u16,
    metrics: RenderMetrics,
}

impl<W: Sink> Renderer<W> {
    pub fn new(sink: W, capabilities: TerminalCapabilities, flags: RenderFlags, color_profile: ColorProfile) -> Self {
        Self {
            sink,
            pending: Vec::new(),
            current: None,
            cursor: Position::UNKNOWN,
            pen: Pen::default(),
            cursor_visible: true,
            never_moved: true,
            at_phantom: false,
            capabilities,
            flags,
            color_profile,
            tab_stops: Vec::new(),
            clear_pending: true,
            scroll_height: 0,
            metrics: RenderMetrics::default(),
        }
    }

    pub fn render_metrics(&self) -> RenderMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn set_relative_cursor(&mut self, on: bool) {
        self.flags.relative_cursor = on;
    }

    pub fn set_color_profile(&mut self, profile: ColorProfile) {
        self.color_profile = profile;
    }

    pub fn set_hard_tabs(&mut self, on: bool) {
        self.flags.hard_tabs = on;
    }

    pub fn set_backspace(&mut self, on: bool) {
        self.flags.backspace = on;
    }

    pub fn set_map_newline(&mut self, on: bool) {
        self.flags.map_newline = on;
    }

    pub fn enter_alt_screen(&mut self) {
        self.pending.extend(seq::enter_alt_screen());
        self.flags.alt_screen = true;
        self.clear_pending = true;
        self.cursor = Position::UNKNOWN;
        self.never_moved = true;
    }

    pub fn exit_alt_screen(&mut self) {
        self.pending.extend(seq::exit_alt_screen());
        self.flags.alt_screen = false;
        self.clear_pending = true;
        self.cursor = Position::UNKNOWN;
        self.never_moved = true;
    }

    pub fn show_cursor(&mut self) {
        if !self.cursor_visible {
            self.pending.extend(seq::cursor_visible(true));
            self.cursor_visible = true;
        }
    }

    pub fn hide_cursor(&mut self) {
        if self.cursor_visible {
            self.pending.extend(seq::cursor_visible(false));
            self.cursor_visible = false;
        }
    }

    /// Forces a full repaint on the next `render` call.
    pub fn erase(&mut self) {
        self.clear_pending = true;
    }

    pub fn redraw(&mut self, target: &mut Buffer) -> Result<()> {
        self.erase();
        self.render(target)
    }

    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if let Some(current) = &mut self.current {
            current.resize(width, height);
        }
        self.tab_stops = default_tab_stops(width);
        self.clear_pending = true;
        self.cursor = Position::UNKNOWN;
        Ok(())
    }

    /// Queues raw cursor-motion bytes to `(x, y)` without touching any cell
    /// content.
    pub fn move_to(&mut self, x: u16, y: u16) {
        let to = Position::new(x as i32, y as i32);
        let bytes = motion::plan(self.cursor, to, &self.motion_ctx(), None, self.never_moved);
        self.pending.extend(bytes);
        self.cursor = to;
        self.never_moved = false;
        self.at_phantom = false;
    }

    /// Pass-through: appends raw bytes directly to the pending output.
    /// Invalidates cursor tracking, since the caller may have moved it.
    pub fn write(&mut self, raw: &[u8]) {
        self.pending.extend_from_slice(raw);
        self.cursor = Position::UNKNOWN;
    }

    pub fn write_string(&mut self, s: &str) {
        self.write(s.as_bytes());
    }

    /// Inserts `text` as a new line above the current viewport (e.g. a log
    /// line printed above a running inline progress display). Only
    /// meaningful outside alt-screen.
    pub fn prepend_string(&mut self, text: &str) {
        self.prepend_lines(std::iter::once(text));
    }

    pub fn prepend_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        if self.flags.alt_screen {
            return;
        }
        self.pending.extend(seq::cr());
        for line in lines {
            self.pending.extend(seq::il(1));
            self.pending.extend(line.as_bytes());
            self.pending.extend(seq::lf(1));
        }
        self.cursor = Position::UNKNOWN;
        self.never_moved = true;
    }

    pub fn flush(&mut self) -> Result<()> {
        if !self.pending.is_empty() {
            self.sink.write_all(&self.pending)?;
            self.metrics.record_frame(self.pending.len());
            self.pending.clear();
        }
        Ok(())
    }

    fn motion_ctx(&self) -> MotionContext<'_> {
        MotionContext {
            capabilities: self.capabilities,
            hard_tabs: self.flags.hard_tabs,
            backspace: self.flags.backspace,
            relative_cursor: self.flags.relative_cursor,
            alt_screen: self.flags.alt_screen,
            width: self.current.as_ref().map(|b| b.width()).unwrap_or(0),
            height: self.current.as_ref().map(|b| b.height()).unwrap_or(0),
            scroll_height: self.scroll_height,
            tab_stops: &self.tab_stops,
        }
    }

    fn ensure_buffer(&mut self, width: u16, height: u16) {
        match &mut self.current {
            Some(current) if current.width() == width && current.height() == height => {}
            Some(current) => current.resize(width, height),
            None => self.current = Some(Buffer::new(width, height)),
        }
        if self.tab_stops.is_empty() {
            self.tab_stops = default_tab_stops(width);
        }
    }

    fn row_dirty(current: &Buffer, target: &Buffer, y: u16) -> bool {
        if target.touched(y).is_some() {
            return true;
        }
        match (current.line(y), target.line(y)) {
            (Some(a), Some(b)) => line::first_diff(a, b).is_some(),
            _ => false,
        }
    }

    /// The seven-step render pipeline (`spec.md` §4.3). Emits bytes for the
    /// minimum diff between the shadow buffer and `target`; does not flush.
    pub fn render(&mut self, target: &mut Buffer) -> Result<()> {
        let (width, height) = (target.width(), target.height());
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        // Step 1: rescale the shadow buffer to match, if needed.
        self.ensure_buffer(width, height);

        let was_visible = self.cursor_visible;
        let mut out = Vec::new();
        if was_visible {
            out.extend(seq::cursor_visible(false));
        }

        if self.clear_pending {
            self.emit_full_clear(&mut out);
        } else {
            self.scroll_and_clear_bottom(&mut out, target, width, height);
        }

        // Step 2/4: repaint whatever rows still differ.
        self.repaint_dirty_rows(&mut out, target, width, height)?;

        // Step 5: settle the cursor at the bottom in inline mode.
        if !self.flags.alt_screen && self.scroll_height < height.saturating_sub(1) {
            self.move_cursor(&mut out, Position::new(0, height as i32 - 1));
        }

        if was_visible {
            out.extend(seq::cursor_visible(true));
        }

        // Step 6/7: clear dirty windows, reset the pen for the next frame.
        target.mark_all_clean();
        self.pen = Pen::default();

        self.pending.extend(out);
        Ok(())
    }

    fn emit_full_clear(&mut self, out: &mut Vec<u8>) {
        if self.flags.alt_screen {
            out.extend(seq::cursor_home());
            out.extend(seq::erase_display_all());
        } else if self.flags.relative_cursor {
            // Relative-cursor mode forbids absolute positioning: return to
            // the buffer's row 0 with CR plus however many rows up we've
            // drifted, instead of an absolute CUP.
            out.extend(seq::cr());
            if !self.cursor.is_unknown() && self.cursor.row > 0 {
                out.extend(seq::cuu(self.cursor.row as u16));
            }
            out.extend(seq::erase_below());
        } else {
            out.extend(seq::cup(1, 1));
            out.extend(seq::erase_below());
        }
        if let Some(current) = &mut self.current {
            current.fill(Cell::blank());
        }
        self.cursor = Position::new(0, 0);
        self.never_moved = false;
        self.at_phantom = false;
        self.clear_pending = false;
        self.metrics.record_full_clear();
    }

    fn scroll_and_clear_bottom(&mut self, out: &mut Vec<u8>, target: &Buffer, width: u16, height: u16) {
        let any_dirty = (0..height).any(|y| Self::row_dirty(self.current.as_ref().unwrap(), target, y));
        if !any_dirty {
            return;
        }

        if let Some(current) = &mut self.current {
            let target_lines: Vec<_> = (0..height).map(|y| target.line(y).unwrap().clone()).collect();
            let bytes =
                scroll::scroll_optimize(current.lines_mut(), &target_lines, width, height, self.capabilities, self.flags.alt_screen);
            if !bytes.is_empty() {
                out.extend(bytes);
                self.metrics.record_scroll_hunk();
                self.cursor = Position::UNKNOWN;
            }
        }

        // clear_bottom: trailing rows that are blank on both sides get one
        // move + erase-below instead of per-row transforms.
        let current = self.current.as_ref().unwrap();
        let mut first_trailing_blank = height;
        for y in (0..height).rev() {
            let c = current.line(y).unwrap();
            let t = target.line(y).unwrap();
            let both_blank = c.iter().all(|cell| cell.is_blank()) && t.iter().all(|cell| cell.is_blank());
            if both_blank {
                first_trailing_blank = y;
            } else {
                break;
            }
        }
        if first_trailing_blank < height {
            self.move_cursor(out, Position::new(0, first_trailing_blank as i32));
            out.extend(seq::erase_below());
            if let Some(current) = &mut self.current {
                for y in first_trailing_blank..height {
                    current.set_line(y, uv_model::Line::blank(width));
                }
            }
        }
    }

    fn repaint_dirty_rows(&mut self, out: &mut Vec<u8>, target: &Buffer, width: u16, height: u16) -> Result<()> {
        for y in 0..height {
            let current = self.current.as_ref().unwrap();
            let current_line = current.line(y).unwrap();
            let target_line = target.line(y).unwrap();
            let Some(first) = line::first_diff(current_line, target_line) else {
                continue;
            };

            self.move_cursor(out, Position::new(first as i32, y as i32));

            let current = self.current.as_ref().unwrap();
            let current_line = current.line(y).unwrap();
            let is_last_row = y == height - 1;
            let mut pen = self.pen.clone();
            let outcome = line::transform_line(
                current_line,
                target_line,
                width,
                self.capabilities,
                self.color_profile,
                self.flags.alt_screen,
                is_last_row,
                &mut pen,
            );
            self.pen = pen;

            if let Some(outcome) = outcome {
                out.extend(outcome.bytes);
                self.cursor = Position::new(outcome.end_col as i32, y as i32);
                self.at_phantom = outcome.at_phantom;
                self.never_moved = false;
                if let Some(current) = &mut self.current {
                    current.set_line(y, target_line.clone());
                }
                if !self.flags.alt_screen {
                    self.scroll_height = self.scroll_height.max(y);
                }
            }
        }
        Ok(())
    }

    fn move_cursor(&mut self, out: &mut Vec<u8>, to: Position) {
        let bytes = motion::plan(self.cursor, to, &self.motion_ctx(), None, self.never_moved);
        out.extend(bytes);
        self.cursor = to;
        self.never_moved = false;
        self.at_phantom = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uv_model::{Link, Style};

    struct VecSink(Vec<u8>);
    impl Sink for VecSink {
        fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
            self.0.extend_from_slice(bytes);
            Ok(())
        }
    }

    fn renderer() -> Renderer<VecSink> {
        Renderer::new(VecSink(Vec::new()), TerminalCapabilities::all(), RenderFlags {
            hard_tabs: false,
            backspace: false,
            map_newline: false,
            relative_cursor: false,
            alt_screen: true,
        }, ColorProfile::Ansi16)
    }

    #[test]
    fn zero_sized_target_is_rejected() {
        let mut r = renderer();
        let mut target = Buffer::new(1, 1);
        target.resize(0, 5);
        assert!(r.render(&mut target).is_err());
    }

    #[test]
    fn first_render_forces_full_clear_and_paints_content() {
        let mut r = renderer();
        let mut target = Buffer::new(5, 2);
        target.set_cell(0, 0, Cell::new("h", 1, Style::default(), Link::default()));
        r.render(&mut target).unwrap();
        r.flush().unwrap();
        let bytes = &r.sink.0;
        assert!(bytes.windows(4).any(|w| w == b"\x1b[2J"));
        assert!(bytes.windows(1).any(|w| w == b"h"));
    }

    #[test]
    fn second_render_with_no_changes_emits_no_content_bytes() {
        let mut r = renderer();
        let mut target = Buffer::new(5, 2);
        target.set_cell(0, 0, Cell::new("h", 1, Style::default(), Link::default()));
        r.render(&mut target).unwrap();
        r.flush().unwrap();
        r.sink.0.clear();

        let mut target2 = Buffer::new(5, 2);
        target2.set_cell(0, 0, Cell::new("h", 1, Style::default(), Link::default()));
        r.render(&mut target2).unwrap();
        r.flush().unwrap();
        assert!(!r.sink.0.contains(&b'h'));
    }

    #[test]
    fn relative_cursor_first_frame_never_positions_absolutely() {
        let mut r = Renderer::new(VecSink(Vec::new()), TerminalCapabilities::all(), RenderFlags {
            hard_tabs: false,
            backspace: false,
            map_newline: false,
            relative_cursor: true,
            alt_screen: false,
        }, ColorProfile::Ansi16);

        let mut target = Buffer::new(5, 3);
        target.set_cell(0, 0, Cell::new("A", 1, Style::default(), Link::default()));
        target.set_cell(1, 0, Cell::new("B", 1, Style::default(), Link::default()));
        target.set_cell(2, 0, Cell::new("C", 1, Style::default(), Link::default()));
        r.render(&mut target).unwrap();
        r.flush().unwrap();

        let bytes = &r.sink.0;
        assert!(bytes.windows(5).any(|w| w == b"\x1b[?25l"));
        assert!(bytes.windows(5).any(|w| w == b"\x1b[?25h"));
        assert!(bytes.windows(1).any(|w| w == b"\r"));
        assert!(bytes.windows(3).any(|w| w == b"ABC"));
        assert!(bytes.windows(2).any(|w| w == b"\r\n"));
        assert!(!contains_cup(bytes));
    }

    fn contains_cup(bytes: &[u8]) -> bool {
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i] == 0x1b && bytes[i + 1] == b'[' {
                let rest = &bytes[i + 2..];
                if let Some(end) = rest.iter().position(|b| b.is_ascii_alphabetic()) {
                    if rest[end] == b'H' || rest[end] == b'f' {
                        return true;
                    }
                }
            }
            i += 1;
        }
        false
    }
}
