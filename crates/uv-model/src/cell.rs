//! `Cell`: one grid position. `Line`: a row of cells addressed by column.
//!
//! Mirrors the leader/continuation split the teacher's `core-render::Cell`
//! uses for wide glyphs (`spec.md` §3 "Cell"): a width-2 cell owns its
//! column and the placeholder immediately to its right; the placeholder is
//! width 0 with empty content and is never printed on its own.

use crate::link::Link;
use crate::style::Style;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The grapheme cluster's code points, rendered as a `String`. Empty for
    /// a placeholder cell.
    pub content: String,
    /// Display columns occupied: 0 (placeholder), 1, or 2.
    pub width: u8,
    pub style: Style,
    pub link: Link,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    /// The implicit fill cell: one blank column, no style, no link.
    pub fn blank() -> Self {
        Self {
            content: " ".to_string(),
            width: 1,
            style: Style::default(),
            link: Link::default(),
        }
    }

    pub fn new(content: impl Into<String>, width: u8, style: Style, link: Link) -> Self {
        Self {
            content: content.into(),
            width: width.clamp(0, 2),
            style,
            link,
        }
    }

    /// A width-0 continuation cell sitting immediately right of a wide cell.
    pub fn placeholder(style: Style, link: Link) -> Self {
        Self {
            content: String::new(),
            width: 0,
            style,
            link,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.width == 0
    }

    pub fn is_wide(&self) -> bool {
        self.width == 2
    }

    pub fn is_blank(&self) -> bool {
        self.content == " " && self.width == 1 && self.style.is_empty() && self.link.is_empty()
    }
}

/// A row of cells addressed by visual column.
#[derive(Debug, Clone)]
pub struct Line {
    cells: Vec<Cell>,
}

impl Line {
    pub fn blank(width: u16) -> Self {
        Self {
            cells: vec![Cell::blank(); width as usize],
        }
    }

    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn len_cols(&self) -> usize {
        self.cells.len()
    }

    /// Placeholder-aware read: always returns the cell actually stored at
    /// `x`, which may be a placeholder if `x` sits right of a wide glyph.
    pub fn at(&self, x: usize) -> Option<&Cell> {
        self.cells.get(x)
    }

    pub fn at_mut(&mut self, x: usize) -> Option<&mut Cell> {
        self.cells.get_mut(x)
    }

    /// Writes `cell` at column `x`. If `cell` is wide, also writes the
    /// placeholder to its right (truncating to a blank if it would straddle
    /// the line's right edge). If a previous wide cell's placeholder at `x`
    /// would be orphaned (its leader overwritten or shadowed), that leader
    /// is converted back to a blank to preserve the invariant.
    pub fn set(&mut self, x: usize, cell: Cell) {
        if x >= self.cells.len() {
            return;
        }

        // If we are about to overwrite the right half of an existing wide
        // cell, blank out its leader so it no longer claims a column we're
        // repurposing.
        if self.cells[x].is_placeholder() && x > 0 {
            self.cells[x - 1] = Cell::blank();
        }
        // If we are about to overwrite a wide leader, blank its placeholder.
        if self.cells[x].is_wide() && x + 1 < self.cells.len() {
            self.cells[x + 1] = Cell::blank();
        }

        let width = cell.width as usize;
        if width == 2 && x + 1 >= self.cells.len() {
            // Would straddle the right edge: truncate to a blank.
            self.cells[x] = Cell::blank();
            return;
        }

        let placeholder = Cell::placeholder(cell.style, cell.link.clone());
        self.cells[x] = cell;
        if width == 2 {
            self.cells[x + 1] = placeholder;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Iterate leader cells only, yielding `(start_col, &Cell)`.
    pub fn leaders(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_placeholder())
    }
}
