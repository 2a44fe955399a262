use std::num::NonZeroUsize;

use smallvec::{
  SmallVec,
  smallvec,
};

use crate::buffer::{
  char_is_indent,
  char_width,
};

/// How a mark attaches to the buffer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
  /// Displayed instead of the single char at `char_idx` (a space or a tab).
  Replace,
  /// Zero-width decoration after the last char of a line too short to reach
  /// the guide column.
  Append,
}

/// One screen cell of a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkCell {
  pub ch:    char,
  /// Guide cells are drawn with the guide style, the rest is padding.
  pub guide: bool,
}

impl MarkCell {
  pub const fn pad() -> Self {
    Self {
      ch:    ' ',
      guide: false,
    }
  }

  pub const fn guide(ch: char) -> Self {
    Self { ch, guide: true }
  }
}

pub type MarkCells = SmallVec<[MarkCell; 8]>;

/// A visual decoration for one buffer position.
///
/// Marks never change the text; a host draws `cells` in place of the char at
/// `char_idx` (`Replace`) or after the end of the line (`Append`). `col` is
/// the screen column of the first cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mark {
  pub line:     usize,
  pub char_idx: usize,
  pub col:      usize,
  pub kind:     MarkKind,
  pub cells:    MarkCells,
}

impl Mark {
  pub fn text(&self) -> String {
    self.cells.iter().map(|cell| cell.ch).collect()
  }

  /// Screen columns carrying a guide glyph.
  pub fn guide_columns(&self) -> impl Iterator<Item = usize> + '_ {
    self
      .cells
      .iter()
      .enumerate()
      .filter(|(_, cell)| cell.guide)
      .map(|(offset, _)| self.col + offset)
  }
}

/// A char of the line with its screen placement.
#[derive(Debug, Clone, Copy)]
struct Cell {
  char_idx: usize,
  ch:       char,
  col:      usize,
  width:    usize,
}

/// Pending edit for one char (or the line end) before it becomes a [`Mark`].
#[derive(Debug)]
struct Edit {
  char_idx: usize,
  col:      usize,
  kind:     MarkKind,
  cells:    MarkCells,
}

/// Render buffer for a single line.
///
/// Every guide column aimed at the line is collected first and edits that land
/// on the same char are merged, so two guides inside one tab become a single
/// replacement and guides past the end of a short line share one appended
/// decoration regardless of the order they were placed in.
pub(crate) struct LineRender {
  cells:     Vec<Cell>,
  len_chars: usize,
  width:     usize,
  glyph:     char,
  edits:     Vec<Edit>,
}

impl LineRender {
  pub(crate) fn new(text: &str, tab_width: NonZeroUsize, glyph: char) -> Self {
    let mut col = 0;
    let cells: Vec<Cell> = text
      .chars()
      .enumerate()
      .map(|(char_idx, ch)| {
        let width = char_width(ch, col, tab_width);
        let cell = Cell {
          char_idx,
          ch,
          col,
          width,
        };
        col += width;
        cell
      })
      .collect();
    Self {
      len_chars: cells.len(),
      cells,
      width: col,
      glyph,
      edits: Vec::new(),
    }
  }

  /// Puts a guide at screen column `column`.
  pub(crate) fn place(&mut self, column: usize) {
    let glyph = self.glyph;
    if column >= self.width {
      let offset = column - self.width;
      let edit = self.edit(self.len_chars, self.width, MarkKind::Append, 0);
      if edit.cells.len() <= offset {
        edit.cells.resize(offset + 1, MarkCell::pad());
      }
      edit.cells[offset] = MarkCell::guide(glyph);
      return;
    }

    let idx = self
      .cells
      .partition_point(|cell| cell.col + cell.width <= column);
    let Some(cell) = self.cells.get(idx).copied() else {
      return;
    };
    if cell.col > column || !char_is_indent(cell.ch) {
      // zero-width or wide content at the column; never draw over text
      tracing::trace!(column, ch = ?cell.ch, "guide column not on whitespace");
      return;
    }
    let edit = self.edit(cell.char_idx, cell.col, MarkKind::Replace, cell.width);
    edit.cells[column - cell.col] = MarkCell::guide(glyph);
  }

  fn edit(&mut self, char_idx: usize, col: usize, kind: MarkKind, width: usize) -> &mut Edit {
    let pos = match self
      .edits
      .binary_search_by_key(&char_idx, |edit| edit.char_idx)
    {
      Ok(pos) => pos,
      Err(pos) => {
        self.edits.insert(pos, Edit {
          char_idx,
          col,
          kind,
          cells: smallvec![MarkCell::pad(); width],
        });
        pos
      },
    };
    &mut self.edits[pos]
  }

  /// Materializes the collected edits, ordered by `char_idx`.
  pub(crate) fn finish(self, line: usize) -> impl Iterator<Item = Mark> {
    self.edits.into_iter().map(move |edit| {
      Mark {
        line,
        char_idx: edit.char_idx,
        col: edit.col,
        kind: edit.kind,
        cells: edit.cells,
      }
    })
  }
}
