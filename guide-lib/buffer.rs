//! Read-only access to the text that guides are computed for.
//!
//! The guide core never owns text. Hosts implement [`GuideBuffer`] over
//! whatever storage they use; [`RopeView`] is the rope-backed implementation
//! used by the terminal host and the tests.

use std::{
  borrow::Cow,
  num::NonZeroUsize,
  ops::RangeInclusive,
};

use ropey::{
  Rope,
  RopeSlice,
};
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

use crate::position::Position;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
  #[error("tab width must be at least 1")]
  ZeroTabWidth,
}

pub type Result<T> = std::result::Result<T, BufferError>;

/// The slice of a host buffer the guide core reads.
///
/// Line numbers are 0-based. `line` returns the text without its line ending
/// and an empty string for lines past the end of the buffer.
pub trait GuideBuffer {
  fn line_count(&self) -> usize;

  fn line(&self, line: usize) -> Cow<'_, str>;

  fn tab_width(&self) -> NonZeroUsize;

  fn cursor(&self) -> Position;

  /// First and last line currently shown, both inclusive.
  fn visible_lines(&self) -> RangeInclusive<usize>;
}

#[inline]
pub fn char_is_line_ending(ch: char) -> bool {
  matches!(
    ch,
    '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
  )
}

#[inline]
pub fn char_is_indent(ch: char) -> bool {
  ch == ' ' || ch == '\t'
}

/// Number of screen cells `ch` occupies when it starts at screen column `col`.
#[inline]
pub fn char_width(ch: char, col: usize, tab_width: NonZeroUsize) -> usize {
  if ch == '\t' {
    tab_width.get() - col % tab_width.get()
  } else {
    // control characters have no defined width, they still take a cell
    ch.width().unwrap_or(1)
  }
}

/// A line is blank when it holds nothing but spaces and tabs.
pub fn is_blank(line: &str) -> bool {
  line.chars().all(char_is_indent)
}

/// Screen column of the first non-indent char, `None` for blank lines.
pub fn indent_column(line: &str, tab_width: NonZeroUsize) -> Option<usize> {
  let mut col = 0;
  for ch in line.chars() {
    if !char_is_indent(ch) {
      return Some(col);
    }
    col += char_width(ch, col, tab_width);
  }
  None
}

/// Screen column just past the last char of `line`.
pub fn line_width(line: &str, tab_width: NonZeroUsize) -> usize {
  line
    .chars()
    .fold(0, |col, ch| col + char_width(ch, col, tab_width))
}

fn line_ending_len(line: RopeSlice<'_>) -> usize {
  let mut chars = line.chars_at(line.len_chars());
  match (chars.prev(), chars.prev()) {
    (Some('\n'), Some('\r')) => 2,
    (Some(ch), _) if char_is_line_ending(ch) => 1,
    _ => 0,
  }
}

/// A rope together with the view state the guide core needs: tab width,
/// cursor and the visible line range.
#[derive(Debug, Clone)]
pub struct RopeView {
  text:      Rope,
  tab_width: NonZeroUsize,
  cursor:    Position,
  viewport:  RangeInclusive<usize>,
}

impl RopeView {
  /// Creates a view showing the whole buffer with the cursor at its start.
  pub fn new(text: Rope, tab_width: usize) -> Result<Self> {
    let tab_width = NonZeroUsize::new(tab_width).ok_or(BufferError::ZeroTabWidth)?;
    let last = text.len_lines().saturating_sub(1);
    Ok(Self {
      text,
      tab_width,
      cursor: Position::zero(),
      viewport: 0..=last,
    })
  }

  pub fn with_cursor(mut self, cursor: Position) -> Self {
    self.set_cursor(cursor);
    self
  }

  pub fn with_viewport(mut self, first: usize, height: usize) -> Self {
    self.set_viewport(first, height);
    self
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  /// Moves the cursor, clamping it into the buffer.
  pub fn set_cursor(&mut self, cursor: Position) {
    let row = cursor.row.min(self.last_line());
    let col = cursor.col.min(self.line(row).chars().count());
    self.cursor = Position::new(row, col);
  }

  /// Shows `height` lines starting at `first`, clamped to the buffer.
  pub fn set_viewport(&mut self, first: usize, height: usize) {
    let last_line = self.last_line();
    let first = first.min(last_line);
    let last = first
      .saturating_add(height.max(1) - 1)
      .min(last_line);
    self.viewport = first..=last;
  }

  fn last_line(&self) -> usize {
    self.text.len_lines().saturating_sub(1)
  }
}

impl GuideBuffer for RopeView {
  fn line_count(&self) -> usize {
    self.text.len_lines()
  }

  fn line(&self, line: usize) -> Cow<'_, str> {
    if line >= self.text.len_lines() {
      return Cow::Borrowed("");
    }
    let slice = self.text.line(line);
    let len = slice.len_chars() - line_ending_len(slice);
    Cow::from(slice.slice(..len))
  }

  fn tab_width(&self) -> NonZeroUsize {
    self.tab_width
  }

  fn cursor(&self) -> Position {
    self.cursor
  }

  fn visible_lines(&self) -> RangeInclusive<usize> {
    self.viewport.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tab(width: usize) -> NonZeroUsize {
    NonZeroUsize::new(width).unwrap()
  }

  #[test]
  fn zero_tab_width_is_rejected() {
    let err = RopeView::new(Rope::from("x"), 0).unwrap_err();
    assert_eq!(err, BufferError::ZeroTabWidth);
  }

  #[test]
  fn indent_column_expands_tabs_to_the_next_stop() {
    assert_eq!(indent_column("\tx", tab(8)), Some(8));
    assert_eq!(indent_column("  \tx", tab(8)), Some(8));
    assert_eq!(indent_column("\t  x", tab(4)), Some(6));
    assert_eq!(indent_column("x", tab(8)), Some(0));
  }

  #[test]
  fn blank_lines_have_no_indent_column() {
    assert_eq!(indent_column("", tab(4)), None);
    assert_eq!(indent_column(" \t  ", tab(4)), None);
    assert!(is_blank(" \t"));
    assert!(!is_blank(" a"));
  }

  #[test]
  fn line_width_counts_wide_chars() {
    assert_eq!(line_width("a\tb", tab(4)), 5);
    assert_eq!(line_width("日本", tab(4)), 4);
  }

  #[test]
  fn lines_are_returned_without_line_endings() {
    let view = RopeView::new(Rope::from("one\r\ntwo\nthree"), 4).unwrap();
    assert_eq!(view.line_count(), 3);
    assert_eq!(view.line(0), "one");
    assert_eq!(view.line(1), "two");
    assert_eq!(view.line(2), "three");
    assert_eq!(view.line(9), "");
  }

  #[test]
  fn cursor_and_viewport_are_clamped() {
    let view = RopeView::new(Rope::from("ab\ncd\n"), 4)
      .unwrap()
      .with_cursor(Position::new(1, 10))
      .with_viewport(1, 50);
    assert_eq!(view.cursor(), Position::new(1, 2));
    assert_eq!(view.visible_lines(), 1..=2);
  }
}
