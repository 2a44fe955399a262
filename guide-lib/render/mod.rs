//! Turning guide spans into per-line visual marks.
//!
//! Rendering is pure: the same buffer and spans always yield the same marks,
//! sorted by `(line, char_idx)`. Nothing here touches the buffer text; a host
//! draws the marks on top of it (see [`decorate_line`]).

mod decorate;
mod mark;

use std::collections::BTreeMap;

use smallvec::SmallVec;

pub use decorate::{
  Style,
  StyledChunk,
  decorate_line,
};
pub use mark::{
  Mark,
  MarkCell,
  MarkCells,
  MarkKind,
};

use crate::{
  buffer::GuideBuffer,
  compose::GuideSpan,
  render::mark::LineRender,
};

/// Marks for every `(line, column)` covered by `spans`.
///
/// Guides are never drawn over the cursor: the mark anchored at the cursor's
/// own char, or appended at the line end the cursor sits on, is dropped.
pub fn render_spans<B: GuideBuffer + ?Sized>(
  buffer: &B,
  spans: &[GuideSpan],
  glyph: char,
) -> Vec<Mark> {
  let tab_width = buffer.tab_width();
  let cursor = buffer.cursor();

  let mut targets: BTreeMap<usize, SmallVec<[usize; 4]>> = BTreeMap::new();
  for span in spans {
    for line in span.start_line..=span.end_line {
      targets.entry(line).or_default().push(span.column);
    }
  }

  let mut marks = Vec::new();
  for (line, columns) in targets {
    let text = buffer.line(line);
    let mut render = LineRender::new(&text, tab_width, glyph);
    for column in columns {
      render.place(column);
    }
    marks.extend(
      render
        .finish(line)
        .filter(|mark| !(mark.line == cursor.row && mark.char_idx == cursor.col)),
    );
  }
  marks
}
