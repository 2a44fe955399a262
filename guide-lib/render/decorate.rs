use std::num::NonZeroUsize;

use crate::{
  buffer::char_width,
  render::mark::{
    Mark,
    MarkKind,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
  Text,
  Guide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledChunk {
  pub text:  String,
  pub style: Style,
}

#[derive(Default)]
struct Chunks(Vec<StyledChunk>);

impl Chunks {
  fn push(&mut self, ch: char, style: Style) {
    match self.0.last_mut() {
      Some(chunk) if chunk.style == style => chunk.text.push(ch),
      _ => {
        self.0.push(StyledChunk {
          text: ch.to_string(),
          style,
        })
      },
    }
  }

  fn push_mark(&mut self, mark: &Mark) {
    for cell in &mark.cells {
      let style = if cell.guide { Style::Guide } else { Style::Text };
      self.push(cell.ch, style);
    }
  }
}

/// Screen text of `line` with `marks` applied and tabs expanded.
///
/// `marks` must belong to this line and be sorted by `char_idx`, as
/// [`MarkRegistry::marks_on_line`](crate::marks::MarkRegistry::marks_on_line)
/// returns them.
pub fn decorate_line(line: &str, marks: &[Mark], tab_width: NonZeroUsize) -> Vec<StyledChunk> {
  let mut chunks = Chunks::default();
  let mut pending = marks.iter().peekable();
  let mut col = 0;

  for (char_idx, ch) in line.chars().enumerate() {
    let width = char_width(ch, col, tab_width);
    col += width;

    while pending
      .next_if(|mark| mark.char_idx < char_idx)
      .is_some()
    {}
    if let Some(mark) = pending.next_if(|mark| {
      mark.char_idx == char_idx && mark.kind == MarkKind::Replace
    }) {
      chunks.push_mark(mark);
      continue;
    }

    if ch == '\t' {
      (0..width).for_each(|_| chunks.push(' ', Style::Text));
    } else {
      chunks.push(ch, Style::Text);
    }
  }

  for mark in pending.filter(|mark| mark.kind == MarkKind::Append) {
    chunks.push_mark(mark);
  }
  chunks.0
}
