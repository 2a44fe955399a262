//! Turning the cursor position into the set of guides to draw.

use crate::{
  buffer::GuideBuffer,
  extent::{
    ExtentPolicy,
    find_extent,
  },
  indent::LevelFinder,
};

/// One vertical guide: `column` drawn on every line of
/// `start_line..=end_line`. `depth` 0 is the level enclosing the cursor,
/// each outer level adds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideSpan {
  pub start_line: usize,
  pub end_line:   usize,
  pub column:     usize,
  pub depth:      usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
  /// Also draw every level enclosing the innermost one.
  pub recursive: bool,
  /// Only columns strictly greater than this are drawn.
  pub threshold: Option<usize>,
  pub policy:    ExtentPolicy,
}

impl ComposeOptions {
  fn admits(&self, column: usize) -> bool {
    self.threshold.is_none_or(|threshold| column > threshold)
  }
}

/// Guides for the levels enclosing `cursor_line`, innermost first.
///
/// Spans are clipped to the viewport and never cover the line that opens
/// their level. Levels that end up with no line to draw on are skipped.
pub fn compose_spans<B: GuideBuffer + ?Sized>(
  finder: &mut LevelFinder,
  buffer: &B,
  cursor_line: usize,
  options: &ComposeOptions,
) -> Vec<GuideSpan> {
  let visible = buffer.visible_lines();
  let mut spans = Vec::new();
  let mut line = cursor_line;
  let mut depth = 0;

  while let Some(level) = finder.find_level_start(buffer, line) {
    // outer levels only get shallower
    if !options.admits(level.column) {
      break;
    }

    let end_line = find_extent(buffer, level, *visible.end(), options.policy);
    let start_line = (level.line + 1).max(*visible.start());
    if start_line <= end_line {
      spans.push(GuideSpan {
        start_line,
        end_line,
        column: level.column,
        depth,
      });
    }

    if !options.recursive || level.column == 0 {
      break;
    }
    line = level.line;
    depth += 1;
  }

  tracing::debug!(cursor_line, count = spans.len(), "composed guide spans");
  spans
}
