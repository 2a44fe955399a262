//! How far down a level reaches.

use crate::{
  buffer::{
    GuideBuffer,
    indent_column,
    is_blank,
  },
  indent::Level,
};

/// Where a block ends relative to the line that dedents out of it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExtentPolicy {
  /// The block closes on its own shallower line (`}`, `end`, ...), so it
  /// ends right before the dedent, blank lines included.
  #[default]
  Ordinary,
  /// The closing token trails the last content line (lisps), so trailing
  /// blank lines are trimmed off the block.
  TailBrace,
}

/// Why the forward scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
  /// Nothing below the level line was scanned.
  Empty,
  /// The scan ran into the viewport end, or into the buffer end on a
  /// non-blank line, while still inside.
  Inside(usize),
  /// The first line at or shallower than the level, or a blank last line of
  /// the buffer.
  Outside(usize),
}

fn scan<B: GuideBuffer + ?Sized>(buffer: &B, level: Level, visible_end: usize) -> Stop {
  let tab_width = buffer.tab_width();
  let buffer_last = buffer.line_count().saturating_sub(1);
  let last = buffer_last.min(visible_end);
  for line in level.line + 1..=last {
    if indent_column(&buffer.line(line), tab_width).is_some_and(|column| column <= level.column) {
      return Stop::Outside(line);
    }
  }

  match last {
    last if last <= level.line => Stop::Empty,
    // the block may continue below the viewport
    last if last < buffer_last => Stop::Inside(last),
    last if is_blank(&buffer.line(last)) => Stop::Outside(last),
    last => Stop::Inside(last),
  }
}

/// Last line belonging to `level`, never past `visible_end`.
///
/// Returns `level.line` when no line below it belongs to the level; callers
/// treat that as nothing to draw.
pub fn find_extent<B: GuideBuffer + ?Sized>(
  buffer: &B,
  level: Level,
  visible_end: usize,
  policy: ExtentPolicy,
) -> usize {
  match scan(buffer, level, visible_end) {
    Stop::Empty => level.line,
    Stop::Inside(line) => line,
    Stop::Outside(line) => {
      match policy {
        ExtentPolicy::Ordinary => line - 1,
        ExtentPolicy::TailBrace => {
          (level.line..line)
            .rev()
            .find(|&n| !is_blank(&buffer.line(n)))
            .unwrap_or(level.line)
        },
      }
    },
  }
}
