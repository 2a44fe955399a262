use std::io::{
  self,
  Write,
};

use crossterm::style::Stylize;
use guide_lib::{
  buffer::GuideBuffer,
  marks::MarkRegistry,
  render::{
    Style,
    decorate_line,
  },
};

/// Writes the visible lines of `buffer` with the displayed guides applied.
/// Guide cells are dimmed when `styled` is set.
pub fn print_viewport<B: GuideBuffer + ?Sized>(
  out: &mut impl Write,
  buffer: &B,
  marks: &MarkRegistry,
  styled: bool,
) -> io::Result<()> {
  let last = buffer.line_count().saturating_sub(1);
  for line in buffer.visible_lines() {
    let text = buffer.line(line);
    // ropey reports an empty line after a trailing newline
    if line == last && line > 0 && text.is_empty() {
      break;
    }
    for chunk in decorate_line(&text, marks.marks_on_line(line), buffer.tab_width()) {
      match chunk.style {
        Style::Guide if styled => write!(out, "{}", chunk.text.as_str().dim())?,
        _ => out.write_all(chunk.text.as_bytes())?,
      }
    }
    writeln!(out)?;
  }
  Ok(())
}
