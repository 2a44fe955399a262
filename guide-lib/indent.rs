//! Indentation levels and the search for the one enclosing a line.
//!
//! A level is found without parsing anything: the parent of an indented line
//! is the nearest earlier non-blank line whose indentation is strictly
//! shallower. Tabs and spaces are never normalized. Instead every whitespace
//! prefix that renders to a shallower column is enumerated and the candidates
//! are matched as one multi-pattern regex, so `"\t"` and eight spaces both
//! count as column 8 at tab width 8.

use std::{
  collections::HashMap,
  num::NonZeroUsize,
};

use regex_automata::{
  Anchored,
  Input,
  meta::Regex,
};

use crate::{
  Tendril,
  buffer::{
    GuideBuffer,
    indent_column,
  },
};

/// Levels whose candidate set would exceed this are not searched.
pub const MAX_CANDIDATES: usize = 2048;

/// The line that opens an indentation level and the column its body hangs
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
  pub line:   usize,
  pub column: usize,
}

/// One concrete whitespace prefix and the column it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub prefix: Tendril,
  pub column: usize,
}

/// Number of candidates [`indentation_candidates`] yields for `level`.
pub fn candidate_count(level: usize, tab_width: NonZeroUsize) -> usize {
  (0..level).map(|column| column / tab_width.get() + 1).sum()
}

/// Every prefix rendering to a column in `0..level`, shallowest first.
///
/// Column `c` is reachable by `c` spaces and, once `c >= tab_width`, by a tab
/// followed by any prefix of column `c - tab_width`. The table is built
/// bottom-up so deep indentation does not recurse.
pub fn indentation_candidates(level: usize, tab_width: NonZeroUsize) -> Vec<Candidate> {
  let tab_width = tab_width.get();
  let mut by_column: Vec<Vec<Tendril>> = Vec::with_capacity(level);
  for column in 0..level {
    let mut prefixes = vec![Tendril::from(" ".repeat(column))];
    if column >= tab_width {
      let tabbed: Vec<Tendril> = by_column[column - tab_width]
        .iter()
        .map(|rest| {
          let mut prefix = Tendril::from("\t");
          prefix.push_str(rest);
          prefix
        })
        .collect();
      prefixes.extend(tabbed);
    }
    by_column.push(prefixes);
  }

  by_column
    .into_iter()
    .enumerate()
    .flat_map(|(column, prefixes)| {
      prefixes
        .into_iter()
        .map(move |prefix| Candidate { prefix, column })
    })
    .collect()
}

fn candidate_pattern(prefix: &str) -> String {
  let mut pattern = String::with_capacity(prefix.len() * 2 + 12);
  for ch in prefix.chars() {
    match ch {
      '\t' => pattern.push_str(r"\t"),
      ch => pattern.push(ch),
    }
  }
  pattern.push_str(r"[^ \t\r\n]");
  pattern
}

/// Compiled candidates for one `(tab_width, level)` pair.
#[derive(Debug)]
struct LevelMatcher {
  regex:   Regex,
  columns: Vec<usize>,
}

impl LevelMatcher {
  fn build(level: usize, tab_width: NonZeroUsize) -> Option<Self> {
    let count = candidate_count(level, tab_width);
    if count > MAX_CANDIDATES {
      tracing::debug!(level, count, "indentation too deep for a level search");
      return None;
    }

    let candidates = indentation_candidates(level, tab_width);
    let patterns: Vec<String> = candidates
      .iter()
      .map(|candidate| candidate_pattern(&candidate.prefix))
      .collect();
    let regex = match Regex::builder().build_many(&patterns) {
      Ok(regex) => regex,
      Err(err) => {
        tracing::warn!(level, "failed to compile indentation candidates: {err}");
        return None;
      },
    };
    tracing::trace!(level, count, "compiled indentation candidates");

    Some(Self {
      regex,
      columns: candidates.iter().map(|candidate| candidate.column).collect(),
    })
  }

  /// Column of the candidate `line` starts with, if any.
  fn column_of(&self, line: &str) -> Option<usize> {
    let input = Input::new(line).anchored(Anchored::Yes);
    let found = self.regex.search(&input)?;
    self.columns.get(found.pattern().as_usize()).copied()
  }
}

/// Finds enclosing levels, caching compiled candidate sets between searches.
///
/// The cache holds one entry per level searched at the current tab width and
/// is dropped whenever a buffer with a different tab width is searched.
#[derive(Debug, Default)]
pub struct LevelFinder {
  tab_width: Option<NonZeroUsize>,
  matchers:  HashMap<usize, Option<LevelMatcher>>,
}

impl LevelFinder {
  pub fn new() -> Self {
    Self::default()
  }

  /// The nearest level enclosing `cursor_line`.
  ///
  /// A blank cursor line adopts the deeper of its neighbours' indentation.
  /// Returns `None` when the effective column is 0 or no shallower line
  /// precedes the cursor.
  pub fn find_level_start<B: GuideBuffer + ?Sized>(
    &mut self,
    buffer: &B,
    cursor_line: usize,
  ) -> Option<Level> {
    if cursor_line >= buffer.line_count() {
      return None;
    }
    let tab_width = buffer.tab_width();
    let base = indent_column(&buffer.line(cursor_line), tab_width)
      .unwrap_or_else(|| blank_line_column(buffer, cursor_line));
    if base == 0 {
      return None;
    }

    if self.tab_width != Some(tab_width) {
      self.clear_cache();
      self.tab_width = Some(tab_width);
    }
    let matcher = self
      .matchers
      .entry(base)
      .or_insert_with(|| LevelMatcher::build(base, tab_width))
      .as_ref()?;

    let level = (0..cursor_line).rev().find_map(|line| {
      matcher
        .column_of(&buffer.line(line))
        .map(|column| Level { line, column })
    });
    tracing::debug!(cursor_line, base, ?level, "level search");
    level
  }

  /// Number of levels with a cached candidate set.
  pub fn cached_levels(&self) -> usize {
    self.matchers.len()
  }

  /// Drops every compiled candidate set.
  pub fn clear_cache(&mut self) {
    if !self.matchers.is_empty() {
      tracing::trace!(count = self.matchers.len(), "dropping indentation matchers");
    }
    self.matchers.clear();
  }
}

/// The column a blank line is treated as having: the deeper of the nearest
/// non-blank lines above and below it.
fn blank_line_column<B: GuideBuffer + ?Sized>(buffer: &B, line: usize) -> usize {
  let tab_width = buffer.tab_width();
  let next = (line + 1..buffer.line_count())
    .find_map(|n| indent_column(&buffer.line(n), tab_width))
    .unwrap_or(0);
  let prev = (0..line)
    .rev()
    .find_map(|n| indent_column(&buffer.line(n), tab_width))
    .unwrap_or(0);
  next.max(prev)
}
