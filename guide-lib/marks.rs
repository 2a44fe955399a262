//! The per-view set of guide marks.
//!
//! Marks are only ever visible as the complete output of one render pass: a
//! pass is committed whole and cleared whole, so a consumer never observes a
//! mix of two passes.

use std::num::NonZeroU64;

use crate::render::Mark;

/// Identifies one committed render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(NonZeroU64);

impl PassId {
  pub const fn new(id: NonZeroU64) -> Self {
    Self(id)
  }

  pub const fn get(self) -> NonZeroU64 {
    self.0
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
  pub id:    PassId,
  /// Sorted by `(line, char_idx)`.
  pub marks: Vec<Mark>,
}

#[derive(Debug, Default)]
pub struct MarkRegistry {
  passes: u64,
  active: Option<RenderPass>,
}

impl MarkRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// True when no guide is currently displayed.
  pub fn is_empty(&self) -> bool {
    self
      .active
      .as_ref()
      .is_none_or(|pass| pass.marks.is_empty())
  }

  pub fn pass_id(&self) -> Option<PassId> {
    self.active.as_ref().map(|pass| pass.id)
  }

  pub fn marks(&self) -> &[Mark] {
    match &self.active {
      Some(pass) => &pass.marks,
      None => &[],
    }
  }

  pub fn marks_on_line(&self, line: usize) -> &[Mark] {
    let marks = self.marks();
    let start = marks.partition_point(|mark| mark.line < line);
    let end = marks.partition_point(|mark| mark.line <= line);
    &marks[start..end]
  }

  /// Replaces whatever is displayed with `marks` as a new pass.
  pub fn commit(&mut self, mut marks: Vec<Mark>) -> PassId {
    marks.sort_by_key(|mark| (mark.line, mark.char_idx));
    self.passes = self.passes.saturating_add(1);
    let id = PassId::new(NonZeroU64::new(self.passes).unwrap_or(NonZeroU64::MAX));
    if let Some(stale) = self.active.take() {
      tracing::debug!(pass = ?stale.id, "replacing uncleared render pass");
    }
    tracing::debug!(pass = ?id, count = marks.len(), "committed guide marks");
    self.active = Some(RenderPass { id, marks });
    id
  }

  /// Removes the active pass and returns how many marks it held.
  pub fn clear(&mut self) -> usize {
    let Some(pass) = self.active.take() else {
      return 0;
    };
    tracing::trace!(pass = ?pass.id, count = pass.marks.len(), "cleared guide marks");
    pass.marks.len()
  }
}
