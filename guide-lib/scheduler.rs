//! When guides are recomputed.
//!
//! Every command clears the displayed guides before it runs. Once it has
//! finished the scheduler either asks for a render right away (no idle delay)
//! or arms a one-shot idle timer. The timer itself lives outside the core
//! ([`guide_event::IdleTimer`]); the scheduler only tracks which token is
//! current, so a timer armed before a later command fires as a no-op.

use std::time::Duration;

pub use guide_event::TimerToken;

use crate::marks::MarkRegistry;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
  /// Nothing displayed and nothing armed.
  #[default]
  Idle,
  /// A deferred render is armed.
  Pending,
  /// Guides from the last render are displayed.
  Rendered,
}

/// What the host should do once a command has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
  Skip,
  RenderNow,
  /// Arm the idle timer with this token and hand it back when it fires.
  Deferred(TimerToken),
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
  delay:      Duration,
  state:      SchedulerState,
  generation: u64,
  timer:      Option<TimerToken>,
}

impl RenderScheduler {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      ..Self::default()
    }
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  pub fn state(&self) -> SchedulerState {
    self.state
  }

  /// The most recently armed timer, until a render consumes it.
  pub fn timer(&self) -> Option<TimerToken> {
    self.timer
  }

  /// Runs before every command: drops the displayed guides.
  pub fn pre_command(&mut self, marks: &mut MarkRegistry) -> usize {
    self.state = SchedulerState::Idle;
    marks.clear()
  }

  /// Runs after every command.
  pub fn post_command(&mut self, marks: &MarkRegistry, popup_active: bool) -> Schedule {
    if !marks.is_empty() || popup_active {
      return Schedule::Skip;
    }
    if self.delay.is_zero() {
      return Schedule::RenderNow;
    }

    self.generation = self.generation.wrapping_add(1);
    let token = TimerToken::new(self.generation, self.delay);
    self.timer = Some(token);
    self.state = SchedulerState::Pending;
    Schedule::Deferred(token)
  }

  /// Whether an elapsed `token` should render now. Tokens that were
  /// superseded, or that arrive after guides are already shown, are ignored.
  pub fn fire(&mut self, token: TimerToken, marks: &MarkRegistry) -> bool {
    let current = self.timer == Some(token);
    if !current || self.state != SchedulerState::Pending || !marks.is_empty() {
      tracing::trace!(generation = token.generation, current, "ignoring idle timer");
      return false;
    }
    true
  }

  /// Records that a render pass completed and releases the timer slot.
  pub fn mark_rendered(&mut self) {
    self.state = SchedulerState::Rendered;
    self.timer = None;
  }
}
