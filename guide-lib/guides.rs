//! Per-view indent guide controller.
//!
//! [`IndentGuides`] is what a host wires into its command loop:
//!
//! ```no_run
//! use guide_lib::{
//!   buffer::RopeView,
//!   config::GuideConfig,
//!   guides::{
//!     HostState,
//!     IndentGuides,
//!   },
//! };
//! use ropey::Rope;
//!
//! let view = RopeView::new(Rope::from("fn f() {\n    body();\n}\n"), 4).unwrap();
//! let host = HostState::new("rust");
//! let mut guides = IndentGuides::new(GuideConfig::default());
//!
//! guides.pre_command();
//! // ... the command runs and moves the cursor ...
//! if let Some(token) = guides.post_command(&view, &host) {
//!   // arm guide_event::IdleTimer with `token`, then once it fires:
//!   guides.on_idle(token, &view, &host);
//! }
//! for mark in guides.marks().marks() {
//!   println!("{}:{} {:?}", mark.line, mark.char_idx, mark.text());
//! }
//! ```

use crate::{
  buffer::GuideBuffer,
  compose::compose_spans,
  config::GuideConfig,
  indent::LevelFinder,
  marks::{
    MarkRegistry,
    PassId,
  },
  render::render_spans,
  scheduler::{
    RenderScheduler,
    Schedule,
    TimerToken,
  },
};

/// What the host knows about the buffer beyond its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostState<'a> {
  /// Major mode or language id of the buffer.
  pub context:      &'a str,
  /// A popup, picker or minibuffer currently has focus.
  pub popup_active: bool,
}

impl<'a> HostState<'a> {
  pub fn new(context: &'a str) -> Self {
    Self {
      context,
      popup_active: false,
    }
  }

  pub fn with_popup(mut self, popup_active: bool) -> Self {
    self.popup_active = popup_active;
    self
  }
}

#[derive(Debug)]
pub struct IndentGuides {
  config:    GuideConfig,
  finder:    LevelFinder,
  marks:     MarkRegistry,
  scheduler: RenderScheduler,
}

impl IndentGuides {
  pub fn new(config: GuideConfig) -> Self {
    let scheduler = RenderScheduler::new(config.idle_delay());
    Self {
      config,
      finder: LevelFinder::new(),
      marks: MarkRegistry::new(),
      scheduler,
    }
  }

  pub fn config(&self) -> &GuideConfig {
    &self.config
  }

  /// Swaps the configuration. Displayed guides, any armed timer and the
  /// compiled level matchers are dropped; the next command schedules with the
  /// new settings.
  pub fn set_config(&mut self, config: GuideConfig) {
    self.marks.clear();
    self.finder.clear_cache();
    self.scheduler = RenderScheduler::new(config.idle_delay());
    self.config = config;
  }

  pub fn marks(&self) -> &MarkRegistry {
    &self.marks
  }

  pub fn scheduler(&self) -> &RenderScheduler {
    &self.scheduler
  }

  pub fn is_active(&self, host: &HostState<'_>) -> bool {
    self.config.enable && !self.config.is_inhibited(host.context)
  }

  /// Call before every command. Returns how many marks were removed.
  pub fn pre_command(&mut self) -> usize {
    self.scheduler.pre_command(&mut self.marks)
  }

  /// Call after every command. Renders immediately when no idle delay is
  /// configured, otherwise returns the token to arm the idle timer with.
  pub fn post_command<B: GuideBuffer + ?Sized>(
    &mut self,
    buffer: &B,
    host: &HostState<'_>,
  ) -> Option<TimerToken> {
    if !self.is_active(host) {
      return None;
    }
    match self.scheduler.post_command(&self.marks, host.popup_active) {
      Schedule::Skip => None,
      Schedule::RenderNow => {
        self.render(buffer, host);
        None
      },
      Schedule::Deferred(token) => Some(token),
    }
  }

  /// Call when the idle timer hands back `token`. Returns whether guides were
  /// rendered.
  pub fn on_idle<B: GuideBuffer + ?Sized>(
    &mut self,
    token: TimerToken,
    buffer: &B,
    host: &HostState<'_>,
  ) -> bool {
    if !self.is_active(host) || host.popup_active || !self.scheduler.fire(token, &self.marks) {
      return false;
    }
    self.render(buffer, host);
    true
  }

  /// Redraws right away, replacing whatever is displayed.
  pub fn render_now<B: GuideBuffer + ?Sized>(
    &mut self,
    buffer: &B,
    host: &HostState<'_>,
  ) -> Option<PassId> {
    if !self.is_active(host) {
      return None;
    }
    self.marks.clear();
    Some(self.render(buffer, host))
  }

  fn render<B: GuideBuffer + ?Sized>(&mut self, buffer: &B, host: &HostState<'_>) -> PassId {
    let options = self.config.compose_options(host.context);
    let cursor = buffer.cursor();
    let spans = compose_spans(&mut self.finder, buffer, cursor.row, &options);
    let marks = render_spans(buffer, &spans, self.config.guide_char);
    let pass = self.marks.commit(marks);
    self.scheduler.mark_rendered();
    pass
  }
}
