//! One-shot idle timer for deferred guide renders.
//!
//! The timer never touches guide state itself. When the idle delay elapses it
//! forwards the armed [`TimerToken`] to the host, which then asks the view's
//! scheduler whether the token is still current. Re-arming replaces the
//! tracked token, so a superseded timer can only ever deliver the newest one.

use std::time::Duration;

use tokio::{
  sync::mpsc,
  time::Instant,
};

use crate::debounce::AsyncHook;

/// Identifies one armed deferred render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
  pub generation: u64,
  pub delay:      Duration,
}

impl TimerToken {
  pub const fn new(generation: u64, delay: Duration) -> Self {
    Self { generation, delay }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleEvent {
  /// Restart the idle countdown for `token`.
  Arm(TimerToken),
  /// Forget the armed token without firing.
  Disarm,
}

pub struct IdleTimer {
  armed:   Option<TimerToken>,
  elapsed: mpsc::UnboundedSender<TimerToken>,
}

impl IdleTimer {
  pub fn new(elapsed: mpsc::UnboundedSender<TimerToken>) -> Self {
    Self {
      armed: None,
      elapsed,
    }
  }
}

impl AsyncHook for IdleTimer {
  type Event = IdleEvent;

  fn handle_event(&mut self, event: Self::Event, _timeout: Option<Instant>) -> Option<Instant> {
    match event {
      IdleEvent::Arm(token) => {
        self.armed = Some(token);
        Some(Instant::now() + token.delay)
      },
      IdleEvent::Disarm => {
        self.armed = None;
        None
      },
    }
  }

  fn finish_debounce(&mut self) {
    let Some(token) = self.armed.take() else {
      return;
    };
    if self.elapsed.send(token).is_err() {
      log::warn!(
        "idle timer fired for generation {} but the host stopped listening",
        token.generation
      );
    }
  }
}

/// Spawn an [`IdleTimer`] on the current runtime.
///
/// Returns the sender used to arm it and the receiver on which elapsed tokens
/// arrive.
pub fn spawn_idle_timer() -> (mpsc::Sender<IdleEvent>, mpsc::UnboundedReceiver<TimerToken>) {
  let (elapsed_tx, elapsed_rx) = mpsc::unbounded_channel();
  let tx = IdleTimer::new(elapsed_tx).spawn();
  (tx, elapsed_rx)
}
