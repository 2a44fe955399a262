//! Debounced async hooks.

use tokio::{
  sync::mpsc::{
    self,
    Sender,
  },
  time::{
    self,
    Instant,
  },
};

/// Guide events arrive in bursts (one per keystroke), the channel only has to
/// absorb a burst until the hook drains it.
const CHANNEL_CAPACITY: usize = 64;

/// A hook that runs as a background task and folds incoming events into a
/// single debounce deadline.
///
/// `handle_event` sees every event as it arrives and returns the deadline the
/// hook should wait for next (`None` disarms it). Once a deadline passes
/// without a new event, `finish_debounce` runs exactly once.
pub trait AsyncHook: Sync + Send + 'static + Sized {
  type Event: Sync + Send + 'static;

  fn handle_event(&mut self, event: Self::Event, timeout: Option<Instant>) -> Option<Instant>;

  fn finish_debounce(&mut self);

  fn spawn(self) -> mpsc::Sender<Self::Event> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    // Without a runtime the receiver is dropped and every send fails.
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    }
    tx
  }
}

/// Resolves at `deadline`, never when disarmed.
async fn elapsed(deadline: Option<Instant>) {
  match deadline {
    Some(deadline) => time::sleep_until(deadline).await,
    None => std::future::pending().await,
  }
}

async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: mpsc::Receiver<Hook::Event>) {
  let mut deadline = None;
  loop {
    tokio::select! {
      biased;
      event = rx.recv() => {
        let Some(event) = event else {
          break;
        };
        deadline = hook.handle_event(event, deadline);
      },
      () = elapsed(deadline) => {
        deadline = None;
        hook.finish_debounce();
      },
    }
  }
}

/// Send without blocking. Returns whether the event was queued.
pub fn try_send<T>(tx: &Sender<T>, data: T) -> bool {
  tx.try_send(data).is_ok()
}
