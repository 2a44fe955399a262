//! Event plumbing for deferred guide rendering.
//!
//! The guide core is synchronous. Anything that has to wait for the user to go
//! idle lives here and hands control back to the host through a channel.

mod debounce;
pub mod idle;

pub use debounce::{
  AsyncHook,
  try_send,
};
pub use idle::{
  IdleEvent,
  IdleTimer,
  TimerToken,
  spawn_idle_timer,
};
