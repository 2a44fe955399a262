//! Terminal host for the indent guide core.
//!
//! Simulates a single command in a view: the cursor is placed, the command
//! cycle runs (waiting out the idle timer when a delay is configured) and the
//! viewport is printed with the resulting guides.

mod cli;
mod print;

use std::io::{
  self,
  IsTerminal,
};

use clap::Parser;
use eyre::{
  Result,
  WrapErr,
  eyre,
};
use guide_event::{
  IdleEvent,
  TimerToken,
  spawn_idle_timer,
};
use guide_lib::{
  buffer::RopeView,
  guides::{
    HostState,
    IndentGuides,
  },
};
use ropey::Rope;

use crate::cli::Cli;

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbosity);

  let config = cli.guide_config()?;
  let text = std::fs::read_to_string(&cli.file)
    .wrap_err_with(|| format!("failed to read {}", cli.file.display()))?;
  let view = RopeView::new(Rope::from(text), cli.tab_width)?
    .with_cursor(cli.cursor())
    .with_viewport(
      cli.first_line.saturating_sub(1),
      cli.height.unwrap_or(usize::MAX),
    );

  let context = cli.context();
  let host = HostState::new(&context);
  let mut guides = IndentGuides::new(config);

  guides.pre_command();
  if let Some(token) = guides.post_command(&view, &host) {
    let token = wait_for_idle(token)?;
    if !guides.on_idle(token, &view, &host) {
      log::debug!("idle timer fired for a stale render");
    }
  }
  log::info!(
    "{} guide marks for {} ({})",
    guides.marks().marks().len(),
    cli.file.display(),
    context
  );

  let stdout = io::stdout();
  let styled = stdout.is_terminal();
  print::print_viewport(&mut stdout.lock(), &view, guides.marks(), styled)?;
  Ok(())
}

fn init_logging(verbosity: u8) {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };
  env_logger::Builder::new()
    .filter_level(level)
    .parse_default_env()
    .init();
}

/// Arms the idle timer with `token` and blocks until it elapses.
fn wait_for_idle(token: TimerToken) -> Result<TimerToken> {
  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_time()
    .build()?;
  runtime.block_on(async {
    let (timer, mut elapsed) = spawn_idle_timer();
    timer
      .send(IdleEvent::Arm(token))
      .await
      .wrap_err("idle timer stopped before it was armed")?;
    elapsed
      .recv()
      .await
      .ok_or_else(|| eyre!("idle timer stopped without firing"))
  })
}
