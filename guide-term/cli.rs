use std::path::{
  Path,
  PathBuf,
};

use clap::{
  ArgAction,
  Parser,
};
use guide_lib::{
  config::GuideConfig,
  position::Position,
};

#[derive(Debug, Parser)]
#[command(name = "indent-guide")]
#[command(about = "Print a file with the indent guides for a cursor position")]
pub struct Cli {
  /// File to display
  pub file: PathBuf,

  /// Cursor line (1-based)
  #[arg(short, long, default_value_t = 1)]
  pub line: usize,

  /// Cursor column in characters (1-based)
  #[arg(short, long, default_value_t = 1)]
  pub column: usize,

  /// Display width of a tab character
  #[arg(short, long, default_value_t = 8)]
  pub tab_width: usize,

  /// First line of the viewport (1-based)
  #[arg(long, default_value_t = 1)]
  pub first_line: usize,

  /// Number of lines in the viewport, the rest of the file by default
  #[arg(long)]
  pub height: Option<usize>,

  /// Buffer context (major mode or language id), guessed from the file
  /// extension when omitted
  #[arg(long, value_name = "NAME")]
  pub context: Option<String>,

  /// Read settings from a TOML file
  #[arg(long, value_name = "PATH")]
  pub config: Option<PathBuf>,

  /// Draw every enclosing level
  #[arg(short, long)]
  pub recursive: bool,

  /// Only draw levels deeper than this column
  #[arg(long, value_name = "COLUMN")]
  pub threshold: Option<usize>,

  /// Idle delay in milliseconds before guides are drawn
  #[arg(long, value_name = "MS")]
  pub delay: Option<u64>,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  pub verbosity: u8,
}

impl Cli {
  /// The config file (or defaults) with command line overrides applied.
  pub fn guide_config(&self) -> guide_lib::config::Result<GuideConfig> {
    let mut config = match &self.config {
      Some(path) => GuideConfig::load(path)?,
      None => GuideConfig::default(),
    };
    if self.recursive {
      config.recursive = true;
    }
    if let Some(threshold) = self.threshold {
      config.threshold = Some(threshold);
    }
    if let Some(delay) = self.delay {
      config.idle_delay = delay;
    }
    Ok(config)
  }

  pub fn cursor(&self) -> Position {
    Position::new(self.line.saturating_sub(1), self.column.saturating_sub(1))
  }

  pub fn context(&self) -> String {
    self
      .context
      .clone()
      .unwrap_or_else(|| context_for_path(&self.file).to_string())
  }
}

fn context_for_path(path: &Path) -> &'static str {
  let extension = path
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or_default();
  match extension {
    "el" => "emacs-lisp",
    "lisp" | "lsp" | "cl" => "lisp",
    "scm" | "ss" => "scheme",
    "clj" | "cljs" | "cljc" | "edn" => "clojure",
    "rkt" => "racket",
    "egi" => "egison",
    "rs" => "rust",
    "py" => "python",
    "c" | "h" => "c",
    "js" | "mjs" => "javascript",
    _ => "text",
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[test]
  fn positions_are_one_based() {
    let cli = Cli::try_parse_from(["indent-guide", "main.rs", "--line", "3", "--column", "5"]).unwrap();
    assert_eq!(cli.cursor(), Position::new(2, 4));
    assert_eq!(cli.context(), "rust");
  }

  #[test]
  fn flags_override_defaults() {
    let cli = Cli::try_parse_from([
      "indent-guide",
      "init.el",
      "-r",
      "--threshold",
      "2",
      "--delay",
      "75",
      "-vv",
    ])
    .unwrap();
    let config = cli.guide_config().unwrap();
    assert!(config.recursive);
    assert_eq!(config.threshold, Some(2));
    assert_eq!(config.idle_delay(), Duration::from_millis(75));
    assert_eq!(cli.verbosity, 2);
    assert_eq!(cli.context(), "emacs-lisp");
  }

  #[test]
  fn explicit_context_wins() {
    let cli = Cli::try_parse_from(["indent-guide", "notes", "--context", "dired"]).unwrap();
    assert_eq!(cli.context(), "dired");
  }

  #[test]
  fn file_is_required() {
    assert!(Cli::try_parse_from(["indent-guide"]).is_err());
  }
}
