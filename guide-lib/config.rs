use std::{
  path::{
    Path,
    PathBuf,
  },
  time::Duration,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

use crate::{
  compose::ComposeOptions,
  extent::ExtentPolicy,
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error(transparent)]
  Parse(#[from] toml::de::Error),
  #[error("guide-char {0:?} must occupy exactly one cell")]
  GuideCharWidth(char),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Indent guide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GuideConfig {
  pub enable:              bool,
  pub guide_char:          char,
  /// Milliseconds without input before guides are drawn; 0 draws them after
  /// every command.
  pub idle_delay:          u64,
  /// Only levels whose column is strictly greater are drawn.
  pub threshold:           Option<usize>,
  pub recursive:           bool,
  /// Buffer contexts (major modes, language ids) where guides are off.
  pub inhibited_contexts:  Vec<String>,
  /// Contexts whose blocks close at the end of their last line.
  pub tail_brace_contexts: Vec<String>,
}

impl Default for GuideConfig {
  fn default() -> Self {
    Self {
      enable:              true,
      guide_char:          '|',
      idle_delay:          0,
      threshold:           None,
      recursive:           false,
      inhibited_contexts:  [
        "tabulated-list",
        "special",
        "dired",
        "eww",
        "eshell",
        "custom",
      ]
      .map(String::from)
      .into(),
      tail_brace_contexts: [
        "lisp",
        "emacs-lisp",
        "lisp-interaction",
        "scheme",
        "gauche",
        "clojure",
        "racket",
        "egison",
      ]
      .map(String::from)
      .into(),
    }
  }
}

impl GuideConfig {
  pub fn from_toml_str(source: &str) -> Result<Self> {
    let config: Self = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: &Path) -> Result<Self> {
    let source = std::fs::read_to_string(path).map_err(|source| {
      ConfigError::Io {
        path: path.to_path_buf(),
        source,
      }
    })?;
    Self::from_toml_str(&source)
  }

  pub fn validate(&self) -> Result<()> {
    if self.guide_char.width() != Some(1) {
      return Err(ConfigError::GuideCharWidth(self.guide_char));
    }
    Ok(())
  }

  pub fn idle_delay(&self) -> Duration {
    Duration::from_millis(self.idle_delay)
  }

  pub fn is_inhibited(&self, context: &str) -> bool {
    self.inhibited_contexts.iter().any(|name| name == context)
  }

  pub fn extent_policy(&self, context: &str) -> ExtentPolicy {
    if self.tail_brace_contexts.iter().any(|name| name == context) {
      ExtentPolicy::TailBrace
    } else {
      ExtentPolicy::Ordinary
    }
  }

  pub fn compose_options(&self, context: &str) -> ComposeOptions {
    ComposeOptions {
      recursive: self.recursive,
      threshold: self.threshold,
      policy:    self.extent_policy(context),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn defaults_always_draw_synchronously() {
    let config = GuideConfig::default();
    assert!(config.enable);
    assert_eq!(config.guide_char, '|');
    assert_eq!(config.idle_delay(), Duration::ZERO);
    assert_eq!(config.threshold, None);
    assert!(!config.recursive);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn empty_document_yields_defaults() {
    assert_eq!(GuideConfig::from_toml_str("").unwrap(), GuideConfig::default());
  }

  #[test]
  fn kebab_case_keys_are_read() {
    let config = GuideConfig::from_toml_str(
      r#"
        guide-char = "│"
        idle-delay = 150
        threshold = 0
        recursive = true
        tail-brace-contexts = ["fennel"]
      "#,
    )
    .unwrap();
    assert_eq!(config.guide_char, '│');
    assert_eq!(config.idle_delay(), Duration::from_millis(150));
    assert_eq!(config.threshold, Some(0));
    assert!(config.recursive);
    assert_eq!(config.extent_policy("fennel"), ExtentPolicy::TailBrace);
    assert_eq!(config.extent_policy("lisp"), ExtentPolicy::Ordinary);
    assert!(config.is_inhibited("dired"));
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(matches!(
      GuideConfig::from_toml_str("colour = \"red\""),
      Err(ConfigError::Parse(_))
    ));
  }

  #[test]
  fn wide_guide_char_is_rejected() {
    assert!(matches!(
      GuideConfig::from_toml_str("guide-char = \"界\""),
      Err(ConfigError::GuideCharWidth('界'))
    ));
  }

  #[test]
  fn load_reports_the_missing_path() {
    let err = GuideConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.toml"));
  }

  #[test]
  fn load_reads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "recursive = true").unwrap();
    let config = GuideConfig::load(file.path()).unwrap();
    assert!(config.recursive);
  }
}
