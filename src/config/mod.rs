use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::snapshot::Format;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Snapshot configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SnapshotConfig {
  /// Format used by `save`; `load` detects the format from the file
  #[serde(default)]
  pub format: Format,
}

/// corekv configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
  /// Prompt shown by the interactive session
  #[serde(default = "default_prompt")]
  pub prompt: String,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,

  /// Snapshot configuration
  #[serde(default)]
  pub snapshot: SnapshotConfig,
}

fn default_prompt() -> String {
  ">> ".to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      prompt: default_prompt(),
      log: LogConfig::default(),
      snapshot: SnapshotConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path)
      .with_context(|| format!("failed to read config file '{}'", path.display()))?;

    let config: Config = toml::from_str(&config_str)
      .with_context(|| format!("failed to parse config file '{}'", path.display()))?;

    Ok(config)
  }
}
