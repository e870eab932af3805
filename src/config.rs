//! Tool configuration loader and platform defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tts-tools.json";

/// Optional settings shared by the backup and prefetch commands.
///
/// Command-line flags take precedence over every value here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
  /// Root of the game's data directory; the platform default when absent.
  pub gamedata_dir: Option<PathBuf>,
  /// Network timeout for a single request, in seconds.
  pub timeout_secs: u64,
  /// `User-Agent` header sent with every request.
  pub user_agent: String,
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      gamedata_dir: None,
      timeout_secs: DEFAULT_TIMEOUT.as_secs(),
      user_agent: DEFAULT_USER_AGENT.to_string(),
    }
  }
}

impl ToolConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// A missing or unparsable file yields the defaults.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
  }

  /// Gamedata root, falling back to the platform default.
  pub fn gamedata_dir(&self) -> PathBuf {
    self
      .gamedata_dir
      .clone()
      .unwrap_or_else(default_gamedata_dir)
  }

  /// Request timeout as a [`Duration`].
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Where Tabletop Simulator keeps its data on this platform.
pub fn default_gamedata_dir() -> PathBuf {
  home_dir().join(gamedata_relative())
}

fn gamedata_relative() -> PathBuf {
  #[cfg(any(target_os = "windows", target_os = "macos"))]
  {
    ["Documents", "My Games", "Tabletop Simulator"].iter().collect()
  }

  #[cfg(not(any(target_os = "windows", target_os = "macos")))]
  {
    [".local", "share", "Tabletop Simulator"].iter().collect()
  }
}

fn home_dir() -> PathBuf {
  #[cfg(target_os = "windows")]
  let var = "USERPROFILE";
  #[cfg(not(target_os = "windows"))]
  let var = "HOME";

  std::env::var_os(var)
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    assert_eq!(ToolConfig::discover(dir.path()), ToolConfig::default());
  }

  #[test]
  fn discover_ignores_broken_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{broken").unwrap();
    assert_eq!(ToolConfig::discover(dir.path()), ToolConfig::default());
  }

  #[test]
  fn explicit_path_reports_errors() {
    let dir = tempdir().unwrap();
    assert!(ToolConfig::from_path(&dir.path().join("missing.json")).is_err());
  }

  #[test]
  fn partial_files_keep_remaining_defaults() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILE),
      r#"{"gamedata_dir": "/games/tts", "timeout_secs": 30}"#,
    )
    .unwrap();

    let config = ToolConfig::discover(dir.path());
    assert_eq!(config.gamedata_dir(), PathBuf::from("/games/tts"));
    assert_eq!(config.timeout(), Duration::from_secs(30));
    assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
  }

  #[test]
  fn default_gamedata_ends_with_game_directory() {
    assert!(default_gamedata_dir().ends_with("Tabletop Simulator"));
  }
}
