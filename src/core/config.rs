//! Run configuration for convoy
//!
//! Searched in order: convoy.toml, .convoy.toml, .config/convoy.toml.
//! Every field has a default, so a parent project without a config file gets
//! the stock behavior.

use crate::core::error::{ConvoyResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Commit message fragments that mark administrative commits.
///
/// Lines of git history containing any of these are hidden from the operator
/// and never count toward release-worthiness. Repositories using different
/// housekeeping conventions can override the list in convoy.toml.
pub const DEFAULT_IGNORE_MESSAGES: [&str; 5] = [
  "Back to development",
  "Bump version",
  "Update CHANGES",
  "New version:",
  "Preparing release ",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvoyConfig {
  /// Directory under the parent project holding distribution checkouts
  #[serde(default = "default_src_dir")]
  pub src_dir: PathBuf,

  /// Pin file mapping distribution name to source and pinned version
  #[serde(default = "default_pin_file")]
  pub pin_file: PathBuf,

  /// Branch the parent project must be on for releases to proceed,
  /// and the branch distributions are checked against
  #[serde(default = "default_primary_branch")]
  pub primary_branch: String,

  /// External single-repository release tool, resolved on PATH
  #[serde(default = "default_release_tool")]
  pub release_tool: String,

  /// Administrative commit-message markers to hide from history
  #[serde(default = "default_ignore_messages")]
  pub ignore_messages: Vec<String>,
}

fn default_src_dir() -> PathBuf {
  PathBuf::from("src")
}

fn default_pin_file() -> PathBuf {
  PathBuf::from("pins.toml")
}

fn default_primary_branch() -> String {
  "master".to_string()
}

fn default_release_tool() -> String {
  "fullrelease".to_string()
}

fn default_ignore_messages() -> Vec<String> {
  DEFAULT_IGNORE_MESSAGES.iter().map(|s| s.to_string()).collect()
}

impl Default for ConvoyConfig {
  fn default() -> Self {
    Self {
      src_dir: default_src_dir(),
      pin_file: default_pin_file(),
      primary_branch: default_primary_branch(),
      release_tool: default_release_tool(),
      ignore_messages: default_ignore_messages(),
    }
  }
}

impl ConvoyConfig {
  /// Find config file in search order: convoy.toml, .convoy.toml, .config/convoy.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("convoy.toml"),
      root.join(".convoy.toml"),
      root.join(".config").join("convoy.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the parent project root, falling back to defaults
  /// when no config file exists.
  pub fn load(root: &Path) -> ConvoyResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ConvoyConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok(config)
  }
}
