//! Distribution discovery
//!
//! A distribution is any immediate subdirectory of the source directory that
//! opens as a git repository. Plain files and non-repository folders are
//! skipped without comment; that is normal workspace clutter, not an error.

use crate::core::error::{ConvoyError, ConvoyResult, GitError, ResultExt};
use crate::core::vcs::GitRepo;
use std::path::{Path, PathBuf};

/// One independently versioned repository under the parent project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
  pub path: PathBuf,
  pub name: String,
}

impl Distribution {
  /// Identity is the filesystem path; the short name is its final segment.
  pub fn new(path: PathBuf) -> Self {
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default();
    Self { path, name }
  }

  /// Open the checkout this distribution lives in
  pub fn repo(&self) -> ConvoyResult<GitRepo> {
    GitRepo::open(&self.path)
  }

  /// Whether the name matches any of the comma-separated filter patterns.
  /// An empty filter matches everything.
  pub fn matches(&self, patterns: &[String]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| self.name.contains(p.as_str()))
  }
}

/// Discover candidate distributions under `root`, in lexicographic order.
///
/// Deterministic given a stable directory listing.
pub fn scan(root: &Path) -> ConvoyResult<Vec<Distribution>> {
  let entries =
    std::fs::read_dir(root).with_context(|| format!("Failed to list distributions under {}", root.display()))?;

  let mut paths: Vec<PathBuf> = entries
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.path())
    .filter(|path| path.is_dir())
    .collect();
  paths.sort();

  let mut distributions = Vec::new();
  for path in paths {
    match GitRepo::open(&path) {
      Ok(_) => distributions.push(Distribution::new(path)),
      Err(ConvoyError::Git(GitError::RepoNotFound { .. })) => {}
      Err(err) => return Err(err),
    }
  }

  Ok(distributions)
}
