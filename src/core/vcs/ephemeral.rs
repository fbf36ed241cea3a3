//! Ephemeral clones: temporary checkouts with guaranteed cleanup
//!
//! Inspecting or releasing a distribution must never touch the operator's own
//! checkout, so convoy clones the declared source into a temporary directory.
//! The directory is owned by a `TempDir`, so it is removed on every exit path
//! including errors and panics.

use crate::core::error::{ConvoyError, ConvoyResult, GitError, ResultExt};
use crate::core::pins::SourceRef;
use crate::core::vcs::GitRepo;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Commits fetched per branch in shallow mode. History queries deeper than
/// this are out of contract.
pub const SHALLOW_DEPTH: u32 = 100;

/// How much history an ephemeral clone carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneDepth {
  /// `SHALLOW_DEPTH` commits across all branches; enough for inspection
  Shallow,
  /// Entire history; required whenever a release will actually happen
  Full,
}

/// A scoped clone of a distribution's canonical repository
pub struct EphemeralClone {
  dir: TempDir,
  repo: GitRepo,
}

impl EphemeralClone {
  /// Clone the declared source into a fresh temporary directory.
  pub fn new(source: &SourceRef, depth: CloneDepth) -> ConvoyResult<Self> {
    let dir = TempDir::new().context("Failed to create temporary clone directory")?;
    let target = dir.path().join("checkout");

    let mut cmd = Command::new("git");
    cmd.arg("clone");
    if depth == CloneDepth::Shallow {
      cmd.args(["--depth", &SHALLOW_DEPTH.to_string(), "--no-single-branch"]);
    }
    cmd.arg(&source.url).arg(&target);

    let output = cmd
      .output()
      .with_context(|| format!("Failed to clone {}", source.url))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ConvoyError::Git(GitError::CommandFailed {
        command: format!("git clone {}", source.url),
        stderr: stderr.to_string(),
      }));
    }

    let repo = GitRepo::open(&target)?;
    Ok(Self { dir, repo })
  }

  pub fn shallow(source: &SourceRef) -> ConvoyResult<Self> {
    Self::new(source, CloneDepth::Shallow)
  }

  pub fn full(source: &SourceRef) -> ConvoyResult<Self> {
    Self::new(source, CloneDepth::Full)
  }

  /// Facade over the cloned checkout
  pub fn repo(&self) -> &GitRepo {
    &self.repo
  }

  /// Path of the cloned working tree
  pub fn path(&self) -> &Path {
    self.repo.work_tree()
  }

  /// Path of the temporary directory itself (removed on drop)
  pub fn temp_path(&self) -> &Path {
    self.dir.path()
  }
}
