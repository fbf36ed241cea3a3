//! Single-distribution release via the external release tool
//!
//! convoy never bumps versions or writes tags for a release itself; that is
//! the external tool's job (version bump, tag, upload, its own prompts). This
//! module checks the preconditions, hands the tool a full-history ephemeral
//! clone, and reads the resulting tag back as the new version.

use crate::core::config::ConvoyConfig;
use crate::core::error::{ConvoyError, ConvoyResult, ResultExt};
use crate::core::pins::SourceRef;
use crate::core::vcs::{EphemeralClone, GitRepo};
use std::path::Path;
use std::process::Command;

/// Releases one distribution after verifying preconditions
pub struct DistributionRelease<'a> {
  config: &'a ConvoyConfig,
  parent_root: &'a Path,
}

impl<'a> DistributionRelease<'a> {
  pub fn new(config: &'a ConvoyConfig, parent_root: &'a Path) -> Self {
    Self { config, parent_root }
  }

  /// Run the external release tool against the distribution's canonical
  /// repository and return the new version (the tag the tool created).
  ///
  /// Hard preconditions, checked in order:
  /// 1. the parent project is on its primary branch
  /// 2. the distribution checkout exists on disk
  pub fn release(&self, dist_path: &Path, source: &SourceRef) -> ConvoyResult<String> {
    self.check_parent_branch()?;
    self.check_distribution_exists(dist_path)?;

    // The release tool needs the entire history to tag correctly.
    let clone = EphemeralClone::full(source)?;
    self.run_release_tool(clone.path())?;

    let version = clone.repo().latest_created_tag()?.ok_or_else(|| {
      ConvoyError::message(format!(
        "Release tool finished but created no tag in {}",
        clone.path().display()
      ))
    })?;

    // Bring the operator's own checkout up to the just-pushed state.
    GitRepo::open(dist_path)?.update_branch(&source.branch)?;

    Ok(version)
  }

  fn check_parent_branch(&self) -> ConvoyResult<()> {
    let parent = GitRepo::open(self.parent_root)?;
    let current = parent.current_branch()?;

    if current != self.config.primary_branch {
      return Err(ConvoyError::with_help(
        format!(
          "Parent project is not on the {} branch, but on {}",
          self.config.primary_branch, current
        ),
        "Switch the parent project to its primary branch before releasing.",
      ));
    }
    Ok(())
  }

  fn check_distribution_exists(&self, dist_path: &Path) -> ConvoyResult<()> {
    if !dist_path.exists() {
      return Err(ConvoyError::message(format!(
        "Path {} does NOT exist",
        dist_path.display()
      )));
    }
    Ok(())
  }

  /// Spawn the release tool inside the clone with an empty argument vector.
  ///
  /// The tool must not see convoy's own command line; it runs on its own
  /// prompts with inherited stdio.
  fn run_release_tool(&self, checkout: &Path) -> ConvoyResult<()> {
    let status = Command::new(&self.config.release_tool)
      .current_dir(checkout)
      .status()
      .with_context(|| format!("Failed to run release tool '{}'", self.config.release_tool))?;

    if !status.success() {
      return Err(ConvoyError::message(format!(
        "Release tool '{}' failed in {}",
        self.config.release_tool,
        checkout.display()
      )));
    }
    Ok(())
  }
}
