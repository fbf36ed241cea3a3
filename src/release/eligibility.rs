//! Release eligibility: the two tests a distribution must pass
//!
//! 1. Clean tree: no uncommitted changes and nothing unpushed on the tracked
//!    branch. A distribution failing this is not safe to release from.
//! 2. Unreleased history: the tracked branch tip moved past the latest tag
//!    (or the distribution was never tagged at all).
//!
//! Both checks are pure decisions over the repository facade; dry-run policy
//! and operator prompting live in the pipeline.

use crate::core::error::ConvoyResult;
use crate::core::vcs::{GitRepo, RefPoint};

/// Outcome of the clean-tree test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOutcome {
  pub dirty: bool,
  pub unpushed: bool,
}

impl CleanOutcome {
  pub fn is_clean(&self) -> bool {
    !self.dirty && !self.unpushed
  }
}

/// Check a local checkout for uncommitted or unpushed work
pub fn check_clean(repo: &GitRepo, branch: &str) -> ConvoyResult<CleanOutcome> {
  let dirty = repo.is_dirty()?;
  let unpushed = !repo.is_branch_synced(branch)?;
  Ok(CleanOutcome { dirty, unpushed })
}

/// Outcome of the unreleased-history test.
///
/// Both variants carry the resolved anchor so dry-run reporting can show the
/// last known point even when nothing needs releasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseNeed {
  /// The latest tag sits on the branch tip; nothing to release
  UpToDate(RefPoint),
  /// The branch moved past the recorded point (or no tag exists)
  Needed(RefPoint),
}

impl ReleaseNeed {
  pub fn point(&self) -> &RefPoint {
    match self {
      ReleaseNeed::UpToDate(point) | ReleaseNeed::Needed(point) => point,
    }
  }

  pub fn is_needed(&self) -> bool {
    matches!(self, ReleaseNeed::Needed(_))
  }
}

/// Decide whether a distribution has unreleased history on `branch`.
///
/// No tag on the branch lineage unconditionally needs a release, anchored at
/// the documented fallback commit. With a tag, the tag's commit is compared
/// to the remote branch tip: equal means up to date, different means the
/// branch is ahead.
pub fn check_unreleased(repo: &GitRepo, branch: &str) -> ConvoyResult<ReleaseNeed> {
  let point = repo.latest_tag(branch)?;

  let tag = match &point {
    RefPoint::FallbackCommit(_) => return Ok(ReleaseNeed::Needed(point)),
    RefPoint::Tag(tag) => tag.clone(),
  };

  let tag_sha = repo.tag_commit(&tag)?;
  let tip_sha = repo.remote_tip(branch)?;
  if tag_sha == tip_sha {
    Ok(ReleaseNeed::UpToDate(point))
  } else {
    Ok(ReleaseNeed::Needed(point))
  }
}
