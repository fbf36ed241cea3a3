//! Git operations over the system git binary

pub mod ephemeral;
pub mod system_git;

pub use ephemeral::{CloneDepth, EphemeralClone};
pub use system_git::GitRepo;

/// Where a distribution's history was last anchored.
///
/// `latest_tag` resolution distinguishes a real tag from the documented
/// fallback so callers can never confuse "no tag yet" with an error. Both
/// variants are valid git revisions and feed the exclusive-lower-bound
/// history window as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefPoint {
  /// A tag reachable from the tracked branch tip
  Tag(String),
  /// No tag on that lineage; anchored at the penultimate commit of the
  /// newest-first revision list instead
  FallbackCommit(String),
}

impl RefPoint {
  /// The underlying revision string, usable wherever git expects a rev
  pub fn rev(&self) -> &str {
    match self {
      RefPoint::Tag(name) => name,
      RefPoint::FallbackCommit(sha) => sha,
    }
  }
}
