//! Approval evidence: what the operator sees before saying yes
//!
//! For each eligible distribution the operator is shown two things side by
//! side: the filtered git history since the last known point, and the
//! unreleased section the distribution's changelog already declares. The
//! question is whether the latter honestly covers the former.
//!
//! Gathering is separated from asking: `gather_evidence` does the clone and
//! the reading, `Evidence` is plain data, and only the pipeline talks to the
//! prompter.

use crate::core::changelog;
use crate::core::error::ConvoyResult;
use crate::core::history::HistoryFilter;
use crate::core::pins::SourceRef;
use crate::core::vcs::{EphemeralClone, RefPoint};

/// The question put to the operator for every candidate
pub const APPROVAL_QUESTION: &str = "Is the change log ready for release?";

/// Pre-fetched material for one approval decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
  /// Filtered one-line git history since the last known point
  pub history: Vec<String>,
  /// Entry body of the changelog's unreleased section
  pub changelog: String,
}

impl Evidence {
  /// Render both halves the way they are presented to the operator
  pub fn render(&self) -> String {
    format!("\n{}\n\n\n{}\n", self.history.join("\n"), self.changelog)
  }
}

/// Inspect a distribution's canonical repository and collect approval
/// evidence.
///
/// Returns `None` when the filtered history is empty: administrative-only
/// churn is not release-worthy and the operator is never bothered with it.
pub fn gather_evidence(
  source: &SourceRef,
  last_point: &RefPoint,
  filter: &HistoryFilter,
) -> ConvoyResult<Option<Evidence>> {
  let clone = EphemeralClone::shallow(source)?;
  let raw_history = clone.repo().history_between(last_point.rev(), &source.branch);
  let history = filter.filter(&raw_history);

  if history.is_empty() {
    return Ok(None);
  }

  let changelog = changelog::read_unreleased_entries(clone.path())?;

  Ok(Some(Evidence { history, changelog }))
}
