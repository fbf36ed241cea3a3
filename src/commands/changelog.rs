//! The `convoy changelog` command
//!
//! Prepends the filtered git history since the latest tag to a
//! distribution's CHANGES.rst, together with draft entries for every commit
//! that carries a ticket marker. The operator edits the draft down by hand
//! before releasing; nothing here is committed.

use crate::core::changelog::CHANGES_FILE;
use crate::core::config::ConvoyConfig;
use crate::core::error::{ConvoyError, ConvoyResult, ResultExt};
use crate::core::history::HistoryFilter;
use crate::core::vcs::GitRepo;
use std::fs;
use std::path::Path;

pub fn run_changelog(path: &Path) -> ConvoyResult<()> {
  if !path.exists() {
    return Err(ConvoyError::message(format!(
      "Path {} does NOT exist",
      path.display()
    )));
  }

  let changes_path = path.join(CHANGES_FILE);
  if !changes_path.exists() {
    return Err(ConvoyError::message(format!(
      "{} does not exist",
      changes_path.display()
    )));
  }

  let config = ConvoyConfig::load(path)?;
  let repo = GitRepo::open(path)?;
  let point = repo.latest_tag(&config.primary_branch)?;
  let raw_history = repo.history_between(point.rev(), &config.primary_branch);
  let history = HistoryFilter::from_config(&config).filter(&raw_history);

  let current = fs::read_to_string(&changes_path)
    .with_context(|| format!("Failed to read {}", changes_path.display()))?;
  fs::write(&changes_path, prepend_history(&current, &history))
    .with_context(|| format!("Failed to write {}", changes_path.display()))?;

  println!("Updated {}", changes_path.display());
  Ok(())
}

/// The raw history block, then one draft bullet per ticket-tagged commit,
/// then the previous file content untouched.
fn prepend_history(current: &str, history: &[String]) -> String {
  let mut out = String::new();
  out.push_str(&history.join("\n"));
  out.push_str("\n\n");

  for line in history {
    if let Some((ticket, title)) = parse_ticket_line(line) {
      out.push_str(&format!("- {}\n  (#{})\n", title, ticket));
    }
  }

  out.push_str("\n\n");
  out.push_str(current);
  out
}

/// Extract `(ticket, title)` from a history line like
/// `* abc1234 [#42] Fix the frobnicator`
fn parse_ticket_line(line: &str) -> Option<(&str, &str)> {
  let start = line.find("[#")?;
  let rest = &line[start + 2..];
  let end = rest.find(']')?;

  let ticket = &rest[..end];
  if ticket.is_empty() || !ticket.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }

  let title = rest[end + 1..].trim();
  if title.is_empty() {
    return None;
  }
  Some((ticket, title))
}
