//! Read-only extraction of the unreleased changelog block
//!
//! Distribution changelogs follow the convention of `CHANGES.rst` section
//! headers: `<version> (unreleased)` for the block being written, and
//! `<version> (YYYY-MM-DD)` for released blocks. The unreleased block is what
//! the operator compares against git history; convoy never rewrites the file
//! from this module.

use crate::core::error::{ConvoyResult, ResultExt};
use std::fs;
use std::path::Path;

/// Changelog file name looked up inside each distribution checkout
pub const CHANGES_FILE: &str = "CHANGES.rst";

/// Extract the unreleased section of a changelog.
///
/// Returns the lines starting at the `(unreleased)` header up to (not
/// including) the first released-section header. At most one block is ever
/// extracted; a file without an unreleased header yields an empty vec.
pub fn unreleased_section(text: &str) -> Vec<String> {
  let mut lines = Vec::new();
  let mut in_section = false;

  for line in text.lines() {
    if is_unreleased_header(line) {
      in_section = true;
    }

    if is_release_header(line) {
      break;
    }

    if in_section {
      lines.push(line.to_string());
    }
  }

  lines
}

/// The entry body of the unreleased section: everything below the header and
/// its underline. This is what gets echoed into the aggregate commit message.
pub fn unreleased_entries(text: &str) -> String {
  let section = unreleased_section(text);
  if section.len() <= 2 {
    return String::new();
  }

  let mut body = section[2..].join("\n");
  body.push('\n');
  body
}

/// Read a distribution's changelog and return its unreleased entry body.
pub fn read_unreleased_entries(dist_path: &Path) -> ConvoyResult<String> {
  let changes_path = dist_path.join(CHANGES_FILE);
  let text = fs::read_to_string(&changes_path)
    .with_context(|| format!("Failed to read {}", changes_path.display()))?;
  Ok(unreleased_entries(&text))
}

/// A header of the form `<version> (unreleased)`
fn is_unreleased_header(line: &str) -> bool {
  let trimmed = line.trim_end();
  trimmed.ends_with(" (unreleased)")
}

/// A header of the form `<version> (YYYY-MM-DD)`; digit runs of any length
fn is_release_header(line: &str) -> bool {
  let trimmed = line.trim_end();
  if !trimmed.ends_with(')') {
    return false;
  }
  let Some(open) = trimmed.rfind(" (") else {
    return false;
  };
  let inner = &trimmed[open + 2..trimmed.len() - 1];

  let parts: Vec<&str> = inner.split('-').collect();
  parts.len() == 3
    && parts
      .iter()
      .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
