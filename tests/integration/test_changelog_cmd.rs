//! The changelog draft command

use crate::helpers::{INITIAL_CHANGES, TestParent};
use anyhow::Result;
use convoy::commands::run_changelog;

#[test]
fn test_changelog_prepends_history_and_draft_entries() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  parent.commit_change("alpha", "Release prep")?;
  parent.push("alpha")?;
  parent.tag("alpha", "0.1")?;
  parent.commit_change("alpha", "[#42] Add widget")?;
  parent.commit_change("alpha", "Bump version to 0.2")?;
  parent.push("alpha")?;

  run_changelog(&parent.checkout("alpha"))?;

  let updated = std::fs::read_to_string(parent.checkout("alpha").join("CHANGES.rst"))?;
  assert!(updated.contains("[#42] Add widget"));
  assert!(updated.contains("- Add widget\n  (#42)\n"));
  assert!(!updated.contains("Bump version to 0.2"));
  assert!(updated.ends_with(INITIAL_CHANGES));
  Ok(())
}

#[test]
fn test_changelog_requires_changes_file() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  std::fs::remove_file(parent.checkout("alpha").join("CHANGES.rst"))?;

  let err = run_changelog(&parent.checkout("alpha")).unwrap_err();
  assert!(err.to_string().contains("CHANGES.rst"));
  Ok(())
}

#[test]
fn test_changelog_rejects_missing_path() {
  let err = run_changelog(std::path::Path::new("/nonexistent/dist")).unwrap_err();
  assert!(err.to_string().contains("does NOT exist"));
}
