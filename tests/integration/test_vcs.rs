//! The git repository facade against real repositories

use crate::helpers::TestParent;
use anyhow::Result;
use convoy::core::error::{ConvoyError, GitError};
use convoy::core::vcs::{GitRepo, RefPoint};

#[test]
fn test_open_non_repository() -> Result<()> {
  let dir = tempfile::tempdir()?;
  let err = GitRepo::open(dir.path()).unwrap_err();
  assert!(matches!(
    err,
    ConvoyError::Git(GitError::RepoNotFound { .. })
  ));
  Ok(())
}

#[test]
fn test_open_rejects_subdirectory_of_a_repository() -> Result<()> {
  let parent = TestParent::new()?;

  // src/ sits inside the parent's own repository but is not a worktree root
  let err = GitRepo::open(&parent.path.join("src")).unwrap_err();
  assert!(matches!(
    err,
    ConvoyError::Git(GitError::RepoNotFound { .. })
  ));
  Ok(())
}

#[test]
fn test_dirty_ignores_untracked_files() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  let repo = GitRepo::open(&parent.checkout("alpha"))?;

  assert!(!repo.is_dirty()?);

  std::fs::write(parent.checkout("alpha").join("scratch.txt"), "untracked\n")?;
  assert!(!repo.is_dirty()?);

  parent.make_dirty("alpha")?;
  assert!(repo.is_dirty()?);
  Ok(())
}

#[test]
fn test_branch_sync_tracks_unpushed_commits() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  let repo = GitRepo::open(&parent.checkout("alpha"))?;

  assert!(repo.is_branch_synced("master")?);

  parent.commit_change("alpha", "Local only change")?;
  assert!(!repo.is_branch_synced("master")?);

  parent.push("alpha")?;
  assert!(repo.is_branch_synced("master")?);
  Ok(())
}

#[test]
fn test_latest_tag_prefers_a_real_tag() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  parent.commit_change("alpha", "Some work")?;
  parent.push("alpha")?;
  parent.tag("alpha", "0.1")?;

  let repo = GitRepo::open(&parent.checkout("alpha"))?;
  assert_eq!(repo.latest_tag("master")?, RefPoint::Tag("0.1".to_string()));
  Ok(())
}

#[test]
fn test_latest_tag_fallback_is_second_newest_commit() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  let middle = parent.commit_change("alpha", "Second commit")?;
  parent.commit_change("alpha", "Third commit")?;
  parent.push("alpha")?;

  let repo = GitRepo::open(&parent.checkout("alpha"))?;
  assert_eq!(repo.latest_tag("master")?, RefPoint::FallbackCommit(middle));
  Ok(())
}

#[test]
fn test_history_between_window() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  parent.commit_change("alpha", "Tagged commit")?;
  parent.push("alpha")?;
  parent.tag("alpha", "0.1")?;
  parent.commit_change("alpha", "After the tag")?;
  parent.push("alpha")?;

  let repo = GitRepo::open(&parent.checkout("alpha"))?;
  let history = repo.history_between("0.1", "master");

  // window is tag~1..branch: the tagged commit stays visible
  assert_eq!(history.len(), 2);
  assert!(history[0].contains("After the tag"));
  assert!(history[1].contains("Tagged commit"));
  assert!(!history.iter().any(|l| l.contains("Initial commit")));
  Ok(())
}

#[test]
fn test_history_between_bad_rev_is_empty() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;

  let repo = GitRepo::open(&parent.checkout("alpha"))?;
  assert!(repo.history_between("no-such-rev", "master").is_empty());
  Ok(())
}

#[test]
fn test_latest_created_tag() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  let repo = GitRepo::open(&parent.checkout("alpha"))?;

  assert_eq!(repo.latest_created_tag()?, None);

  parent.tag("alpha", "0.1")?;
  assert_eq!(repo.latest_created_tag()?, Some("0.1".to_string()));
  Ok(())
}
