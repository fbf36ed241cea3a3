//! Repository facade over the system git binary
//!
//! All repository questions convoy asks (is the tree clean, is the branch
//! pushed, where is the latest tag, what happened since) go through plain
//! git commands with an isolated environment. No git library dependency.

use crate::core::error::{ConvoyError, ConvoyResult, GitError, ResultExt};
use crate::core::vcs::RefPoint;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One git checkout (a distribution, the parent project, or an ephemeral clone)
#[derive(Debug)]
pub struct GitRepo {
  repo_path: PathBuf,
  work_tree: PathBuf,
}

impl GitRepo {
  /// Open a git repository.
  ///
  /// Probing a non-repository returns `GitError::RepoNotFound`; the scanner
  /// relies on that to skip plain folders silently.
  pub fn open(path: &Path) -> ConvoyResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") || stderr.contains("cannot change to") {
        return Err(ConvoyError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ConvoyError::message(format!(
        "Failed to open git repository: {}",
        stderr
      )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = PathBuf::from(stdout.trim());

    // rev-parse searches upward: a plain directory inside a larger repository
    // reports that repository's toplevel. Only a directory that is itself a
    // worktree root counts as a repository here.
    let probed = std::fs::canonicalize(path)
      .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let toplevel = std::fs::canonicalize(&work_tree)
      .with_context(|| format!("Failed to resolve {}", work_tree.display()))?;
    if probed != toplevel {
      return Err(ConvoyError::Git(GitError::RepoNotFound {
        path: path.to_path_buf(),
      }));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: toplevel,
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> ConvoyResult<String> {
    self.run(&["rev-parse", "HEAD"], "git rev-parse HEAD")
  }

  /// Get current branch name ("HEAD" when detached)
  pub fn current_branch(&self) -> ConvoyResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Uncommitted changes in the working tree or index.
  ///
  /// Untracked files do not count as dirty.
  pub fn is_dirty(&self) -> ConvoyResult<bool> {
    let status = self.run(
      &["status", "--porcelain", "--untracked-files=no"],
      "git status --porcelain",
    )?;
    Ok(!status.is_empty())
  }

  /// Fetch new state from origin. Network side effect.
  pub fn fetch(&self) -> ConvoyResult<()> {
    self.run(&["fetch", "origin"], "git fetch origin")?;
    Ok(())
  }

  /// Whether the local branch matches its origin counterpart.
  ///
  /// Fetches first, then: no local branch means nothing to push (synced);
  /// no remote branch means syncedness cannot be verified (not synced);
  /// otherwise the tip hashes must match.
  pub fn is_branch_synced(&self, branch: &str) -> ConvoyResult<bool> {
    self.fetch()?;

    let Some(local) = self.rev_parse(&format!("refs/heads/{}", branch)) else {
      println!("{} branch does not exist locally", branch);
      return Ok(true);
    };

    let Some(remote) = self.rev_parse(&format!("refs/remotes/origin/{}", branch)) else {
      println!("{} branch does not exist remotely", branch);
      return Ok(false);
    };

    Ok(local == remote)
  }

  /// Tip commit of the remote-tracking branch
  pub fn remote_tip(&self, branch: &str) -> ConvoyResult<String> {
    self
      .rev_parse(&format!("refs/remotes/origin/{}", branch))
      .ok_or_else(|| {
        ConvoyError::Git(GitError::BranchMissing {
          branch: branch.to_string(),
        })
      })
  }

  /// Latest tag reachable from the remote branch tip.
  ///
  /// Without a tag on that lineage the anchor falls back to the penultimate
  /// entry of the newest-first revision list. The history window is
  /// `<anchor>~1..<branch>`, so this particular commit keeps everything after
  /// the root commit visible for a repository that was never tagged.
  pub fn latest_tag(&self, branch: &str) -> ConvoyResult<RefPoint> {
    let tip = self.remote_tip(branch)?;

    let described = self
      .git_cmd()
      .args(["describe", "--abbrev=0", "--tags", &tip])
      .output()
      .context("Failed to run git describe")?;

    if described.status.success() {
      let tag = String::from_utf8_lossy(&described.stdout).trim().to_string();
      return Ok(RefPoint::Tag(tag));
    }

    let listed = self.run(&["rev-list", &tip], "git rev-list")?;
    let commits: Vec<&str> = listed.lines().collect();
    let fallback = if commits.len() >= 2 {
      commits[commits.len() - 2]
    } else {
      commits.first().copied().unwrap_or(tip.as_str())
    };

    Ok(RefPoint::FallbackCommit(fallback.to_string()))
  }

  /// Commit a tag points at
  pub fn tag_commit(&self, tag: &str) -> ConvoyResult<String> {
    self.run(&["rev-parse", &format!("{}^{{commit}}", tag)], "git rev-parse <tag>")
  }

  /// Compact one-line history of `branch` not reachable from `lower`'s parent.
  ///
  /// A failed revision lookup yields an empty history, never an error;
  /// callers treat empty as "nothing to show".
  pub fn history_between(&self, lower: &str, branch: &str) -> Vec<String> {
    let range = format!("{}~1..{}", lower, branch);
    let output = self
      .git_cmd()
      .args(["log", "--oneline", "--graph", &range])
      .output();

    match output {
      Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(String::from)
        .collect(),
      _ => Vec::new(),
    }
  }

  /// Create a lightweight tag at HEAD
  pub fn create_tag(&self, name: &str) -> ConvoyResult<()> {
    self.run(&["tag", name], "git tag")?;
    Ok(())
  }

  /// Most recently created tag, if the repository has any
  pub fn latest_created_tag(&self) -> ConvoyResult<Option<String>> {
    let listed = self.run(
      &[
        "for-each-ref",
        "--sort=-creatordate",
        "--count=1",
        "--format=%(refname:short)",
        "refs/tags",
      ],
      "git for-each-ref refs/tags",
    )?;

    if listed.is_empty() {
      Ok(None)
    } else {
      Ok(Some(listed))
    }
  }

  /// Fast-forward the local branch onto its freshly fetched origin state
  pub fn update_branch(&self, branch: &str) -> ConvoyResult<()> {
    self.fetch()?;
    self.run(&["checkout", branch], "git checkout")?;
    self.run(
      &["merge", "--ff-only", &format!("origin/{}", branch)],
      "git merge --ff-only",
    )?;
    Ok(())
  }

  /// Stage the given paths and commit them with the message
  pub fn commit_paths(&self, paths: &[&Path], message: &str) -> ConvoyResult<()> {
    let mut cmd = self.git_cmd();
    cmd.arg("add");
    for path in paths {
      cmd.arg(path);
    }
    run_checked(cmd, "git add")?;

    let mut cmd = self.git_cmd();
    cmd.args(["commit", "-m", message]);
    run_checked(cmd, "git commit")?;
    Ok(())
  }

  /// Push the current branch to origin
  pub fn push(&self) -> ConvoyResult<()> {
    self.run(&["push", "origin", "HEAD"], "git push")?;
    Ok(())
  }

  /// Resolve a revision to a SHA, None when it does not exist
  fn rev_parse(&self, rev: &str) -> Option<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet", rev])
      .output()
      .ok()?;

    if !output.status.success() {
      return None;
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() { None } else { Some(sha) }
  }

  /// Run a git command, demanding success and returning trimmed stdout
  fn run(&self, args: &[&str], command_name: &str) -> ConvoyResult<String> {
    let mut cmd = self.git_cmd();
    cmd.args(args);
    run_checked(cmd, command_name)
  }

  /// Create a git command with an isolated environment
  ///
  /// - Sets working directory to the repo path
  /// - Clears environment variables, whitelisting PATH and HOME
  /// - Forces safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

fn run_checked(mut cmd: Command, command_name: &str) -> ConvoyResult<String> {
  let output = cmd
    .output()
    .with_context(|| format!("Failed to execute {}", command_name))?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(ConvoyError::Git(GitError::CommandFailed {
      command: command_name.to_string(),
      stderr: stderr.to_string(),
    }));
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
