//! Test helpers: parent projects with bare upstreams and real git history

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const INITIAL_CHANGES: &str = "\
Changelog
=========

0.2 (unreleased)
----------------

- New widget support

0.1 (2015-11-12)
----------------

- Initial release
";

/// A parent project with a bare upstream of its own, plus per-distribution
/// bare upstreams and checkouts under src/
pub struct TestParent {
  root: TempDir,
  pub path: PathBuf,
  upstream_dir: PathBuf,
  sources: Vec<(String, String)>,
}

impl TestParent {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let upstream_dir = root.path().join("upstream");
    std::fs::create_dir_all(&upstream_dir)?;
    git(&upstream_dir, &["init", "--bare", "--initial-branch=master", "parent.git"])?;
    let parent_bare = upstream_dir.join("parent.git");

    let path = root.path().join("parent");
    std::fs::create_dir_all(&path)?;
    git(&path, &["init", "--initial-branch=master"])?;
    configure_identity(&path)?;
    git(&path, &["remote", "add", "origin", &parent_bare.display().to_string()])?;

    // distribution checkouts are nested repos, the parent must not track them
    std::fs::create_dir_all(path.join("src"))?;
    std::fs::write(path.join(".gitignore"), "src/\n")?;
    std::fs::write(path.join("pins.toml"), "[versions]\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial parent project"])?;
    git(&path, &["push", "-u", "origin", "master"])?;

    Ok(Self {
      root,
      path,
      upstream_dir,
      sources: Vec::new(),
    })
  }

  /// Create a bare upstream plus a checkout under src/, seeded with one
  /// pushed commit carrying a CHANGES.rst, and register it in pins.toml.
  pub fn add_distribution(&mut self, name: &str) -> Result<PathBuf> {
    git(
      &self.upstream_dir,
      &["init", "--bare", "--initial-branch=master", &format!("{}.git", name)],
    )?;
    let bare = self.upstream_dir.join(format!("{}.git", name));

    let checkout = self.path.join("src").join(name);
    std::fs::create_dir_all(&checkout)?;
    git(&checkout, &["init", "--initial-branch=master"])?;
    configure_identity(&checkout)?;
    git(&checkout, &["remote", "add", "origin", &bare.display().to_string()])?;

    std::fs::write(checkout.join("CHANGES.rst"), INITIAL_CHANGES)?;
    std::fs::write(checkout.join("README.md"), format!("# {}\n", name))?;
    git(&checkout, &["add", "."])?;
    git(&checkout, &["commit", "-m", "Initial commit"])?;
    git(&checkout, &["push", "-u", "origin", "master"])?;

    self.sources.push((name.to_string(), bare.display().to_string()));
    self.write_pins()?;
    Ok(checkout)
  }

  pub fn checkout(&self, name: &str) -> PathBuf {
    self.path.join("src").join(name)
  }

  /// Commit a change in the distribution's checkout (not pushed)
  pub fn commit_change(&self, name: &str, message: &str) -> Result<String> {
    let checkout = self.checkout(name);
    let notes = checkout.join("notes.txt");
    let mut content = std::fs::read_to_string(&notes).unwrap_or_default();
    content.push_str(message);
    content.push('\n');
    std::fs::write(&notes, content)?;

    git(&checkout, &["add", "."])?;
    git(&checkout, &["commit", "-m", message])?;
    let output = git(&checkout, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Like `commit_change`, but with fixed author and committer dates so tags
  /// created later by the release tool are unambiguously the newest.
  pub fn commit_change_dated(&self, name: &str, message: &str, date: &str) -> Result<String> {
    let checkout = self.checkout(name);
    let notes = checkout.join("notes.txt");
    let mut content = std::fs::read_to_string(&notes).unwrap_or_default();
    content.push_str(message);
    content.push('\n');
    std::fs::write(&notes, content)?;

    git(&checkout, &["add", "."])?;
    git_env(
      &checkout,
      &["commit", "-m", message],
      &[("GIT_AUTHOR_DATE", date), ("GIT_COMMITTER_DATE", date)],
    )?;
    let output = git(&checkout, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn push(&self, name: &str) -> Result<()> {
    git(&self.checkout(name), &["push", "origin", "master"])?;
    Ok(())
  }

  /// Lightweight tag at the checkout's HEAD, pushed to the upstream
  pub fn tag(&self, name: &str, tag: &str) -> Result<()> {
    let checkout = self.checkout(name);
    git(&checkout, &["tag", tag])?;
    git(&checkout, &["push", "origin", "--tags"])?;
    Ok(())
  }

  /// Modify a tracked file without committing
  pub fn make_dirty(&self, name: &str) -> Result<()> {
    std::fs::write(self.checkout(name).join("README.md"), "dirty\n")?;
    Ok(())
  }

  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("convoy.toml"), content)?;
    Ok(())
  }

  pub fn read_pins(&self) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join("pins.toml"))?)
  }

  /// Message of the newest commit the parent project pushed upstream
  pub fn parent_upstream_message(&self) -> Result<String> {
    let output = git(
      &self.upstream_dir.join("parent.git"),
      &["log", "--format=%B", "-1", "master"],
    )?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Write an executable stand-in for the release tool that creates and
  /// pushes an annotated tag, and return its path.
  pub fn install_release_stub(&self, version: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let bin_dir = self.root.path().join("bin");
    std::fs::create_dir_all(&bin_dir)?;
    let script = bin_dir.join("fake-release");
    std::fs::write(
      &script,
      format!(
        "#!/bin/sh\n\
         set -e\n\
         export GIT_COMMITTER_NAME='Test User'\n\
         export GIT_COMMITTER_EMAIL='test@example.com'\n\
         git tag -a {v} -m 'release {v}'\n\
         git push origin --tags\n",
        v = version
      ),
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    Ok(script)
  }

  fn write_pins(&self) -> Result<()> {
    let mut content = String::new();
    for (name, url) in &self.sources {
      content.push_str(&format!(
        "[sources.\"{}\"]\nurl = \"{}\"\nbranch = \"master\"\n\n",
        name, url
      ));
    }
    content.push_str("[versions]\n");
    std::fs::write(self.path.join("pins.toml"), content)?;
    Ok(())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

fn git_env(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let mut cmd = Command::new("git");
  cmd.current_dir(cwd).args(args);
  for (key, value) in envs {
    cmd.env(key, value);
  }
  let output = cmd.output().context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

fn configure_identity(repo: &Path) -> Result<()> {
  git(repo, &["config", "user.name", "Test User"])?;
  git(repo, &["config", "user.email", "test@example.com"])?;
  Ok(())
}
