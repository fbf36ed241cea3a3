//! The parent project's pin file
//!
//! `pins.toml` maps each distribution name to the location of its canonical
//! repository and to its currently pinned version:
//!
//! ```toml
//! [sources.my-distribution]
//! protocol = "git"
//! url = "git@example.org:team/my-distribution.git"
//! pushurl = "git@example.org:team/my-distribution.git"  # optional
//! branch = "master"
//!
//! [versions]
//! my-distribution = "1.2.3"
//! ```
//!
//! The file is read once near the start of a run, versions are updated in
//! memory as distributions are released, and the whole thing is flushed once
//! at the end. Editing goes through `toml_edit` so unrelated content and
//! formatting survive a `set_version` byte-for-byte.

use crate::core::error::{ConfigError, ConvoyError, ConvoyResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// Where a distribution's canonical repository lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
  pub protocol: String,
  pub url: String,
  pub pushurl: Option<String>,
  pub branch: String,
}

/// Handle on the pin file, kept in memory for the duration of a run
#[derive(Debug)]
pub struct PinFile {
  path: PathBuf,
  doc: DocumentMut,
}

impl PinFile {
  /// Load the pin file. Missing file is fatal: without it there is nothing
  /// to coordinate.
  pub fn load(path: &Path) -> ConvoyResult<Self> {
    if !path.exists() {
      return Err(ConvoyError::Config(ConfigError::PinFileNotFound {
        path: path.to_path_buf(),
      }));
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read pin file {}", path.display()))?;
    let doc: DocumentMut = content
      .parse()
      .with_context(|| format!("Failed to parse pin file {}", path.display()))?;

    Ok(Self {
      path: path.to_path_buf(),
      doc,
    })
  }

  /// Resolve the declared source for a distribution, if any.
  ///
  /// Entries missing a `url` are treated as undeclared; `protocol` defaults
  /// to "git" and `branch` to "master".
  pub fn source(&self, name: &str) -> Option<SourceRef> {
    let table = self.doc.get("sources")?.get(name)?;
    let url = table.get("url")?.as_str()?.to_string();

    let protocol = table
      .get("protocol")
      .and_then(|v| v.as_str())
      .unwrap_or("git")
      .to_string();
    let pushurl = table.get("pushurl").and_then(|v| v.as_str()).map(String::from);
    let branch = table
      .get("branch")
      .and_then(|v| v.as_str())
      .unwrap_or("master")
      .to_string();

    Some(SourceRef {
      protocol,
      url,
      pushurl,
      branch,
    })
  }

  /// Currently pinned version for a distribution, if any
  pub fn version(&self, name: &str) -> Option<String> {
    self
      .doc
      .get("versions")
      .and_then(|v| v.get(name))
      .and_then(|v| v.as_str())
      .map(String::from)
  }

  /// Record a newly released version for a distribution
  pub fn set_version(&mut self, name: &str, version: &str) {
    self.doc["versions"][name] = toml_edit::value(version);
  }

  /// Flush the (possibly updated) pin file back to disk
  pub fn save(&self) -> ConvoyResult<()> {
    fs::write(&self.path, self.doc.to_string())
      .with_context(|| format!("Failed to write pin file {}", self.path.display()))?;
    Ok(())
  }

  /// Path the pin file was loaded from
  pub fn path(&self) -> &Path {
    &self.path
  }
}
