//! The `convoy release` command

use crate::core::config::ConvoyConfig;
use crate::core::error::{ConvoyResult, ResultExt};
use crate::release::FullRelease;
use crate::ui::ConsolePrompter;
use std::path::PathBuf;

/// Run the release pipeline from the parent project at `path` (or the
/// current directory). `filter` narrows candidates by name fragments;
/// `json` prints the per-distribution report after the run.
pub fn run_release(
  path: Option<PathBuf>,
  dry_run: bool,
  filter: Option<String>,
  json: bool,
) -> ConvoyResult<()> {
  let root = match path {
    Some(path) => path,
    None => std::env::current_dir().context("Failed to get current directory")?,
  };

  let config = ConvoyConfig::load(&root)?;
  let mut prompter = ConsolePrompter;
  let mut run = FullRelease::new(root, config, dry_run, filter.as_deref(), &mut prompter)?;
  run.run()?;

  if json {
    println!("{}", run.report_json()?);
  }
  Ok(())
}
