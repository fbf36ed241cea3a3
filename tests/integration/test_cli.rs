//! The installed binary end to end

use crate::helpers::TestParent;
use anyhow::{Context, Result};
use std::process::Command;

fn run_convoy(args: &[&str]) -> Result<std::process::Output> {
  Command::new(env!("CARGO_BIN_EXE_convoy"))
    .args(args)
    .output()
    .context("Failed to run convoy")
}

#[test]
fn test_dry_run_json_report() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  parent.commit_change("alpha", "Preparing release 0.1")?;
  parent.push("alpha")?;
  parent.tag("alpha", "0.1")?;

  let path = parent.path.display().to_string();
  let output = run_convoy(&["release", "--dry-run", "--json", "--path", &path])?;
  assert!(output.status.success());

  let stdout = String::from_utf8_lossy(&output.stdout);
  let json_start = stdout.find("\n{").context("no JSON in output")? + 1;
  let report: serde_json::Value = serde_json::from_str(&stdout[json_start..])?;

  assert_eq!(report["alpha"]["clean"], serde_json::json!(true));
  assert_eq!(report["alpha"]["needs_release"], serde_json::json!(false));
  Ok(())
}

#[test]
fn test_missing_pin_file_exits_with_user_error() -> Result<()> {
  let dir = tempfile::tempdir()?;
  let path = dir.path().display().to_string();

  let output = run_convoy(&["release", "--dry-run", "--path", &path])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Pin file not found"));
  Ok(())
}
