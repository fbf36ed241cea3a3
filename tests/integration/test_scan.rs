//! Distribution discovery

use crate::helpers::TestParent;
use anyhow::Result;
use convoy::release::scan;

#[test]
fn test_scan_finds_repositories_in_order() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("beta")?;
  parent.add_distribution("alpha")?;

  let found = scan(&parent.path.join("src"))?;
  let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
  assert_eq!(names, vec!["alpha", "beta"]);
  Ok(())
}

#[test]
fn test_scan_skips_files_and_plain_directories() -> Result<()> {
  let mut parent = TestParent::new()?;
  parent.add_distribution("alpha")?;
  std::fs::write(parent.path.join("src").join("notes.txt"), "not a repo\n")?;
  std::fs::create_dir_all(parent.path.join("src").join("empty-dir"))?;

  let found = scan(&parent.path.join("src"))?;
  let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
  assert_eq!(names, vec!["alpha"]);
  Ok(())
}
