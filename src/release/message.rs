//! Aggregate commit message for the parent project
//!
//! After the individual releases, the parent project gets exactly one commit
//! updating the pin file. Its message lists every released distribution with
//! its new version, then every changelog, both in lexicographic name order so
//! the same release set always produces the same message.

use std::collections::BTreeMap;

/// Build the parent commit message from the run's version and changelog maps.
///
/// Pure and deterministic: input order is irrelevant, output order is
/// alphabetical by distribution name.
pub fn build_commit_message(
  versions: &BTreeMap<String, String>,
  changelogs: &BTreeMap<String, String>,
) -> String {
  let mut msg = vec!["New releases:".to_string(), String::new()];
  let mut changes = vec![String::new(), "Changelogs:".to_string(), String::new()];

  for (name, version) in versions {
    msg.push(format!("{} {}", name, version));

    changes.push(name.clone());
    changes.push("-".repeat(name.len()));
    changes.push(changelogs.get(name).cloned().unwrap_or_default());
    changes.push(String::new());
  }

  msg.extend(changes);
  msg.join("\n")
}
