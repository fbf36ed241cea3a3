//! Stage sequencing for a full release run
//!
//! `FullRelease` owns the run state: the shrinking candidate list, the
//! anchors found per distribution, and the versions and changelogs collected
//! along the way. Stages run strictly in order and each one narrows the list;
//! a distribution that survives every stage gets released.
//!
//! Dry-run walks the same stages and records the same per-distribution
//! statuses, but skips the approval question and stops before anything is
//! released or written.

use crate::core::config::ConvoyConfig;
use crate::core::error::{ConvoyError, ConvoyResult};
use crate::core::history::HistoryFilter;
use crate::core::pins::PinFile;
use crate::core::vcs::{GitRepo, RefPoint};
use crate::release::approval::{APPROVAL_QUESTION, gather_evidence};
use crate::release::distribution::{Distribution, scan};
use crate::release::eligibility::{check_clean, check_unreleased};
use crate::release::message::build_commit_message;
use crate::release::releaser::DistributionRelease;
use crate::ui::Prompter;
use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What happened to one distribution during a run.
///
/// Fields stay `None` until the stage that decides them runs, so a dry-run
/// report shows exactly how far each distribution got.
#[derive(Debug, Default, Clone, Serialize)]
pub struct DistributionStatus {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub clean: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub needs_release: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_point: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub approved: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

/// State and sequencing for one release run over the parent project
pub struct FullRelease<'a> {
  config: ConvoyConfig,
  root: PathBuf,
  dry_run: bool,
  filter: Vec<String>,
  history_filter: HistoryFilter,
  pins: PinFile,
  prompter: &'a mut dyn Prompter,

  pub distributions: Vec<Distribution>,
  pub last_points: BTreeMap<String, RefPoint>,
  pub changelogs: BTreeMap<String, String>,
  pub versions: BTreeMap<String, String>,
  pub commit_message: String,
  pub report: BTreeMap<String, DistributionStatus>,
}

impl<'a> FullRelease<'a> {
  /// Set up a run. Fails when the pin file is missing; without it there is
  /// nothing to coordinate.
  pub fn new(
    root: PathBuf,
    config: ConvoyConfig,
    dry_run: bool,
    filter: Option<&str>,
    prompter: &'a mut dyn Prompter,
  ) -> ConvoyResult<Self> {
    let pins = PinFile::load(&root.join(&config.pin_file))?;
    let history_filter = HistoryFilter::from_config(&config);

    Ok(Self {
      config,
      root,
      dry_run,
      filter: parse_filter(filter),
      history_filter,
      pins,
      prompter,
      distributions: Vec::new(),
      last_points: BTreeMap::new(),
      changelogs: BTreeMap::new(),
      versions: BTreeMap::new(),
      commit_message: String::new(),
      report: BTreeMap::new(),
    })
  }

  /// Run every stage in order
  pub fn run(&mut self) -> ConvoyResult<()> {
    self.gather_distributions()?;
    self.check_pending_local_changes()?;
    self.check_changes_to_be_released()?;
    self.ask_what_to_release()?;

    if self.dry_run {
      println!();
      println!("Dry run: nothing was released.");
      return Ok(());
    }

    if self.distributions.is_empty() {
      println!();
      println!("Nothing to release.");
      return Ok(());
    }

    self.release_all()?;
    self.update_parent()?;
    Ok(())
  }

  /// Discover checkouts under the source directory and apply the name filter
  fn gather_distributions(&mut self) -> ConvoyResult<()> {
    banner("Gather distributions");

    let found = scan(&self.root.join(&self.config.src_dir))?;
    self.distributions = found
      .into_iter()
      .filter(|dist| dist.matches(&self.filter))
      .collect();

    for dist in &self.distributions {
      self.report.entry(dist.name.clone()).or_default();
    }
    self.print_distributions();
    Ok(())
  }

  /// Drop distributions with uncommitted or unpushed work.
  ///
  /// If any distribution was disqualified the operator is asked whether the
  /// run should go on without it; declining aborts the whole run. Dry-run
  /// reports the outcome but keeps every candidate and never prompts.
  fn check_pending_local_changes(&mut self) -> ConvoyResult<()> {
    banner("Check pending local changes");

    let candidates = self.distributions.clone();
    let mut clean = Vec::new();
    let mut disqualified = false;

    for dist in candidates {
      let repo = dist.repo()?;
      let outcome = check_clean(&repo, &self.config.primary_branch)?;

      if outcome.dirty {
        println!("{} has uncommitted changes", dist.name);
      }
      if outcome.unpushed {
        println!(
          "{} has unpushed commits on {}",
          dist.name, self.config.primary_branch
        );
      }

      self.status_mut(&dist.name).clean = Some(outcome.is_clean());
      if outcome.is_clean() {
        clean.push(dist);
      } else {
        disqualified = true;
      }
    }

    if !self.dry_run {
      if disqualified && !self.prompter.confirm("Do you want to continue?", true)? {
        return Err(ConvoyError::Aborted);
      }
      self.distributions = clean;
    }
    self.print_distributions();
    Ok(())
  }

  /// Drop distributions whose latest tag already sits on the branch tip
  fn check_changes_to_be_released(&mut self) -> ConvoyResult<()> {
    banner("Check changes to be released");

    let candidates = self.distributions.clone();
    let mut need = Vec::new();
    for dist in candidates {
      let repo = dist.repo()?;
      let result = check_unreleased(&repo, &self.config.primary_branch)?;

      let status = self.status_mut(&dist.name);
      status.needs_release = Some(result.is_needed());
      status.last_point = Some(result.point().rev().to_string());
      self.last_points.insert(dist.name.clone(), result.point().clone());

      if result.is_needed() {
        println!("{} has changes since {}", dist.name, result.point().rev());
        need.push(dist);
      } else {
        println!("{} is up to date", dist.name);
      }
    }

    if !self.dry_run {
      self.distributions = need;
    }
    self.print_distributions();
    Ok(())
  }

  /// Show each candidate's evidence and ask for the go/no-go.
  ///
  /// Distributions without a source entry in the pin file are excluded
  /// without comment, as are those whose filtered history is empty. Dry-run
  /// shows the evidence but skips the question.
  fn ask_what_to_release(&mut self) -> ConvoyResult<()> {
    banner("What to release");

    let candidates = self.distributions.clone();
    let mut approved = Vec::new();

    for dist in candidates {
      let Some(source) = self.pins.source(&dist.name) else {
        continue;
      };
      let Some(last) = self.last_points.get(&dist.name).cloned() else {
        continue;
      };

      let Some(evidence) = gather_evidence(&source, &last, &self.history_filter)? else {
        continue;
      };

      banner(&dist.name);
      println!("{}", evidence.render());

      let go = if self.dry_run {
        true
      } else {
        self.prompter.confirm(APPROVAL_QUESTION, false)?
      };

      self.status_mut(&dist.name).approved = Some(go);
      if go {
        self.changelogs.insert(dist.name.clone(), evidence.changelog);
        approved.push(dist);
      }
    }

    self.distributions = approved;
    if !self.dry_run {
      self.print_distributions();
    }
    Ok(())
  }

  /// Release every approved distribution and record its new version
  fn release_all(&mut self) -> ConvoyResult<()> {
    banner("Release!");

    let approved = self.distributions.clone();
    for dist in approved {
      let Some(source) = self.pins.source(&dist.name) else {
        continue;
      };

      let version = DistributionRelease::new(&self.config, &self.root).release(&dist.path, &source)?;
      if semver::Version::parse(&version).is_err() {
        println!("{} tag {} is not a semantic version", dist.name, version);
      }
      println!("{} {} released", dist.name, version);

      self.pins.set_version(&dist.name, &version);
      self.status_mut(&dist.name).version = Some(version.clone());
      self.versions.insert(dist.name.clone(), version);
    }
    Ok(())
  }

  /// Write the updated pin file and push the single aggregate commit
  fn update_parent(&mut self) -> ConvoyResult<()> {
    banner("Update parent project");

    self.commit_message = build_commit_message(&self.versions, &self.changelogs);
    self.pins.save()?;

    let parent = GitRepo::open(&self.root)?;
    parent.commit_paths(&[self.config.pin_file.as_path()], &self.commit_message)?;
    parent.push()?;

    println!(
      "Committed {} release(s) on {}",
      self.versions.len(),
      Local::now().format("%Y-%m-%d")
    );
    Ok(())
  }

  /// Per-distribution run statuses as pretty-printed JSON
  pub fn report_json(&self) -> ConvoyResult<String> {
    Ok(serde_json::to_string_pretty(&self.report)?)
  }

  fn status_mut(&mut self, name: &str) -> &mut DistributionStatus {
    self.report.entry(name.to_string()).or_default()
  }

  fn print_distributions(&self) {
    println!();
    println!("Distributions:");
    for dist in &self.distributions {
      println!("  {}", dist.name);
    }
  }
}

/// Split a comma-separated filter into patterns, dropping empty pieces
fn parse_filter(filter: Option<&str>) -> Vec<String> {
  filter
    .unwrap_or_default()
    .split(',')
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .map(String::from)
    .collect()
}

fn banner(title: &str) {
  println!();
  println!("{}", title);
  println!("{}", "-".repeat(title.len()));
}
