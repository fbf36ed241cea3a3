//! The release-decision engine
//!
//! Stages, in pipeline order:
//!
//! - **distribution**: discover checkouts under the source directory
//! - **eligibility**: clean-tree test and unreleased-history test
//! - **approval**: evidence gathering and the operator's go/no-go
//! - **releaser**: drive the external release tool for one distribution
//! - **message**: fold versions and changelogs into the parent commit message
//! - **pipeline**: run state and stage sequencing
//!
//! A distribution only ever reaches the release set after passing the clean
//! check, the unreleased-history check, and (outside dry-run) explicit
//! operator approval.

pub mod approval;
pub mod distribution;
pub mod eligibility;
pub mod message;
pub mod pipeline;
pub mod releaser;

pub use distribution::{Distribution, scan};
pub use pipeline::FullRelease;
