//! CLI commands for convoy
//!
//! - **release**: the full multi-distribution release run
//! - **changelog**: draft changelog entries for one distribution

pub mod changelog;
pub mod release;

pub use changelog::run_changelog;
pub use release::run_release;
