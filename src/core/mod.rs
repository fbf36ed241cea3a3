//! Core building blocks for convoy
//!
//! - **config**: convoy.toml parsing with defaults for every knob
//! - **error**: unified error type with exit codes and help messages
//! - **pins**: the parent project's pin file (sources + pinned versions)
//! - **history**: administrative-commit filtering for human-facing history
//! - **changelog**: read-only extraction of the unreleased changelog block
//! - **vcs**: git operations over the system git binary

pub mod changelog;
pub mod config;
pub mod error;
pub mod history;
pub mod pins;
pub mod vcs;
