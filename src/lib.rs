//! Coordinate releases across many pinned distribution checkouts.
//!
//! A "distribution" is one independently versioned git repository checked out
//! under the parent project's source directory. The parent project pins each
//! distribution's source location and released version in a pin file
//! (`pins.toml`). convoy walks those checkouts, decides which ones are worth
//! releasing, lets the operator confirm each candidate against its git
//! history and declared changelog, drives the external release tool, and
//! folds the results back into one commit on the parent project.

pub mod commands;
pub mod core;
pub mod release;
pub mod ui;
