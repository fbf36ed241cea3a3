//! Administrative-commit filtering
//!
//! Release decisions and operator-facing history must only consider commits a
//! human wrote on purpose. Version bumps, changelog touch-ups and release
//! machinery commits are noise; a distribution whose history since the last
//! tag is all noise is not worth releasing.

use crate::core::config::ConvoyConfig;

/// Drops history lines that match any administrative marker.
///
/// The marker list is fixed at construction; there is no global state.
#[derive(Debug, Clone)]
pub struct HistoryFilter {
  markers: Vec<String>,
}

impl HistoryFilter {
  pub fn new(markers: Vec<String>) -> Self {
    Self { markers }
  }

  pub fn from_config(config: &ConvoyConfig) -> Self {
    Self::new(config.ignore_messages.clone())
  }

  /// Keep every line that contains none of the markers, in original order.
  /// No deduplication, no trimming. Pure: filtering twice gives the same
  /// result as filtering once.
  pub fn filter<I, S>(&self, lines: I) -> Vec<String>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    lines
      .into_iter()
      .filter(|line| !self.markers.iter().any(|marker| line.as_ref().contains(marker)))
      .map(|line| line.as_ref().to_string())
      .collect()
  }
}

impl Default for HistoryFilter {
  fn default() -> Self {
    Self::from_config(&ConvoyConfig::default())
  }
}
