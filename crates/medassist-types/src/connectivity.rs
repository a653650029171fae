//! Connectivity indicator for the agent service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Last known liveness of the agent service.
///
/// Starts as `Unknown` and moves between `Up` and `Down` once the first
/// probe resolves. It never returns to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    #[default]
    Unknown,
    Up,
    Down,
}

impl ConnectivityState {
    /// State after a probe resolves with the given outcome.
    pub fn after_probe(healthy: bool) -> Self {
        if healthy {
            ConnectivityState::Up
        } else {
            ConnectivityState::Down
        }
    }

    /// Short human label for status indicators.
    pub fn label(self) -> &'static str {
        match self {
            ConnectivityState::Unknown => "Checking agent...",
            ConnectivityState::Up => "Agent online",
            ConnectivityState::Down => "Agent offline",
        }
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityState::Unknown => write!(f, "unknown"),
            ConnectivityState::Up => write!(f, "up"),
            ConnectivityState::Down => write!(f, "down"),
        }
    }
}
