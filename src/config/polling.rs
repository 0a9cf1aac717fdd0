//! Completion polling budget

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-interval polling budget for derived-column completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between two poll attempts
    pub interval_ms: u64,
    /// Attempts before a wait reports "still processing"
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_attempts: 15,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Worst-case wall clock spent sleeping between attempts.
    pub fn total_budget(&self) -> Duration {
        self.interval() * self.max_attempts.saturating_sub(1)
    }
}
