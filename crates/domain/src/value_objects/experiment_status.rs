//! Experiment status value object
//!
//! Lifecycle: `Pending -> Running -> {Completed | Aborted}`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a chaos experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    /// Scheduled but not yet run
    #[default]
    Pending,
    /// Tick loop in progress
    Running,
    /// Deadline reached without cancellation
    Completed,
    /// Cancellation observed before the deadline
    Aborted,
}

impl ExperimentStatus {
    /// Check if this status is terminal (no further transitions)
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running) | (Self::Running, Self::Completed | Self::Aborted)
        )
    }

    /// Wire string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
