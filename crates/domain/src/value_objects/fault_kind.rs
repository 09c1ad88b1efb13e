//! Fault kind value object
//!
//! The closed set of failure modes the injector knows how to apply.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of an injectable fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Block the caller for a fixed duration
    Latency,
    /// Fail with a numeric error code
    Error,
    /// Fail as if the operation hung
    Timeout,
    /// Fail as a partially degraded service
    PartialFailure,
    /// Fail as if a resource pool ran dry
    ResourceExhaustion,
    /// Fail as if returned data was corrupt
    DataCorruption,
}

impl FaultKind {
    /// All fault kinds in declaration order
    pub const ALL: [Self; 6] = [
        Self::Latency,
        Self::Error,
        Self::Timeout,
        Self::PartialFailure,
        Self::ResourceExhaustion,
        Self::DataCorruption,
    ];

    /// Wire name, also used as the prefix of observation events
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::PartialFailure => "partial_failure",
            Self::ResourceExhaustion => "resource_exhaustion",
            Self::DataCorruption => "data_corruption",
        }
    }

    /// Message used when a spec of this kind carries no `error_message`
    #[must_use]
    pub const fn default_message(&self) -> Option<&'static str> {
        match self {
            Self::Error => Some("Injected error"),
            Self::PartialFailure => Some("Partial failure"),
            Self::ResourceExhaustion => Some("Resource exhausted"),
            Self::DataCorruption => Some("Data corrupted"),
            Self::Latency | Self::Timeout => None,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FaultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid fault type: {s}. Use one of: {}",
                    Self::ALL.map(|k| k.as_str()).join(", ")
                )
            })
    }
}
