//! Observation point - A timestamped event captured during an experiment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely-typed detail map attached to an observation
pub type ObservationDetails = Map<String, Value>;

/// A single timestamped observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    /// When the observation was recorded
    pub timestamp: DateTime<Utc>,
    /// Component the event is attributed to (e.g. `"llm_tool_call"`)
    pub component: String,
    /// Short event label (e.g. `"latency_injected"`)
    pub event: String,
    /// Free-form structured details
    #[serde(default)]
    pub details: ObservationDetails,
}

impl ObservationPoint {
    /// Create an observation stamped with the given instant
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        component: impl Into<String>,
        event: impl Into<String>,
        details: ObservationDetails,
    ) -> Self {
        Self {
            timestamp,
            component: component.into(),
            event: event.into(),
            details,
        }
    }

    /// Look up a detail value
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}
