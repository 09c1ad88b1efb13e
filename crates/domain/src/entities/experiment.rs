//! Experiment definition - A named, time-bounded collection of faults

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::FaultSpec;
use crate::errors::DomainError;

/// Component label used when neither the fault nor the experiment names one
pub const WILDCARD_COMPONENT: &str = "*";

const fn default_duration_seconds() -> u64 {
    60
}

/// A named collection of faults to be run against target components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDefinition {
    /// Unique identifier; empty means "assign one when scheduled"
    #[serde(rename = "experiment_id", default)]
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Faults applied on every tick, in order
    #[serde(default)]
    pub faults: Vec<FaultSpec>,

    /// How long the tick loop runs
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u64,

    /// Components a fault is attributed to when it names none itself
    #[serde(default)]
    pub target_components: Vec<String>,
}

impl ExperimentDefinition {
    /// Create an empty experiment with the default duration and no id
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: String::new(),
            faults: Vec::new(),
            duration_seconds: default_duration_seconds(),
            target_components: Vec::new(),
        }
    }

    /// Set the identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a fault
    #[must_use]
    pub fn with_fault(mut self, fault: FaultSpec) -> Self {
        self.faults.push(fault);
        self
    }

    /// Set the run duration in seconds
    #[must_use]
    pub const fn with_duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set the target components
    #[must_use]
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_components = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Run duration as a [`Duration`]
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_seconds)
    }

    /// Components a fault is attributed to
    ///
    /// Resolution order: the fault's own components, then the experiment's
    /// targets, then the wildcard. Never empty.
    #[must_use]
    pub fn components_for<'a>(&'a self, fault: &'a FaultSpec) -> Vec<&'a str> {
        if !fault.affected_components.is_empty() {
            fault.affected_components.iter().map(String::as_str).collect()
        } else if !self.target_components.is_empty() {
            self.target_components.iter().map(String::as_str).collect()
        } else {
            vec![WILDCARD_COMPONENT]
        }
    }

    /// Check the definition and every fault it carries
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.duration_seconds == 0 {
            return Err(DomainError::validation(
                "duration_seconds must be greater than 0",
            ));
        }

        for (index, fault) in self.faults.iter().enumerate() {
            fault.validate().map_err(|e| match e {
                DomainError::ValidationError(msg) => {
                    DomainError::validation(format!("faults[{index}]: {msg}"))
                },
                other @ DomainError::NotFound { .. } => other,
            })?;
        }

        Ok(())
    }
}
