//! Experiment result - Immutable record of one experiment run

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ExperimentDefinition, ObservationPoint};
use crate::value_objects::ExperimentStatus;

/// Aggregate counters for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Injection calls that returned normally
    pub total_faults_fired: u64,
    /// Normal returns per fault kind
    pub faults_by_type: BTreeMap<String, u64>,
    /// Simulated failures per fault kind
    pub errors_by_type: BTreeMap<String, u64>,
    /// Wall-clock time the run took
    pub duration_seconds: f64,
}

impl ExperimentSummary {
    /// Total simulated failures across all kinds
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.errors_by_type.values().sum()
    }
}

/// Complete record of a chaos experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// The definition that was run
    pub experiment: ExperimentDefinition,
    /// Lifecycle state at the time of the snapshot
    pub status: ExperimentStatus,
    /// When the run began
    pub start_time: DateTime<Utc>,
    /// When the run reached a terminal state
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Everything the run's observation log captured, in append order
    #[serde(default)]
    pub observations: Vec<ObservationPoint>,
    /// Aggregate counters
    #[serde(default)]
    pub summary: ExperimentSummary,
}

impl ExperimentResult {
    /// Placeholder published while a run is in flight
    #[must_use]
    pub fn running(experiment: ExperimentDefinition, start_time: DateTime<Utc>) -> Self {
        Self {
            experiment,
            status: ExperimentStatus::Running,
            start_time,
            end_time: None,
            observations: Vec::new(),
            summary: ExperimentSummary::default(),
        }
    }

    /// Experiment identifier
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment.id
    }

    /// Event labels in append order
    #[must_use]
    pub fn events(&self) -> Vec<&str> {
        self.observations.iter().map(|o| o.event.as_str()).collect()
    }

    /// Whether any observation carries the given event label
    #[must_use]
    pub fn has_event(&self, event: &str) -> bool {
        self.observations.iter().any(|o| o.event == event)
    }

    /// Observations attributed to one component
    #[must_use]
    pub fn observations_for<'a>(
        &'a self,
        component: &'a str,
    ) -> impl Iterator<Item = &'a ObservationPoint> {
        self.observations
            .iter()
            .filter(move |o| o.component == component)
    }
}
