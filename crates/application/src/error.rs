//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors returned by the experiment scheduler
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Experiment id was never scheduled
    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    /// Definition failed validation
    #[error(transparent)]
    InvalidExperiment(#[from] DomainError),
}

impl SchedulerError {
    /// Check if this error refers to an unknown experiment
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ExperimentNotFound(_))
    }
}
