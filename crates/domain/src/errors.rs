//! Domain-level errors
//!
//! Three families live here:
//! - [`DomainError`]: invalid definitions and unknown entities
//! - [`InjectedError`]: the simulated failures a fired fault produces
//! - [`FaultError`]: what a single injection call can return

use thiserror::Error;

use crate::value_objects::FaultKind;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

/// A simulated failure produced by a fired fault
///
/// Callers that care about the broad category rather than the exact
/// variant use the capability queries (`is_timeout`, `is_runtime_failure`,
/// `is_validation_failure`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectedError {
    /// Application error carrying a numeric code
    #[error("[{code}] {message}")]
    Error { code: i64, message: String },

    /// Simulated hung operation
    #[error("Simulated timeout injected by chaos framework.")]
    Timeout,

    /// Partial service degradation
    #[error("[partial_failure] {0}")]
    PartialFailure(String),

    /// Resource pool exhausted
    #[error("[resource_exhaustion] {0}")]
    ResourceExhausted(String),

    /// Corrupt data returned
    #[error("[data_corruption] {0}")]
    DataCorruption(String),
}

impl InjectedError {
    /// The fault kind that produced this failure
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        match self {
            Self::Error { .. } => FaultKind::Error,
            Self::Timeout => FaultKind::Timeout,
            Self::PartialFailure(_) => FaultKind::PartialFailure,
            Self::ResourceExhausted(_) => FaultKind::ResourceExhaustion,
            Self::DataCorruption(_) => FaultKind::DataCorruption,
        }
    }

    /// Name of the failure class, recorded as `exception_type` in observations
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Error { .. } => "ChaosError",
            Self::Timeout => "ChaosTimeoutError",
            Self::PartialFailure(_) => "RuntimeError",
            Self::ResourceExhausted(_) => "ResourceExhaustedError",
            Self::DataCorruption(_) => "DataCorruptionError",
        }
    }

    /// Numeric code, present only for [`InjectedError::Error`]
    #[must_use]
    pub const fn error_code(&self) -> Option<i64> {
        match self {
            Self::Error { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Timeout-class failure
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Generic runtime-class failure
    #[must_use]
    pub const fn is_runtime_failure(&self) -> bool {
        matches!(
            self,
            Self::Error { .. } | Self::PartialFailure(_) | Self::ResourceExhausted(_)
        )
    }

    /// Validation-class failure (bad data rather than a bad service)
    #[must_use]
    pub const fn is_validation_failure(&self) -> bool {
        matches!(self, Self::DataCorruption(_))
    }
}

/// Outcome of a single injection call that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultError {
    /// The spec is missing a field its kind requires or has an out-of-range probability
    #[error("Invalid fault configuration: {0}")]
    Misconfigured(String),

    /// The fault fired and produced a simulated failure
    #[error(transparent)]
    Injected(#[from] InjectedError),
}

impl FaultError {
    /// Probability outside `[0.0, 1.0]`
    #[must_use]
    pub fn invalid_probability(probability: f64) -> Self {
        Self::Misconfigured(format!(
            "probability must be within [0.0, 1.0], got {probability}"
        ))
    }

    /// The simulated failure, if this is one
    #[must_use]
    pub const fn as_injected(&self) -> Option<&InjectedError> {
        match self {
            Self::Injected(err) => Some(err),
            Self::Misconfigured(_) => None,
        }
    }

    /// Whether this error is a configuration problem rather than a simulated failure
    #[must_use]
    pub const fn is_misconfigured(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }

    /// Name of the failure class, recorded as `exception_type` in observations
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Misconfigured(_) => "ConfigurationError",
            Self::Injected(err) => err.type_name(),
        }
    }
}
