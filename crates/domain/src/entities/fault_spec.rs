//! Fault specification - Declarative description of one injectable fault

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::FaultKind;

const fn default_probability() -> f64 {
    1.0
}

/// Declarative specification for a single injectable fault
///
/// Treated as a value: the scheduler and wrappers keep their own copies and
/// never mutate a spec in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultSpec {
    /// What kind of fault to apply
    #[serde(rename = "fault_type")]
    pub kind: FaultKind,

    /// Chance of firing on each injection attempt (0.0 to 1.0)
    #[serde(default = "default_probability")]
    pub probability: f64,

    /// Delay for latency faults in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Code carried by error faults
    #[serde(default)]
    pub error_code: Option<i64>,

    /// Message override for failing faults
    #[serde(default)]
    pub error_message: Option<String>,

    /// Component labels this fault is attributed to
    #[serde(default)]
    pub affected_components: Vec<String>,
}

impl FaultSpec {
    /// Create a spec of the given kind that always fires
    #[must_use]
    pub const fn new(kind: FaultKind) -> Self {
        Self {
            kind,
            probability: default_probability(),
            duration_ms: None,
            error_code: None,
            error_message: None,
            affected_components: Vec::new(),
        }
    }

    /// Latency fault blocking for `duration_ms`
    #[must_use]
    pub const fn latency(duration_ms: u64) -> Self {
        let mut spec = Self::new(FaultKind::Latency);
        spec.duration_ms = Some(duration_ms);
        spec
    }

    /// Error fault carrying `code`
    #[must_use]
    pub const fn error(code: i64) -> Self {
        let mut spec = Self::new(FaultKind::Error);
        spec.error_code = Some(code);
        spec
    }

    /// Set the firing probability
    #[must_use]
    pub const fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Set the failure message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set the affected components
    #[must_use]
    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_components = components.into_iter().map(Into::into).collect();
        self
    }

    /// Message to use when this spec fires, falling back to the kind default
    #[must_use]
    pub fn message_or_default(&self) -> &str {
        self.error_message
            .as_deref()
            .or_else(|| self.kind.default_message())
            .unwrap_or_default()
    }

    /// Whether `probability` lies within `[0.0, 1.0]`; false for NaN
    #[must_use]
    pub fn has_valid_probability(&self) -> bool {
        (0.0..=1.0).contains(&self.probability)
    }

    /// Check the invariants that make this spec injectable
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.has_valid_probability() {
            return Err(DomainError::validation(format!(
                "probability must be within [0.0, 1.0], got {}",
                self.probability
            )));
        }

        match self.kind {
            FaultKind::Latency if self.duration_ms.is_none() => Err(DomainError::validation(
                "duration_ms is required for latency faults",
            )),
            FaultKind::Error if self.error_code.is_none() => Err(DomainError::validation(
                "error_code is required for error faults",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_range_check() {
        let valid = |p: f64| {
            FaultSpec::new(FaultKind::Timeout)
                .with_probability(p)
                .has_valid_probability()
        };
        assert!(valid(0.0));
        assert!(valid(1.0));
        assert!(!valid(1.5));
        assert!(!valid(-3.0));
        assert!(!valid(f64::NAN));
    }

    #[test]
    fn new_defaults() {
        let spec = FaultSpec::new(FaultKind::Timeout);
        assert!((spec.probability - 1.0).abs() < f64::EPSILON);
        assert!(spec.duration_ms.is_none());
        assert!(spec.error_code.is_none());
        assert!(spec.affected_components.is_empty());
    }

    #[test]
    fn builders_set_fields() {
        let spec = FaultSpec::error(503)
            .with_probability(0.25)
            .with_message("unavailable")
            .with_components(["search", "fetch"]);

        assert_eq!(spec.kind, FaultKind::Error);
        assert_eq!(spec.error_code, Some(503));
        assert!((spec.probability - 0.25).abs() < f64::EPSILON);
        assert_eq!(spec.error_message.as_deref(), Some("unavailable"));
        assert_eq!(spec.affected_components, vec!["search", "fetch"]);
    }

    #[test]
    fn message_falls_back_to_kind_default() {
        assert_eq!(
            FaultSpec::new(FaultKind::PartialFailure).message_or_default(),
            "Partial failure"
        );
        assert_eq!(
            FaultSpec::new(FaultKind::PartialFailure)
                .with_message("shard 3 down")
                .message_or_default(),
            "shard 3 down"
        );
        assert_eq!(FaultSpec::new(FaultKind::Timeout).message_or_default(), "");
    }

    #[test]
    fn validate_accepts_well_formed_specs() {
        assert!(FaultSpec::latency(100).validate().is_ok());
        assert!(FaultSpec::error(500).validate().is_ok());
        assert!(FaultSpec::new(FaultKind::Timeout).validate().is_ok());
        assert!(
            FaultSpec::new(FaultKind::DataCorruption)
                .with_probability(0.0)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn validate_rejects_probability_out_of_range() {
        let err = FaultSpec::new(FaultKind::Timeout)
            .with_probability(1.5)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("probability"));

        assert!(
            FaultSpec::new(FaultKind::Timeout)
                .with_probability(-0.1)
                .validate()
                .is_err()
        );
        assert!(
            FaultSpec::new(FaultKind::Timeout)
                .with_probability(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn validate_requires_duration_for_latency() {
        let err = FaultSpec::new(FaultKind::Latency).validate().unwrap_err();
        assert!(err.to_string().contains("duration_ms"));
    }

    #[test]
    fn validate_requires_code_for_error() {
        let err = FaultSpec::new(FaultKind::Error).validate().unwrap_err();
        assert!(err.to_string().contains("error_code"));
    }

    #[test]
    fn deserializes_from_wire_shape() {
        let spec: FaultSpec = serde_json::from_str(
            r#"{
                "fault_type": "latency",
                "probability": 0.5,
                "duration_ms": 250,
                "affected_components": ["llm_tool_call"]
            }"#,
        )
        .unwrap();

        assert_eq!(spec.kind, FaultKind::Latency);
        assert_eq!(spec.duration_ms, Some(250));
        assert!(spec.error_code.is_none());
        assert_eq!(spec.affected_components, vec!["llm_tool_call"]);
    }

    #[test]
    fn probability_defaults_to_one() {
        let spec: FaultSpec = serde_json::from_str(r#"{"fault_type": "timeout"}"#).unwrap();
        assert!((spec.probability - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_duration_is_rejected_at_parse_time() {
        let result: Result<FaultSpec, _> =
            serde_json::from_str(r#"{"fault_type": "latency", "duration_ms": -5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(FaultSpec::error(418)).unwrap();
        assert_eq!(json["fault_type"], "error");
        assert_eq!(json["error_code"], 418);
        assert!(json.get("kind").is_none());
    }
}
