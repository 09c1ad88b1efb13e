//! Property-based tests for the fault model
//!
//! These tests use proptest to verify validation invariants across many random inputs.

use domain::{ExperimentDefinition, FaultKind, FaultSpec, WILDCARD_COMPONENT};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = FaultKind> {
    prop::sample::select(FaultKind::ALL.to_vec())
}

fn complete_spec(kind: FaultKind) -> FaultSpec {
    match kind {
        FaultKind::Latency => FaultSpec::latency(10),
        FaultKind::Error => FaultSpec::error(500),
        other => FaultSpec::new(other),
    }
}

// ============================================================================
// FaultSpec Property Tests
// ============================================================================

mod fault_spec_tests {
    use super::*;

    proptest! {
        #[test]
        fn probability_in_range_accepted(kind in any_kind(), p in 0.0f64..=1.0f64) {
            let spec = complete_spec(kind).with_probability(p);
            prop_assert!(spec.validate().is_ok());
        }

        #[test]
        fn probability_out_of_range_rejected(
            kind in any_kind(),
            p in prop_oneof![(-100.0f64..-0.0001f64), (1.0001f64..100.0f64)]
        ) {
            let spec = complete_spec(kind).with_probability(p);
            let err = spec.validate().unwrap_err();
            prop_assert!(err.to_string().contains("probability"));
        }

        #[test]
        fn message_default_only_used_when_absent(kind in any_kind(), msg in "[a-z ]{1,20}") {
            let spec = complete_spec(kind).with_message(msg.clone());
            prop_assert_eq!(spec.message_or_default(), msg.as_str());
        }

        #[test]
        fn json_preserves_validity(kind in any_kind(), p in 0.0f64..=1.0f64) {
            let spec = complete_spec(kind).with_probability(p);
            let json = serde_json::to_string(&spec).unwrap();
            let parsed: FaultSpec = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed.kind, spec.kind);
            prop_assert!(parsed.validate().is_ok());
        }
    }
}

// ============================================================================
// ExperimentDefinition Property Tests
// ============================================================================

mod experiment_definition_tests {
    use super::*;

    proptest! {
        #[test]
        fn components_never_empty(
            affected in prop::collection::vec("[a-z]{1,8}", 0..4),
            targets in prop::collection::vec("[a-z]{1,8}", 0..4)
        ) {
            let def = ExperimentDefinition::new("p").with_targets(targets.clone());
            let fault = FaultSpec::new(FaultKind::Timeout).with_components(affected.clone());
            let components = def.components_for(&fault);

            prop_assert!(!components.is_empty());
            if !affected.is_empty() {
                prop_assert_eq!(components.len(), affected.len());
            } else if !targets.is_empty() {
                prop_assert_eq!(components.len(), targets.len());
            } else {
                prop_assert_eq!(components, vec![WILDCARD_COMPONENT]);
            }
        }

        #[test]
        fn positive_duration_accepted(seconds in 1u64..10_000u64) {
            let def = ExperimentDefinition::new("p").with_duration_seconds(seconds);
            prop_assert!(def.validate().is_ok());
        }
    }
}
