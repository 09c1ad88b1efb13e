//! Domain entities - Experiment definitions, faults, observations and results

mod experiment;
mod experiment_result;
mod fault_spec;
mod observation;

pub use experiment::{ExperimentDefinition, WILDCARD_COMPONENT};
pub use experiment_result::{ExperimentResult, ExperimentSummary};
pub use fault_spec::FaultSpec;
pub use observation::{ObservationDetails, ObservationPoint};
