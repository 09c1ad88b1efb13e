//! Value objects - Immutable objects defined by their attributes

mod experiment_status;
mod fault_kind;

pub use experiment_status::ExperimentStatus;
pub use fault_kind::FaultKind;
