//! Fault injector port
//!
//! Defines how the scheduler applies a single fault. The infrastructure
//! layer provides the randomized, blocking implementation.

use domain::{FaultError, FaultSpec};
#[cfg(test)]
use mockall::automock;

/// Port for applying one fault specification
///
/// Implementations hold no per-call mutable state and may be shared across
/// threads without extra synchronization.
#[cfg_attr(test, automock)]
pub trait FaultInjectorPort: Send + Sync {
    /// Roll the spec's probability and, if it fires, apply its effect
    ///
    /// Returns `Ok(())` when the fault did not fire or when its effect is
    /// non-failing (latency). Returns the simulated failure otherwise.
    fn inject(&self, spec: &FaultSpec) -> Result<(), FaultError>;
}
