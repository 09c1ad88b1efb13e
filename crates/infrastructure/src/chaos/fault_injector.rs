//! Fault injector for chaos engineering.
//!
//! Applies a single [`FaultSpec`]: one random draw against its probability,
//! then either a blocking delay or a simulated failure.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use application::FaultInjectorPort;
use domain::{FaultError, FaultKind, FaultSpec, InjectedError};
use rand::Rng;
use tracing::{debug, warn};

/// Configuration for the fault injector
#[derive(Debug, Clone)]
pub struct FaultInjectorConfig {
    /// Whether fault injection is enabled
    pub enabled: bool,
}

impl Default for FaultInjectorConfig {
    fn default() -> Self {
        Self::enabled()
    }
}

impl FaultInjectorConfig {
    /// Create a new config with fault injection enabled
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Create a new config with fault injection disabled
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Stateless fault injector
///
/// Safe to share between threads; each call draws from the thread-local RNG.
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    config: FaultInjectorConfig,
}

impl FaultInjector {
    /// Create an enabled fault injector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fault injector with custom configuration
    pub const fn with_config(config: FaultInjectorConfig) -> Self {
        Self { config }
    }

    /// Create a disabled fault injector (no-op)
    pub const fn disabled() -> Self {
        Self::with_config(FaultInjectorConfig::disabled())
    }

    /// Whether injection is enabled
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// One independent draw: fires when a uniform sample in `[0, 1)` is
    /// below `probability`
    pub fn decide(&self, probability: f64) -> bool {
        if !self.config.enabled || probability <= 0.0 {
            return false;
        }
        rand::rng().random::<f64>() < probability
    }

    /// Block the calling thread for `duration_ms` milliseconds
    pub fn apply_latency(&self, duration_ms: u64) {
        thread::sleep(Duration::from_millis(duration_ms));
    }

    /// Application error carrying `code`
    pub fn apply_error(&self, code: i64, message: &str) -> InjectedError {
        InjectedError::Error {
            code,
            message: message.to_string(),
        }
    }

    /// Simulated hung operation
    pub const fn apply_timeout(&self) -> InjectedError {
        InjectedError::Timeout
    }

    /// Partial service degradation
    pub fn apply_partial_failure(&self, message: &str) -> InjectedError {
        InjectedError::PartialFailure(message.to_string())
    }

    /// Resource pool exhausted
    pub fn apply_resource_exhaustion(&self, message: &str) -> InjectedError {
        InjectedError::ResourceExhausted(message.to_string())
    }

    /// Corrupt data returned
    pub fn apply_data_corruption(&self, message: &str) -> InjectedError {
        InjectedError::DataCorruption(message.to_string())
    }

    fn apply(&self, spec: &FaultSpec) -> Result<(), FaultError> {
        let message = spec.message_or_default();
        let failure = match spec.kind {
            FaultKind::Latency => {
                let duration_ms = spec.duration_ms.ok_or_else(|| {
                    FaultError::Misconfigured("duration_ms is required for latency faults".into())
                })?;
                self.apply_latency(duration_ms);
                return Ok(());
            },
            FaultKind::Error => {
                let code = spec.error_code.ok_or_else(|| {
                    FaultError::Misconfigured("error_code is required for error faults".into())
                })?;
                self.apply_error(code, message)
            },
            FaultKind::Timeout => self.apply_timeout(),
            FaultKind::PartialFailure => self.apply_partial_failure(message),
            FaultKind::ResourceExhaustion => self.apply_resource_exhaustion(message),
            FaultKind::DataCorruption => self.apply_data_corruption(message),
        };
        Err(failure.into())
    }
}

impl FaultInjectorPort for FaultInjector {
    fn inject(&self, spec: &FaultSpec) -> Result<(), FaultError> {
        if !spec.has_valid_probability() {
            return Err(FaultError::invalid_probability(spec.probability));
        }
        if !self.decide(spec.probability) {
            return Ok(());
        }

        debug!(fault = %spec.kind, probability = spec.probability, "Fault fired");
        self.apply(spec)
    }
}

/// Inject a fault from async code without blocking the runtime
///
/// The injection runs on tokio's blocking pool, so latency faults park a
/// blocking thread rather than a worker.
pub async fn inject_async(
    injector: Arc<dyn FaultInjectorPort>,
    spec: FaultSpec,
) -> Result<(), FaultError> {
    match tokio::task::spawn_blocking(move || injector.inject(&spec)).await {
        Ok(outcome) => outcome,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => {
            warn!(error = %err, "Injection task cancelled before completion");
            Ok(())
        },
    }
}
