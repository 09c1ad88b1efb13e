//! Infrastructure layer - Adapters for external systems
//!
//! Implements the fault injector port defined in the application layer and
//! provides configuration, logging, and experiment file loading.

pub mod chaos;
pub mod config;
pub mod loader;
pub mod telemetry;

pub use chaos::{ChaosWrapper, FaultInjector, FaultInjectorConfig, inject_async};
pub use config::{ChaosConfig, SchedulerAppConfig};
pub use loader::{LoaderError, load_experiment, load_result, save_result};
pub use telemetry::{TelemetryConfig, TelemetryError, init_logging};
