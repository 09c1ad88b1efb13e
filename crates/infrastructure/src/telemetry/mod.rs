//! Logging setup
//!
//! Installs the global `tracing` subscriber used by the CLI.

mod logging;

pub use logging::{DEFAULT_LOG_FILTER, TelemetryConfig, TelemetryError, init_logging};
