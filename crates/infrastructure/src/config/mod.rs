//! Application configuration
//!
//! Loaded in layers: built-in defaults, then an optional `chaoskit.toml`,
//! then `CHAOSKIT_*` environment variables. Nested keys use a double
//! underscore, e.g. `CHAOSKIT_SCHEDULER__TICK_INTERVAL_MS=250`.

mod scheduler;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use scheduler::SchedulerAppConfig;

use crate::telemetry::TelemetryConfig;

/// Default config file name, resolved relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "chaoskit";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CHAOSKIT";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosConfig {
    /// Scheduler settings
    #[serde(default)]
    pub scheduler: SchedulerAppConfig,

    /// Log output settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ChaosConfig {
    /// Load configuration
    ///
    /// With `config_file` set, that file must exist. Otherwise `chaoskit.toml`
    /// in the working directory is used when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(
            config_file,
            config::Environment::with_prefix(ENV_PREFIX),
        )
    }

    fn load_with_env(
        config_file: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            // Start with defaults
            .set_default(
                "scheduler.tick_interval_ms",
                scheduler::DEFAULT_TICK_INTERVAL_MS,
            )?
            .set_default(
                "telemetry.log_filter",
                crate::telemetry::DEFAULT_LOG_FILTER,
            )?
            .set_default("telemetry.json", false)?
            .add_source(file)
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        debug!(
            tick_interval_ms = loaded.scheduler.tick_interval_ms,
            log_filter = %loaded.telemetry.log_filter,
            "Configuration loaded"
        );
        Ok(loaded)
    }
}
