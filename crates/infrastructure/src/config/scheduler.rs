//! Scheduler configuration.

use std::time::Duration;

use application::SchedulerConfig;
use serde::{Deserialize, Serialize};

pub(super) const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Scheduler settings as they appear in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerAppConfig {
    /// Milliseconds between injection passes (default: 1000)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

const fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

impl Default for SchedulerAppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl SchedulerAppConfig {
    /// Convert to the scheduler's runtime configuration
    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::default().with_tick_interval(Duration::from_millis(self.tick_interval_ms))
    }
}
