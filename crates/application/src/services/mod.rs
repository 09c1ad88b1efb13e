//! Application services
//!
//! Services orchestrate the domain model and ports to run chaos experiments.

mod abort_signal;
mod experiment_scheduler;
mod observation_log;

pub use abort_signal::AbortSignal;
pub use experiment_scheduler::{
    DEFAULT_TICK_INTERVAL, ExperimentScheduler, SCHEDULER_COMPONENT, SchedulerConfig,
};
pub use observation_log::{ObservationLog, ObservationScope, details};
