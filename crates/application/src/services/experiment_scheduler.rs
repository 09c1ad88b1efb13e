//! Experiment scheduling and execution
//!
//! The scheduler owns a registry of experiment definitions and their latest
//! results. [`ExperimentScheduler::run`] drives a blocking tick loop on the
//! caller's thread; every run gets its own [`ObservationLog`] and
//! [`AbortSignal`], so runs of different experiments on different threads
//! never share per-run state.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use domain::{
    ExperimentDefinition, ExperimentResult, ExperimentStatus, ExperimentSummary, FaultKind,
};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::abort_signal::AbortSignal;
use super::observation_log::{ObservationLog, details};
use crate::error::SchedulerError;
use crate::ports::FaultInjectorPort;

/// Component label for lifecycle observations
pub const SCHEDULER_COMPONENT: &str = "scheduler";

/// Default tick interval between injection passes
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between injection passes; also bounds abort latency
    pub tick_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl SchedulerConfig {
    /// Set the tick interval
    #[must_use]
    pub const fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

/// Shared registries, guarded together by one lock
#[derive(Debug, Default)]
struct Registry {
    experiments: HashMap<String, ExperimentDefinition>,
    results: HashMap<String, Arc<ExperimentResult>>,
    abort_signals: HashMap<String, Arc<AbortSignal>>,
}

/// Clears per-run registry state when a run leaves, including by unwinding
///
/// A run that panics would otherwise leave its `Running` placeholder and
/// abort signal behind; the placeholder is closed out as `Aborted`.
struct RunGuard<'a> {
    registry: &'a RwLock<Registry>,
    experiment_id: &'a str,
    signal: Arc<AbortSignal>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut registry = self.registry.write();

        if std::thread::panicking() {
            let placeholder = registry
                .results
                .get(self.experiment_id)
                .filter(|r| r.status == ExperimentStatus::Running)
                .map(|r| (**r).clone());
            if let Some(mut result) = placeholder {
                warn!(experiment_id = %self.experiment_id, "Run panicked, marking aborted");
                result.status = ExperimentStatus::Aborted;
                result.end_time = Some(Utc::now().max(result.start_time));
                registry
                    .results
                    .insert(self.experiment_id.to_string(), Arc::new(result));
            }
        }

        if registry
            .abort_signals
            .get(self.experiment_id)
            .is_some_and(|current| Arc::ptr_eq(current, &self.signal))
        {
            registry.abort_signals.remove(self.experiment_id);
        }
    }
}

/// Per-kind counters for one run
#[derive(Debug, Default)]
struct RunCounters {
    fired: BTreeMap<String, u64>,
    errors: BTreeMap<String, u64>,
}

impl RunCounters {
    fn fired(&mut self, kind: FaultKind) {
        *self.fired.entry(kind.as_str().to_string()).or_default() += 1;
    }

    fn failed(&mut self, kind: FaultKind) {
        *self.errors.entry(kind.as_str().to_string()).or_default() += 1;
    }

    fn into_summary(self, elapsed: Duration) -> ExperimentSummary {
        ExperimentSummary {
            total_faults_fired: self.fired.values().sum(),
            faults_by_type: self.fired,
            errors_by_type: self.errors,
            duration_seconds: elapsed.as_secs_f64(),
        }
    }
}

/// Schedule, run, and abort chaos experiments
pub struct ExperimentScheduler {
    injector: Arc<dyn FaultInjectorPort>,
    config: SchedulerConfig,
    registry: RwLock<Registry>,
}

impl std::fmt::Debug for ExperimentScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("ExperimentScheduler")
            .field("tick_interval", &self.config.tick_interval)
            .field("experiment_count", &registry.experiments.len())
            .field("runs_in_flight", &registry.abort_signals.len())
            .finish_non_exhaustive()
    }
}

impl ExperimentScheduler {
    /// Create a scheduler with the default one-second tick
    pub fn new(injector: Arc<dyn FaultInjectorPort>) -> Self {
        Self::with_config(injector, SchedulerConfig::default())
    }

    /// Create a scheduler with custom configuration
    pub fn with_config(injector: Arc<dyn FaultInjectorPort>, mut config: SchedulerConfig) -> Self {
        if config.tick_interval < MIN_TICK_INTERVAL {
            warn!(
                tick_interval = ?config.tick_interval,
                "Tick interval too small, clamping to 1ms"
            );
            config.tick_interval = MIN_TICK_INTERVAL;
        }

        Self {
            injector,
            config,
            registry: RwLock::new(Registry::default()),
        }
    }

    /// The active configuration
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Register an experiment and return its id
    ///
    /// An empty id is replaced by a fresh UUID. Scheduling an id that already
    /// exists replaces the stored definition; its latest result is kept.
    #[instrument(skip(self, experiment), fields(name = %experiment.name))]
    pub fn schedule(&self, experiment: ExperimentDefinition) -> Result<String, SchedulerError> {
        experiment.validate()?;

        let experiment_id = if experiment.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            experiment.id.clone()
        };
        let stored = ExperimentDefinition {
            id: experiment_id.clone(),
            ..experiment
        };

        let replaced = self
            .registry
            .write()
            .experiments
            .insert(experiment_id.clone(), stored)
            .is_some();

        info!(experiment_id = %experiment_id, replaced, "Experiment scheduled");
        Ok(experiment_id)
    }

    /// Execute a scheduled experiment on the calling thread
    ///
    /// Blocks until the experiment's duration elapses or [`abort`] is called
    /// for the same id. Injected failures are recorded and counted; they never
    /// end the run.
    ///
    /// [`abort`]: Self::abort
    #[instrument(skip(self))]
    pub fn run(&self, experiment_id: &str) -> Result<Arc<ExperimentResult>, SchedulerError> {
        let signal = Arc::new(AbortSignal::new());
        let start_time = Utc::now();

        let experiment = {
            let mut registry = self.registry.write();
            let experiment = registry
                .experiments
                .get(experiment_id)
                .cloned()
                .ok_or_else(|| SchedulerError::ExperimentNotFound(experiment_id.to_string()))?;

            registry
                .abort_signals
                .insert(experiment_id.to_string(), Arc::clone(&signal));
            registry.results.insert(
                experiment_id.to_string(),
                Arc::new(ExperimentResult::running(experiment.clone(), start_time)),
            );
            experiment
        };
        let _guard = RunGuard {
            registry: &self.registry,
            experiment_id,
            signal: Arc::clone(&signal),
        };

        let log = ObservationLog::new();
        log.record(
            SCHEDULER_COMPONENT,
            "experiment_started",
            details([
                ("experiment_id", experiment_id),
                ("name", experiment.name.as_str()),
            ]),
        );
        info!(
            name = %experiment.name,
            duration_seconds = experiment.duration_seconds,
            faults = experiment.faults.len(),
            "Experiment started"
        );

        let mut counters = RunCounters::default();
        let started = Instant::now();
        // None when the duration is past what `Instant` can represent; such a
        // run only ends through `abort`.
        let deadline = started.checked_add(experiment.duration());
        if deadline.is_none() {
            warn!(
                duration_seconds = experiment.duration_seconds,
                "Duration out of range, run ends only on abort"
            );
        }

        let aborted = loop {
            if signal.is_aborted() {
                break true;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break false;
            }

            self.inject_pass(&experiment, &log, &mut counters);

            let wait = deadline.map_or(self.config.tick_interval, |d| {
                self.config
                    .tick_interval
                    .min(d.saturating_duration_since(Instant::now()))
            });
            if signal.wait_timeout(wait) {
                break true;
            }
        };

        let elapsed = started.elapsed();
        let end_time = Utc::now().max(start_time);
        let status = if aborted {
            ExperimentStatus::Aborted
        } else {
            ExperimentStatus::Completed
        };

        log.record(
            SCHEDULER_COMPONENT,
            "experiment_ended",
            details([("status", status.as_str())]),
        );

        let summary = counters.into_summary(elapsed);
        info!(
            status = %status,
            total_faults_fired = summary.total_faults_fired,
            total_errors = summary.total_errors(),
            elapsed_secs = summary.duration_seconds,
            "Experiment ended"
        );

        let result = Arc::new(ExperimentResult {
            experiment,
            status,
            start_time,
            end_time: Some(end_time),
            observations: log.snapshot(),
            summary,
        });

        self.registry
            .write()
            .results
            .insert(experiment_id.to_string(), Arc::clone(&result));

        Ok(result)
    }

    /// One pass over every fault and every component it targets
    fn inject_pass(
        &self,
        experiment: &ExperimentDefinition,
        log: &ObservationLog,
        counters: &mut RunCounters,
    ) {
        for fault in &experiment.faults {
            let kind = fault.kind;
            for component in experiment.components_for(fault) {
                match self.injector.inject(fault) {
                    Ok(()) => {
                        log.record(
                            component,
                            format!("{kind}_injected"),
                            details([("probability", fault.probability)]),
                        );
                        counters.fired(kind);
                    },
                    Err(err) => {
                        debug!(component, fault = %kind, error = %err, "Injected fault raised");
                        log.record(
                            component,
                            format!("{kind}_exception"),
                            details([
                                ("exception", err.to_string()),
                                ("exception_type", err.type_name().to_string()),
                            ]),
                        );
                        counters.failed(kind);
                    },
                }
            }
        }
    }

    /// Signal the in-flight run of `experiment_id` to stop at its next check
    ///
    /// Aborting a scheduled experiment with no run in flight is a no-op; the
    /// next run starts with a fresh signal.
    #[instrument(skip(self))]
    pub fn abort(&self, experiment_id: &str) -> Result<(), SchedulerError> {
        let registry = self.registry.read();
        if !registry.experiments.contains_key(experiment_id) {
            return Err(SchedulerError::ExperimentNotFound(
                experiment_id.to_string(),
            ));
        }

        match registry.abort_signals.get(experiment_id) {
            Some(signal) => {
                signal.abort();
                info!("Abort signaled");
            },
            None => debug!("No run in flight, abort ignored"),
        }
        Ok(())
    }

    /// Latest result for an experiment, if it has been run
    pub fn get_result(&self, experiment_id: &str) -> Option<Arc<ExperimentResult>> {
        self.registry.read().results.get(experiment_id).cloned()
    }

    /// Current lifecycle state of an experiment
    ///
    /// `Pending` when scheduled but never run, `None` when unknown.
    pub fn status(&self, experiment_id: &str) -> Option<ExperimentStatus> {
        let registry = self.registry.read();
        registry
            .results
            .get(experiment_id)
            .map(|r| r.status)
            .or_else(|| {
                registry
                    .experiments
                    .contains_key(experiment_id)
                    .then_some(ExperimentStatus::Pending)
            })
    }

    /// Stored definition for an experiment
    pub fn get_experiment(&self, experiment_id: &str) -> Option<ExperimentDefinition> {
        self.registry.read().experiments.get(experiment_id).cloned()
    }

    /// All scheduled experiment ids
    pub fn list_experiments(&self) -> Vec<String> {
        self.registry.read().experiments.keys().cloned().collect()
    }

    /// Number of scheduled experiments
    pub fn experiment_count(&self) -> usize {
        self.registry.read().experiments.len()
    }
}
