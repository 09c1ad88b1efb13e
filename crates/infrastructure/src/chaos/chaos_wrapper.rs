//! Call wrapper that subjects an operation to faults before it runs.

use std::fmt;
use std::sync::Arc;

use application::FaultInjectorPort;
use domain::{FaultError, FaultKind, FaultSpec};

use super::FaultInjector;

/// Probability used by [`ChaosWrapper::monkey`]
pub const MONKEY_PROBABILITY: f64 = 0.1;
/// Latency used by [`ChaosWrapper::monkey`]
pub const MONKEY_DURATION_MS: u64 = 500;
/// Error code used by [`ChaosWrapper::monkey`]
pub const MONKEY_ERROR_CODE: i64 = 500;
/// Message used by [`ChaosWrapper::monkey`]
pub const MONKEY_MESSAGE: &str = "Chaos monkey error";

/// Operation wrapper bound to a fixed list of fault specs
///
/// Every call injects each spec in order; the first simulated failure is
/// returned in place of the wrapped operation's result.
///
/// ```ignore
/// let wrapper = ChaosWrapper::new(vec![
///     FaultSpec::latency(200).with_probability(0.5),
///     FaultSpec::error(503).with_probability(0.1),
/// ]);
/// let context = wrapper.call(|| fetch_context(&query))?;
/// ```
#[derive(Clone)]
pub struct ChaosWrapper {
    injector: Arc<dyn FaultInjectorPort>,
    specs: Vec<FaultSpec>,
}

impl fmt::Debug for ChaosWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaosWrapper")
            .field("specs", &self.specs)
            .finish_non_exhaustive()
    }
}

impl ChaosWrapper {
    /// Wrap with the given specs using the default injector
    pub fn new(specs: Vec<FaultSpec>) -> Self {
        Self::with_injector(Arc::new(FaultInjector::new()), specs)
    }

    /// Wrap with the given specs and injector
    pub fn with_injector(injector: Arc<dyn FaultInjectorPort>, specs: Vec<FaultSpec>) -> Self {
        Self { injector, specs }
    }

    /// Wrap with a single spec
    pub fn single(spec: FaultSpec) -> Self {
        Self::new(vec![spec])
    }

    /// Low-probability fault of `kind` with monkey defaults
    ///
    /// Probability 0.1, 500 ms latency, error code 500, message
    /// `"Chaos monkey error"`. Adjust with [`ChaosWrapper::specs_mut`].
    pub fn monkey(kind: FaultKind) -> Self {
        let mut spec = FaultSpec::new(kind)
            .with_probability(MONKEY_PROBABILITY)
            .with_message(MONKEY_MESSAGE);
        spec.duration_ms = Some(MONKEY_DURATION_MS);
        spec.error_code = Some(MONKEY_ERROR_CODE);
        Self::single(spec)
    }

    /// Bound specs, in injection order
    pub fn specs(&self) -> &[FaultSpec] {
        &self.specs
    }

    /// Mutable access to the bound specs
    pub fn specs_mut(&mut self) -> &mut Vec<FaultSpec> {
        &mut self.specs
    }

    /// Inject every bound spec, stopping at the first failure
    ///
    /// Any spec with a probability outside `[0.0, 1.0]` is reported before
    /// anything is injected, whichever injector is in use.
    pub fn inject_all(&self) -> Result<(), FaultError> {
        if let Some(spec) = self.specs.iter().find(|s| !s.has_valid_probability()) {
            return Err(FaultError::invalid_probability(spec.probability));
        }
        self.specs
            .iter()
            .try_for_each(|spec| self.injector.inject(spec))
    }

    /// Run `f` after injection, forwarding its return value unchanged
    ///
    /// `f` is not called when an injected fault fails.
    pub fn call<T, F>(&self, f: F) -> Result<T, FaultError>
    where
        F: FnOnce() -> T,
    {
        self.inject_all()?;
        Ok(f())
    }

    /// Like [`call`](Self::call) for fallible operations whose error type
    /// can absorb a fault
    pub fn try_call<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<FaultError>,
    {
        self.inject_all()?;
        f()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::{Duration, Instant};

    use domain::InjectedError;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum FetchError {
        Chaos(String),
        Upstream,
    }

    impl From<FaultError> for FetchError {
        fn from(err: FaultError) -> Self {
            Self::Chaos(err.to_string())
        }
    }

    #[test]
    fn forwards_value_when_no_fault_fires() {
        let wrapper = ChaosWrapper::single(FaultSpec::error(500).with_probability(0.0));
        assert_eq!(wrapper.call(|| 42).unwrap(), 42);
    }

    #[test]
    fn failure_skips_wrapped_call() {
        let called = Cell::new(false);
        let wrapper = ChaosWrapper::single(FaultSpec::new(FaultKind::Timeout));

        let result = wrapper.call(|| called.set(true));

        assert!(!called.get());
        assert_eq!(result, Err(FaultError::Injected(InjectedError::Timeout)));
    }

    #[test]
    fn specs_apply_in_order() {
        let wrapper = ChaosWrapper::new(vec![
            FaultSpec::latency(30),
            FaultSpec::error(503).with_message("first"),
            FaultSpec::error(504).with_message("second"),
        ]);

        let start = Instant::now();
        let err = wrapper.call(|| ()).unwrap_err();

        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(err.to_string(), "[503] first");
    }

    #[test]
    fn latency_only_still_runs_operation() {
        let wrapper = ChaosWrapper::single(FaultSpec::latency(5));
        assert_eq!(wrapper.call(|| "done").unwrap(), "done");
    }

    #[test]
    fn try_call_converts_fault_into_caller_error() {
        let wrapper = ChaosWrapper::single(FaultSpec::error(502).with_message("bad gateway"));
        let result: Result<(), FetchError> = wrapper.try_call(|| Ok(()));
        assert_eq!(result, Err(FetchError::Chaos("[502] bad gateway".to_string())));
    }

    #[test]
    fn try_call_forwards_operation_error() {
        let wrapper = ChaosWrapper::new(Vec::new());
        let result: Result<(), FetchError> = wrapper.try_call(|| Err(FetchError::Upstream));
        assert_eq!(result, Err(FetchError::Upstream));
    }

    #[test]
    fn monkey_defaults() {
        let wrapper = ChaosWrapper::monkey(FaultKind::Latency);
        let spec = &wrapper.specs()[0];

        assert_eq!(spec.kind, FaultKind::Latency);
        assert!((spec.probability - MONKEY_PROBABILITY).abs() < f64::EPSILON);
        assert_eq!(spec.duration_ms, Some(500));
        assert_eq!(spec.error_code, Some(500));
        assert_eq!(spec.error_message.as_deref(), Some("Chaos monkey error"));
    }

    #[test]
    fn monkey_at_full_probability_raises_monkey_error() {
        let mut wrapper = ChaosWrapper::monkey(FaultKind::Error);
        wrapper.specs_mut()[0].probability = 1.0;

        let err = wrapper.call(|| ()).unwrap_err();
        assert_eq!(err.to_string(), "[500] Chaos monkey error");
    }

    #[test]
    fn out_of_range_probability_skips_call() {
        let called = Cell::new(false);
        let wrapper = ChaosWrapper::single(FaultSpec::error(500).with_probability(-3.0));

        let err = wrapper.call(|| called.set(true)).unwrap_err();

        assert!(!called.get());
        assert!(err.is_misconfigured());
        assert!(err.to_string().contains("probability"));
    }

    #[test]
    fn out_of_range_probability_is_checked_before_any_injection() {
        let wrapper = ChaosWrapper::new(vec![
            FaultSpec::latency(200),
            FaultSpec::new(FaultKind::Timeout).with_probability(1.5),
        ]);

        let start = Instant::now();
        let result: Result<(), FetchError> = wrapper.try_call(|| Ok(()));

        assert!(start.elapsed() < Duration::from_millis(200));
        assert!(matches!(result, Err(FetchError::Chaos(msg)) if msg.contains("probability")));
    }

    #[test]
    fn uses_supplied_injector() {
        let wrapper = ChaosWrapper::with_injector(
            Arc::new(FaultInjector::disabled()),
            vec![FaultSpec::new(FaultKind::Timeout)],
        );
        assert!(wrapper.call(|| ()).is_ok());
    }
}
