//! Observation capture for chaos experiments
//!
//! An append-only, thread-safe log of [`ObservationPoint`]s. Every mutation
//! and every snapshot takes the same exclusive lock, so a snapshot always
//! reflects exactly the records committed before it.

use std::fmt;

use chrono::Utc;
use domain::{ObservationDetails, ObservationPoint};
use parking_lot::Mutex;
use serde_json::Value;

/// Build an [`ObservationDetails`] map from key/value pairs
pub fn details<I, K, V>(pairs: I) -> ObservationDetails
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Append-only observation log
#[derive(Debug, Default)]
pub struct ObservationLog {
    points: Mutex<Vec<ObservationPoint>>,
}

impl ObservationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation stamped with the current UTC instant
    ///
    /// The timestamp is taken under the lock and never precedes the previous
    /// point, so append order and timestamp order agree.
    pub fn record(
        &self,
        component: impl Into<String>,
        event: impl Into<String>,
        details: ObservationDetails,
    ) {
        let mut points = self.points.lock();
        let now = Utc::now();
        let timestamp = points
            .last()
            .map_or(now, |last| now.max(last.timestamp));
        points.push(ObservationPoint::new(timestamp, component, event, details));
    }

    /// Record an observation with no details
    pub fn record_event(&self, component: impl Into<String>, event: impl Into<String>) {
        self.record(component, event, ObservationDetails::new());
    }

    /// Independent copy of everything recorded so far
    pub fn snapshot(&self) -> Vec<ObservationPoint> {
        self.points.lock().clone()
    }

    /// Discard all recorded observations
    pub fn clear(&self) {
        self.points.lock().clear();
    }

    /// Number of recorded observations
    pub fn len(&self) -> usize {
        self.points.lock().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.points.lock().is_empty()
    }

    /// Open a scope that records `<prefix>start` now and `<prefix>end` or
    /// `<prefix>error` when it closes
    ///
    /// ```ignore
    /// let scope = log.scope("database", "query");
    /// match run_query() {
    ///     Ok(rows) => { drop(scope); Ok(rows) },
    ///     Err(e) => { scope.fail("QueryError", &e.to_string()); Err(e) },
    /// }
    /// ```
    pub fn scope(&self, component: &str, event_prefix: &str) -> ObservationScope<'_> {
        let prefix = if event_prefix.is_empty() {
            String::new()
        } else {
            format!("{event_prefix}_")
        };
        self.record_event(component, format!("{prefix}start"));

        ObservationScope {
            log: self,
            component: component.to_string(),
            prefix,
            closed: false,
        }
    }

    /// Run `f` inside a scope
    ///
    /// An `Err` is recorded as `<prefix>error` and handed back to the caller
    /// untouched.
    pub fn scoped<T, E, F>(&self, component: &str, event_prefix: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        let scope = self.scope(component, event_prefix);
        match f() {
            Ok(value) => {
                drop(scope);
                Ok(value)
            },
            Err(err) => {
                scope.fail(short_type_name::<E>(), &err.to_string());
                Err(err)
            },
        }
    }
}

/// Guard returned by [`ObservationLog::scope`]
///
/// Dropping it records `<prefix>end`, or `<prefix>error` when the thread is
/// unwinding from a panic.
#[derive(Debug)]
#[must_use = "dropping the scope immediately records the end event"]
pub struct ObservationScope<'a> {
    log: &'a ObservationLog,
    component: String,
    prefix: String,
    closed: bool,
}

impl ObservationScope<'_> {
    /// Close the scope as failed, recording `<prefix>error`
    pub fn fail(mut self, exception_type: &str, message: &str) {
        self.record_error(exception_type, message);
        self.closed = true;
    }

    fn record_error(&self, exception_type: &str, message: &str) {
        self.log.record(
            self.component.as_str(),
            format!("{}error", self.prefix),
            details([("exception_type", exception_type), ("message", message)]),
        );
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if std::thread::panicking() {
            self.record_error("panic", "scope exited by panic");
        } else {
            self.log
                .record_event(self.component.as_str(), format!("{}end", self.prefix));
        }
    }
}

/// Last path segment of a type name, without generic arguments
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
