//! One-shot cancellation signal for a single experiment run

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Binary abort flag that a waiting run can be woken by
#[derive(Debug, Default)]
pub struct AbortSignal {
    aborted: Mutex<bool>,
    wakeup: Condvar,
}

impl AbortSignal {
    /// Create an unsignaled flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every waiter. Idempotent.
    pub fn abort(&self) {
        *self.aborted.lock() = true;
        self.wakeup.notify_all();
    }

    /// Whether `abort` has been called
    pub fn is_aborted(&self) -> bool {
        *self.aborted.lock()
    }

    /// Block for up to `timeout`, returning early if the flag is set
    ///
    /// Returns the flag's value when the wait ends.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut aborted = self.aborted.lock();
        while !*aborted {
            if self.wakeup.wait_until(&mut aborted, deadline).timed_out() {
                break;
            }
        }
        *aborted
    }
}
