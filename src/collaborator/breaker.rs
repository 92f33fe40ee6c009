//! Per-run circuit breaker for collaborator calls.

use tracing::warn;

use super::{with_retry, RetryPolicy};
use crate::deadline::Deadline;
use crate::error::CollaboratorError;

/// Stops calling a collaborator once it has failed `threshold` times in a
/// row, so an outage costs a few retries instead of one per stop.
///
/// A breaker lives for one run. A success resets the count; once open it
/// stays open and every call returns [`CollaboratorError::CircuitOpen`]
/// without touching the service.
///
/// # Examples
///
/// ```
/// use u_schoolbus::collaborator::{CircuitBreaker, RetryPolicy};
/// use u_schoolbus::deadline::Deadline;
/// use u_schoolbus::error::CollaboratorError;
///
/// let policy = RetryPolicy::immediate(1).with_failure_threshold(2);
/// let mut breaker = CircuitBreaker::new(policy.failure_threshold);
/// let mut calls = 0;
/// for _ in 0..5 {
///     let _: Result<(), _> = breaker.call(&policy, &Deadline::unbounded(), "lookup", || {
///         calls += 1;
///         Err(CollaboratorError::Timeout)
///     });
/// }
/// assert_eq!(calls, 2);
/// assert!(breaker.is_open());
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    consecutive_failures: u32,
    threshold: u32,
}

impl CircuitBreaker {
    /// Creates a closed breaker. A threshold of 0 is treated as 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive_failures: 0,
            threshold: threshold.max(1),
        }
    }

    /// Returns `true` once the collaborator has been abandoned.
    pub fn is_open(&self) -> bool {
        self.consecutive_failures >= self.threshold
    }

    /// Counts a failed call.
    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Resets the failure count.
    pub fn record_success(&mut self) {
        if !self.is_open() {
            self.consecutive_failures = 0;
        }
    }

    /// Runs `call` under `policy` unless the breaker is open.
    pub fn call<T>(
        &mut self,
        policy: &RetryPolicy,
        deadline: &Deadline,
        operation: &str,
        call: impl FnMut() -> Result<T, CollaboratorError>,
    ) -> Result<T, CollaboratorError> {
        if self.is_open() {
            return Err(CollaboratorError::CircuitOpen);
        }
        match with_retry(policy, deadline, operation, call) {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(err) => {
                self.record_failure();
                if self.is_open() {
                    warn!(
                        operation,
                        failures = self.consecutive_failures,
                        "collaborator keeps failing, using geometric fallback for the rest of the run"
                    );
                }
                Err(err)
            }
        }
    }
}
