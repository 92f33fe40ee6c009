//! Bounded retry with exponential backoff and jitter.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::deadline::Deadline;
use crate::error::CollaboratorError;

/// Consecutive failed calls after which a collaborator is abandoned for the
/// rest of a run.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// How often and how patiently a collaborator call is retried.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_schoolbus::collaborator::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.base_backoff(1), Duration::from_millis(50));
/// assert_eq!(policy.base_backoff(2), Duration::from_millis(100));
/// assert_eq!(policy.failure_threshold, 3);
/// assert_eq!(RetryPolicy::none().max_attempts, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_backoff: Duration,
    /// Ceiling for any single delay.
    pub max_backoff: Duration,
    /// Failed calls in a row before the collaborator is skipped for the
    /// rest of the run. See [`CircuitBreaker`](super::CircuitBreaker).
    pub failure_threshold: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_secs(1),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }

    /// Retries immediately, without sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }

    /// Sets the consecutive-failure threshold.
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Un-jittered delay after failed attempt number `attempt` (1-based).
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Delay in `[base / 2, base]`.
    fn jittered_backoff(&self, attempt: u32) -> Duration {
        let base_ms = u64::try_from(self.base_backoff(attempt).as_millis()).unwrap_or(u64::MAX);
        if base_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(base_ms / 2..=base_ms))
    }
}

/// Runs `call` until it succeeds, fails with a non-retriable error, the
/// attempt budget is spent, or `deadline` expires. Returns the last error on
/// failure.
///
/// Backoff sleeps never outlast the time left on `deadline`.
pub fn with_retry<T>(
    policy: &RetryPolicy,
    deadline: &Deadline,
    operation: &str,
    mut call: impl FnMut() -> Result<T, CollaboratorError>,
) -> Result<T, CollaboratorError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match call() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retriable() && attempt < attempts && !deadline.is_expired() => {
                let mut delay = policy.jittered_backoff(attempt);
                if let Some(left) = deadline.remaining() {
                    delay = delay.min(left);
                }
                debug!(operation, attempt, ?delay, %err, "collaborator call failed, retrying");
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(300),
            failure_threshold: 1,
        };
        assert_eq!(policy.base_backoff(1), Duration::from_millis(100));
        assert_eq!(policy.base_backoff(2), Duration::from_millis(200));
        assert_eq!(policy.base_backoff(3), Duration::from_millis(300));
        assert_eq!(policy.base_backoff(40), Duration::from_millis(300));
    }

    #[test]
    fn test_jitter_within_bounds() {
        let policy = RetryPolicy::default();
        for _ in 0..20 {
            let d = policy.jittered_backoff(2);
            assert!(d >= Duration::from_millis(50));
            assert!(d <= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_retry_succeeds_after_transient_failures() {
        let mut calls = 0;
        let result = with_retry(&RetryPolicy::immediate(3), &Deadline::unbounded(), "test", || {
            calls += 1;
            if calls < 3 {
                Err(CollaboratorError::Timeout)
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn test_retry_gives_up() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&RetryPolicy::immediate(2), &Deadline::unbounded(), "test", || {
            calls += 1;
            Err(CollaboratorError::Unavailable("down".into()))
        });
        assert_eq!(calls, 2);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_retriable_fails_fast() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&RetryPolicy::immediate(5), &Deadline::unbounded(), "test", || {
            calls += 1;
            Err(CollaboratorError::InvalidResponse("garbage".into()))
        });
        assert_eq!(calls, 1);
        assert_eq!(
            result,
            Err(CollaboratorError::InvalidResponse("garbage".into()))
        );
    }

    #[test]
    fn test_none_policy_single_attempt() {
        let mut calls = 0;
        let _: Result<(), _> = with_retry(&RetryPolicy::none(), &Deadline::unbounded(), "test", || {
            calls += 1;
            Err(CollaboratorError::Timeout)
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_expired_deadline_stops_retrying() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(
            &RetryPolicy::immediate(5),
            &Deadline::from_millis(Some(0)),
            "test",
            || {
                calls += 1;
                Err(CollaboratorError::Timeout)
            },
        );
        assert_eq!(calls, 1);
        assert_eq!(result, Err(CollaboratorError::Timeout));
    }

    #[test]
    fn test_backoff_sleep_bounded_by_deadline() {
        let policy = RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::from_secs(10),
            max_backoff: Duration::from_secs(10),
            failure_threshold: 1,
        };
        let started = std::time::Instant::now();
        let result: Result<(), _> =
            with_retry(&policy, &Deadline::from_millis(Some(50)), "test", || {
                Err(CollaboratorError::Unavailable("down".into()))
            });
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
