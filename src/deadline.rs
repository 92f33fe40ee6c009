//! Caller-supplied time budget.

use std::time::{Duration, Instant};

/// A wall-clock budget started at construction.
///
/// Checked between greedy iterations; algorithms never stop mid-step.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_schoolbus::deadline::Deadline;
///
/// assert!(!Deadline::unbounded().is_expired());
/// assert!(Deadline::after(Duration::ZERO).is_expired());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            limit: None,
        }
    }

    /// A deadline expiring `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit: Some(limit),
        }
    }

    /// A deadline from an optional millisecond limit.
    pub fn from_millis(limit_ms: Option<u64>) -> Self {
        match limit_ms {
            Some(ms) => Self::after(Duration::from_millis(ms)),
            None => Self::unbounded(),
        }
    }

    /// Returns `true` once the budget is spent.
    pub fn is_expired(&self) -> bool {
        self.limit
            .is_some_and(|limit| self.start.elapsed() >= limit)
    }

    /// Time left before expiry, or `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.start.elapsed()))
    }

    /// Time since the deadline was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}
