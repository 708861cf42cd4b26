//! Bounded exponential backoff for whole-batch failures.

use std::time::Duration;

use gcm_core::{ErrorKind, Response};

/// Default delay before the first retry.
pub const BACKOFF_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Upper bound on any single retry delay.
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_millis(1_024_000);

/// When and how often a wire message is re-sent.
///
/// Only responses built locally with a retryable kind (no answer, or a
/// non-200 other than 401) are retried. Per-recipient errors inside a real
/// gateway answer are left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Total attempts per wire message, including the first.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Policy with default delays and the given attempt budget.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Delay before retry number `retry` (0-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Whether `response` after `attempt` attempts should be sent again.
    pub fn should_retry(&self, response: &Response, attempt: u32) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        matches!(
            response.synthetic_error(),
            Some(ErrorKind::Timeout | ErrorKind::InternalServerError)
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: BACKOFF_INITIAL_DELAY,
            max_delay: MAX_BACKOFF_DELAY,
            max_attempts: 1,
        }
    }
}
