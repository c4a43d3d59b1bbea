//! Bounded retry with exponential backoff for collaborator calls.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Retry policy for fetches from upstream collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first try (0 = no retries).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn exponential(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Delay before retry number `attempt` (1-indexed): `base * 2^(attempt-1)`, capped.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let pow = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(pow).min(self.max_delay)
    }

    /// Run `op` until it succeeds or retries are exhausted; returns the last error.
    pub fn run<T, E, F>(&self, what: &str, op: F) -> Result<T, E>
    where
        E: core::fmt::Display,
        F: FnMut() -> Result<T, E>,
    {
        self.run_if(what, op, |_| true)
    }

    /// Like [`run`](Self::run), but only errors accepted by `retryable` are
    /// retried. Any other error is returned immediately.
    pub fn run_if<T, E, F, P>(&self, what: &str, mut op: F, retryable: P) -> Result<T, E>
    where
        E: core::fmt::Display,
        F: FnMut() -> Result<T, E>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < self.max_retries && retryable(&e) => {
                    attempt += 1;
                    let delay = self.delay_for_attempt(attempt);
                    warn!(operation = what, attempt, delay_ms = delay.as_millis() as u64, error = %e, "retrying");
                    thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
