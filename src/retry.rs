//! Bounded retry with exponential backoff.

use std::{fmt::Display, future::Future, time::Duration};

use thiserror::Error;
use tracing::{debug, warn};

/// How often, and how patiently, to retry a failing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (treated as at least 1).
    pub max_attempts: u32,

    /// Wait before the first retry.
    pub initial_backoff: Duration,

    /// Upper bound on any single wait.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once.
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Wait before retry number `retry_index` (zero-based), doubling each time.
    pub fn backoff(&self, retry_index: u32) -> Duration {
        let cap = self.max_backoff.max(self.initial_backoff);
        let factor = 1_u32.checked_shl(retry_index.min(20)).unwrap_or(u32::MAX);

        self.initial_backoff.saturating_mul(factor).min(cap)
    }
}

/// The operation still failed after every allowed attempt.
#[derive(Debug, Error)]
#[error("{label} failed after {attempts} attempt(s): {source}")]
pub struct RetryError<E> {
    /// What was being attempted
    pub label: &'static str,

    /// Attempts made before giving up
    pub attempts: u32,

    /// Error from the final attempt
    #[source]
    pub source: E,
}

/// Run `op` until it succeeds or `policy.max_attempts` is reached.
///
/// # Errors
///
/// Returns a [`RetryError`] wrapping the last failure once attempts are exhausted.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &'static str,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(label, attempt, "succeeded after retrying");
                }

                return Ok(value);
            }
            Err(error) if attempt < max_attempts => {
                let delay = policy.backoff(attempt - 1);

                warn!(label, attempt, max_attempts, ?delay, %error, "attempt failed, retrying");

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(source) => {
                return Err(RetryError {
                    label,
                    attempts: attempt,
                    source,
                });
            }
        }
    }
}
