//! Bounded retry with linear backoff.

use std::future::Future;
use std::time::Duration;

use crate::error::{DroverError, Result};

/// Retry policy configuration.
///
/// The delay before attempt `n + 1` is `initial_delay * n`, so a policy of
/// 3 attempts at 1s sleeps 1s, then 2s, between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base backoff duration, scaled linearly by the attempt index.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Execute an async operation, retrying retryable errors.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.is_retryable() || attempt == attempts {
                        return Err(e);
                    }

                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Retrying after error"
                    );

                    tokio::time::sleep(self.initial_delay * attempt).await;
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DroverError::InvalidState("retry loop exhausted".into())))
    }
}
