//! Engine configuration (code defaults overridable from the environment).

use std::time::Duration;

use crate::util::retry::RetryPolicy;

/// Tunables for the agent engine.
#[derive(Debug, Clone)]
pub struct DroverConfig {
    /// Attempts per model turn before a stream failure becomes fatal.
    pub max_stream_attempts: u32,
    /// Base delay of the linear stream-retry backoff.
    pub stream_retry_delay: Duration,
}

impl Default for DroverConfig {
    fn default() -> Self {
        Self {
            max_stream_attempts: 5,
            stream_retry_delay: Duration::from_millis(1000),
        }
    }
}

impl DroverConfig {
    /// Defaults, with `DROVER_STREAM_MAX_ATTEMPTS` and
    /// `DROVER_STREAM_RETRY_DELAY_MS` applied when set and parseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(attempts) = env_parse::<u32>("DROVER_STREAM_MAX_ATTEMPTS") {
            config.max_stream_attempts = attempts.max(1);
        }
        if let Some(ms) = env_parse::<u64>("DROVER_STREAM_RETRY_DELAY_MS") {
            config.stream_retry_delay = Duration::from_millis(ms);
        }
        config
    }

    /// The retry policy the response processor runs under.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_stream_attempts,
            initial_delay: self.stream_retry_delay,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}
