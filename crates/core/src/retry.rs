//! Retry logic with exponential backoff
//!
//! A picoFace that was just plugged in (or reset) takes a moment to
//! re-enumerate, so opening its port is retried a few times.
//!
//! # Example
//!
//! ```rust,no_run
//! use picoface_core::retry::{retry, RetryConfig};
//!
//! let result = retry(&RetryConfig::default(), |_| true, || {
//!     Ok::<_, std::io::Error>("opened")
//! });
//! ```

use std::thread;
use std::time::{Duration, Instant};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Default backoff with a given attempt budget
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Create a config with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Calculate delay before a given attempt (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        Duration::from_secs_f64(base_delay.min(self.max_delay.as_secs_f64()))
    }
}

/// Retry result with attempt information
#[derive(Debug)]
pub struct RetryResult<T> {
    /// The successful result
    pub value: T,
    /// Number of attempts made
    pub attempts: u32,
    /// Total time spent retrying
    pub total_duration: Duration,
}

/// Execute a function with retry logic
///
/// `should_retry` decides whether an error is transient. Permanent errors
/// are returned straight away.
pub fn retry<F, T, E, P>(
    config: &RetryConfig,
    mut should_retry: P,
    mut f: F,
) -> std::result::Result<RetryResult<T>, E>
where
    F: FnMut() -> std::result::Result<T, E>,
    P: FnMut(&E) -> bool,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            thread::sleep(config.delay_for_attempt(attempt));
        }

        match f() {
            Ok(value) => {
                return Ok(RetryResult {
                    value,
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                });
            }
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts || !should_retry(&e) {
                    return Err(e);
                }
                tracing::debug!(attempt, error = %e, "Attempt failed, retrying");
            }
        }
    }
}
