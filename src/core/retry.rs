//! Bounded retry with exponential backoff for outbound calls

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Errors that know whether another attempt could succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Retry policy for failed requests
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts made after the first one
    pub max_retries: u32,
    pub backoff_multiplier: f64,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_multiplier: f64, initial_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_multiplier,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0, 1.0, 0)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis((self.initial_backoff.as_millis() as f64 * multiplier) as u64)
    }

    /// Run `attempt` until it succeeds, fails with a non-retryable error, or
    /// the retry budget is spent. The last error is returned.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let mut retries = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    let delay = self.backoff_for_attempt(retries);
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        operation,
                        retries + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Err(e) => {
                    debug!("{} giving up after {} retries", operation, retries);
                    return Err(e);
                }
            }
        }
    }
}
