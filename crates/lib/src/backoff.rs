//! # Backoff Controller
//!
//! A generic retry wrapper with exponentially growing, capped delays. Any
//! operation classified as retryable can be run through [`Backoff::retry`];
//! connection acquisition is the main consumer. Exhausting the attempt
//! budget is an error carrying the last observed failure, never a silent
//! empty result.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Retry policy: the delay before attempt `n+1` is
/// `min(start_sleep * factor^(n-1), border_sleep)`.
#[derive(Debug, Clone)]
pub struct Backoff {
    pub start_sleep: Duration,
    pub factor: f64,
    pub border_sleep: Duration,
    pub max_iter: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            start_sleep: Duration::from_millis(100),
            factor: 2.0,
            border_sleep: Duration::from_secs(10),
            max_iter: 10,
        }
    }
}

/// Terminal outcome of a retried operation.
#[derive(Debug, Error)]
pub enum BackoffError<E> {
    /// Every attempt failed; carries the last observed error.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
    /// The operation failed with an error outside the retryable set.
    #[error("{0}")]
    Fatal(E),
}

impl Backoff {
    /// The delay slept after the `attempt`-th failure (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = self.start_sleep.as_secs_f64() * self.factor.powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(exp.min(self.border_sleep.as_secs_f64()))
    }

    /// Retries `op` on any error, up to `max_iter` attempts.
    pub async fn retry<T, E, F, Fut>(&self, op: F) -> Result<T, BackoffError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.retry_if(op, |_| true).await
    }

    /// Retries `op` while `is_retryable` accepts the error; any other error
    /// propagates immediately as [`BackoffError::Fatal`].
    pub async fn retry_if<T, E, F, Fut, P>(
        &self,
        mut op: F,
        is_retryable: P,
    ) -> Result<T, BackoffError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let attempts = self.max_iter.max(1);
        let mut last = None;
        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if is_retryable(&err) => {
                    let delay = self.delay(attempt);
                    warn!(
                        attempt,
                        max_iter = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retryable failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    last = Some(err);
                }
                Err(err) => return Err(BackoffError::Fatal(err)),
            }
        }
        // `last` is always set here: the loop runs at least once and only
        // exits without returning after a retryable failure.
        match last {
            Some(last) => Err(BackoffError::Exhausted { attempts, last }),
            None => unreachable!("retry loop exited without recording a failure"),
        }
    }
}
