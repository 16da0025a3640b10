//! Exponential-backoff retry of transient failures

use crate::GenerateError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default number of attempts, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay before the first retry (10 seconds)
pub const DEFAULT_INITIAL_DELAY_SECS: u64 = 10;

/// Default cap on the backoff delay (2 minutes)
pub const DEFAULT_MAX_DELAY_SECS: u64 = 120;

/// Retry policy for generation requests.
///
/// The attempt budget, backoff shape, and the predicate deciding which
/// errors are worth retrying are all parameters rather than hard-coded
/// behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first (minimum 1)
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Factor applied to the delay after each retry
    pub multiplier: f64,

    /// Upper bound on any single delay
    pub max_delay: Duration,

    /// Whether a given error should be retried
    pub retry_on: fn(&GenerateError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_secs(DEFAULT_INITIAL_DELAY_SECS),
            multiplier: 2.0,
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
            retry_on: GenerateError::is_transient,
        }
    }
}

impl RetryPolicy {
    /// Set the total attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the first retry
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set the retry predicate
    pub fn with_retry_on(mut self, retry_on: fn(&GenerateError) -> bool) -> Self {
        self.retry_on = retry_on;
        self
    }
}

/// Run an operation under a retry policy.
///
/// Retryable failures sleep the current backoff delay and try again until
/// the attempt budget runs out, at which point the last error is wrapped in
/// [`GenerateError::RetriesExhausted`]. Non-retryable failures propagate
/// immediately. Every retry is logged so an operator can watch backoff
/// progress live.
pub async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerateError>>,
{
    let budget = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if !(policy.retry_on)(&error) => return Err(error),
            Err(error) if attempt >= budget => {
                return Err(GenerateError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }
            Err(error) => {
                warn!(
                    "attempt {}/{} failed ({}), retrying in {:.1}s",
                    attempt,
                    budget,
                    error,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(policy.multiplier).min(policy.max_delay);
                attempt += 1;
            }
        }
    }
}
