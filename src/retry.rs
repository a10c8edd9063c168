//! Exponential backoff for retryable gateway errors.
//!
//! Only errors for which [`GatewayError::is_retryable`] holds are retried.
//! Callers must keep the request id constant across attempts so the gateway
//! can recognise the retry.

use std::time::Duration;

use crate::gateway::{Result, error::GatewayError};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Fails on the first error.
    pub fn none() -> Self {
        Self::with_max_attempts(1)
    }

    /// `initial_delay * multiplier ^ attempt`, capped at `max_delay`.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let factor = self.backoff_multiplier.max(1.0).powi(exponent);
        let delay_ms = self.initial_delay.as_millis() as f64 * factor;
        if !delay_ms.is_finite() || delay_ms >= self.max_delay.as_millis() as f64 {
            return self.max_delay;
        }
        Duration::from_millis(delay_ms as u64)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the attempts run out. The last error is returned in the latter cases.
pub async fn retry_with_backoff<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        let error: GatewayError = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(attempt = attempt + 1, "Gateway call succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => e,
        };
        attempt += 1;
        if !error.is_retryable() || attempt >= max_attempts {
            return Err(error);
        }
        let delay = policy.delay_for_attempt(attempt - 1);
        tracing::warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            "Gateway call failed, retrying: {error}"
        );
        tokio::time::sleep(delay).await;
    }
}
