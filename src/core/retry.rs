//! Retrying remote calls with exponential backoff
//!
//! Every remote step of a sync (page query, record fetch, body render,
//! write-back) goes through a [`Retrier`]. Only errors classified as
//! retryable by [`DiaryError::is_retryable`] are retried; the rest surface
//! immediately.

use crate::config::RetryConfig;
use crate::domain::{DiaryError, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Backoff parameters for one class of remote calls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum attempts, the first call included
    pub max_attempts: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,
    /// Add up to 25% random jitter
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            jitter: config.jitter,
        }
    }
}

impl RetryPolicy {
    /// Policy with no delay between attempts
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// Delay to wait after the given failed attempt (1-based), before jitter
    pub fn base_delay(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as usize) as i32;
        let initial_ms = self.initial_delay.as_millis() as f64;
        let max_ms = self.max_delay.as_millis() as f64;
        let delay_ms = (initial_ms * self.backoff_multiplier.powi(exponent)).min(max_ms);
        Duration::from_millis(delay_ms.max(0.0) as u64)
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        let base = self.base_delay(attempt);
        if !self.jitter || base.is_zero() {
            return base;
        }
        let factor = rand::thread_rng().gen_range(0.0..=0.25);
        base + base.mul_f64(factor)
    }
}

/// Invokes fallible async operations under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct Retrier {
    policy: RetryPolicy,
}

impl Retrier {
    /// Create a retrier for the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `f` until it succeeds, fails terminally or attempts run out
    ///
    /// # Errors
    ///
    /// Non-retryable errors are returned as is after the attempt that
    /// produced them. When every attempt fails with retryable errors, returns
    /// `DiaryError::RemoteCallExhausted` wrapping the last failure.
    pub async fn call<T, F, Fut>(&self, operation: &str, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!(operation, attempt, max_attempts, "Calling remote");

            let err = match f().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !err.is_retryable() {
                tracing::debug!(operation, attempt, error = %err, "Not retrying terminal error");
                return Err(err);
            }

            if attempt >= max_attempts {
                return Err(DiaryError::RemoteCallExhausted {
                    operation: operation.to_string(),
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            let delay = self.policy.delay_for(attempt);
            crate::log_retry_attempt!(
                operation,
                attempt,
                max_attempts,
                delay.as_millis() as u64,
                &err
            );
            tokio::time::sleep(delay).await;
        }
    }
}
