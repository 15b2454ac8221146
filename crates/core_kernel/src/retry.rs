//! Retry combinator with randomized exponential backoff
//!
//! Remote file transfers fail transiently often enough that the ingestion job
//! retries them. The combinator takes the operation, the policy, and a
//! predicate deciding which errors are retryable; the last error is returned
//! to the caller once attempts are exhausted.
//!
//! # Backoff
//!
//! After attempt `n` fails the combinator sleeps for a duration drawn
//! uniformly from `[0, min(max_delay, multiplier * 2^(n-1))]`.
//!
//! ```rust,ignore
//! let policy = RetryPolicy::default(); // 3 attempts, 1s multiplier, 60s cap
//! let content = retry_async(&policy, |_attempt| source.get(&remote, &local), PortError::is_transient).await?;
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Base of the exponential backoff
    pub multiplier: Duration,
    /// Upper bound of any single backoff
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy
    pub fn new(max_attempts: u32, multiplier: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            multiplier,
            max_delay,
        }
    }

    /// A policy that retries without sleeping
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Returns the upper bound of the backoff after the given failed attempt (1-based)
    pub fn backoff_ceiling(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let factor = 2u32.pow(exponent);
        self.multiplier
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Draws a randomized backoff for the given failed attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let ceiling = self.backoff_ceiling(attempt);
        if ceiling.is_zero() {
            return Duration::ZERO;
        }
        let fraction: f64 = rand::thread_rng().gen_range(0.0..=1.0);
        ceiling.mul_f64(fraction)
    }
}

/// Runs `operation` until it succeeds, a non-retryable error occurs, or the
/// policy's attempts are exhausted
///
/// The operation receives the 1-based attempt number.
pub async fn retry_async<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts && is_retryable(&error) => {
                let delay = policy.backoff(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Retryable failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.multiplier, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(60));
    }

    #[test]
    fn test_backoff_ceiling_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_ceiling(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_ceiling(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_ceiling(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_ceiling(7), Duration::from_secs(60));
        assert_eq!(policy.backoff_ceiling(40), Duration::from_secs(60));
    }

    #[test]
    fn test_backoff_within_ceiling() {
        let policy = RetryPolicy::default();
        for attempt in 1..10 {
            assert!(policy.backoff(attempt) <= policy.backoff_ceiling(attempt));
        }
    }

    #[test]
    fn test_immediate_policy_never_sleeps() {
        let policy = RetryPolicy::immediate(5);
        assert_eq!(policy.backoff(3), Duration::ZERO);
    }
}
