//! Bounded exponential-backoff retry around a provider fetch.
//!
//! Only errors whose [`RetryClass`](crate::errors::RetryClass) is
//! `WithBackoff` are retried, and only up to the policy's attempt budget.
//! Anything still failing after that is returned to the caller, which marks
//! the symbol failed for this run; the next scheduled invocation's
//! overlapping window covers the gap.

use std::time::Duration;

use chrono::NaiveDate;
use log::warn;

use crate::errors::FetchError;
use crate::models::RawRow;
use crate::provider::FeedProvider;

/// Retry policy for transient fetch failures.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Must be >= 1.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the doubling delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries, useful for tests.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

/// Fetch with retries according to `policy`.
///
/// Non-retryable errors are returned immediately; retryable ones are
/// retried with exponential backoff until the attempt budget is spent.
pub async fn fetch_with_retry(
    provider: &dyn FeedProvider,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    policy: RetryPolicy,
) -> Result<Vec<RawRow>, FetchError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;

    for attempt in 1..=max_attempts {
        match provider.fetch(symbol, start, end).await {
            Ok(rows) => return Ok(rows),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!(
                    "Fetch attempt {}/{} for {} failed ({}), retrying in {:?}",
                    attempt, max_attempts, symbol, e, delay
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(policy.max_delay);
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("loop returns on every path")
}
