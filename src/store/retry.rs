//! Bounded retry with linear backoff for remote store access.
//!
//! Applied uniformly to idempotent reads and the authorization handshake.
//! Destructive writes (clear/write/append) are never routed through here:
//! retrying a partial overwrite risks duplicate or corrupted remote state.

use std::future::Future;
use std::time::Duration;

use super::error::{StoreError, StoreResult};

/// Retry policy: bounded attempts with linear backoff.
///
/// Attempt `n` (1-based) sleeps `base_delay * n` before the next try, so the
/// delays grow 1x, 2x, 3x, …
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Run `op`, retrying retryable failures up to the attempt budget.
    ///
    /// Non-retryable errors (authentication rejections, missing resources,
    /// data-shape failures) surface immediately.
    pub async fn run<T, F, Fut>(&self, op: F) -> StoreResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    log::warn!(
                        "retryable store error on attempt {}/{}: {}",
                        attempt,
                        attempts,
                        err
                    );
                    tokio::time::sleep(self.base_delay * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
