//! Resilience primitives for external lookups.

use std::future::Future;
use std::sync::Arc;

use backon::{ExponentialBuilder, Retryable};
use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

use crate::error::{EnrichError, EnrichResult};

/// Per-source rate limiter using a token-bucket approach.
///
/// Limits throughput to a configurable number of requests per second by
/// combining a single-permit [`Semaphore`] with a fixed sleep interval.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    interval: Duration,
}

impl RateLimiter {
    /// Creates a new `RateLimiter` that allows at most
    /// `requests_per_second` requests per second. Zero is treated as one.
    pub fn new(requests_per_second: u32) -> Self {
        let per_second = u64::from(requests_per_second.max(1));
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            interval: Duration::from_millis(1000 / per_second),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until a request slot is available, then holds the slot for
    /// the configured interval to enforce the rate limit.
    pub async fn acquire(&self) {
        // The semaphore is never closed.
        let Ok(_permit) = self.semaphore.acquire().await else {
            return;
        };
        sleep(self.interval).await;
    }
}

/// Run `operation`, retrying transient failures up to `retries` extra times
/// with exponential backoff.
pub async fn with_retries<T, F, Fut>(
    source_name: &str,
    retries: usize,
    operation: F,
) -> EnrichResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = EnrichResult<T>>,
{
    operation
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(500))
                .with_max_times(retries),
        )
        .when(EnrichError::is_transient)
        .notify(|err: &EnrichError, delay: Duration| {
            log::debug!("Retrying {source_name} in {delay:?} after: {err}");
        })
        .await
}
