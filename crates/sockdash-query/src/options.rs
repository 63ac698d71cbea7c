//! Per-query fetch policy.

use std::time::Duration;

/// Default number of extra attempts after a failed fetch.
pub const DEFAULT_RETRY: u32 = 1;

/// Default pause between a failure and its retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// How often a query refetches and how long its data stays fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Refetch period while polled; `None` fetches once.
    pub refetch_interval: Option<Duration>,
    /// Cached data younger than this is served without a request.
    pub stale_time: Duration,
    /// Extra attempts after a failure.
    pub retry: u32,
    /// Pause before each retry.
    pub retry_delay: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            refetch_interval: None,
            stale_time: Duration::ZERO,
            retry: DEFAULT_RETRY,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl QueryOptions {
    /// Refetch every `interval` while polled.
    #[must_use]
    pub fn poll_every(interval: Duration) -> Self {
        Self {
            refetch_interval: Some(interval),
            ..Self::default()
        }
    }

    /// Fetch once; the data never goes stale.
    #[must_use]
    pub fn fetch_once() -> Self {
        Self {
            refetch_interval: None,
            stale_time: Duration::MAX,
            ..Self::default()
        }
    }

    /// Set the stale time.
    #[must_use]
    pub const fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Set the retry count.
    #[must_use]
    pub const fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    /// Set the retry delay.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}
