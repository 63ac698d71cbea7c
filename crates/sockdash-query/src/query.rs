//! Bound queries and background polling.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use futures::future::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::client::{Fetcher, QueryClient};
use crate::error::{BoxError, QueryResult};
use crate::key::QueryKey;
use crate::options::QueryOptions;
use crate::state::QueryState;

/// A key, its options and its fetch function, bound to a cache.
///
/// Cloning is cheap; all clones share the cache entry.
pub struct Query<T> {
    client: QueryClient,
    key: QueryKey,
    options: QueryOptions,
    fetcher: Fetcher<T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            key: self.key.clone(),
            options: self.options.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Any + Send + Sync> Query<T> {
    /// Bind `fetch` to `key` in `client`.
    pub fn new<F, Fut, E>(client: &QueryClient, key: QueryKey, options: QueryOptions, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let fetcher: Fetcher<T> = Arc::new(move || fetch().map(|r| r.map_err(Into::<BoxError>::into)).boxed());
        Self {
            client: client.clone(),
            key,
            options,
            fetcher,
        }
    }

    /// Cache key.
    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Fetch policy.
    #[must_use]
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Current cached state.
    #[must_use]
    pub fn state(&self) -> QueryState<T> {
        self.client.state(&self.key)
    }

    /// Fetch now regardless of freshness.
    ///
    /// # Errors
    ///
    /// See [`QueryClient::fetch`].
    pub async fn refetch(&self) -> QueryResult<Arc<T>> {
        self.client.fetch(&self.key, &self.options, &self.fetcher).await
    }

    /// Fetch unless the cached data is still fresh.
    ///
    /// # Errors
    ///
    /// See [`QueryClient::fetch`].
    pub async fn ensure(&self) -> QueryResult<Arc<T>> {
        self.client.ensure(&self.key, &self.options, &self.fetcher).await
    }

    /// Start polling on a background task.
    ///
    /// With a refetch interval the query is fetched every interval (the
    /// first tick fires immediately); without one it is fetched once if
    /// stale. Dropping the returned handle stops polling; a request already
    /// started still completes and is cached.
    #[must_use = "polling stops when the handle is dropped"]
    pub fn poll(&self) -> PollHandle {
        let query = self.clone();
        let task = tokio::spawn(async move {
            match query.options.refetch_interval {
                Some(every) => {
                    let mut interval = tokio::time::interval(every);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        interval.tick().await;
                        if let Err(err) = query.ensure().await {
                            debug!(key = %query.key, error = %err, "poll fetch failed");
                        }
                    }
                }
                None => {
                    if let Err(err) = query.ensure().await {
                        debug!(key = %query.key, error = %err, "one-shot fetch failed");
                    }
                }
            }
        });
        PollHandle {
            key: self.key.clone(),
            task,
        }
    }
}

/// Running poll task; aborts on drop.
#[derive(Debug)]
pub struct PollHandle {
    key: QueryKey,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Key being polled.
    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Whether the task has stopped (one-shot fetch done, or aborted).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Debug, thiserror::Error)]
    #[error("status {0}")]
    struct HttpFailure(u16);

    fn counter_query(client: &QueryClient, calls: &Arc<AtomicU32>, options: QueryOptions) -> Query<u32> {
        let calls = calls.clone();
        Query::new(client, QueryKey::new("counter"), options, move || {
            let calls = calls.clone();
            async move { Ok::<_, HttpFailure>(calls.fetch_add(1, Ordering::SeqCst) + 1) }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_refetches_on_interval() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicU32::new(0));
        let query = counter_query(&client, &calls, QueryOptions::poll_every(Duration::from_secs(5)));

        let handle = query.poll();
        tokio::time::sleep(Duration::from_millis(10_100)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(query.state().data(), Some(&3));
        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_polling() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicU32::new(0));
        let query = counter_query(&client, &calls, QueryOptions::poll_every(Duration::from_secs(5)));

        let handle = query.poll();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_mid_fetch_does_not_wedge_key() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicU32::new(0));
        let slow_calls = calls.clone();
        let query: Query<u32> = Query::new(
            &client,
            QueryKey::new("slow"),
            QueryOptions::poll_every(Duration::from_secs(5)),
            move || {
                let calls = slow_calls.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    Ok::<_, HttpFailure>(calls.fetch_add(1, Ordering::SeqCst) + 1)
                }
            },
        );

        let handle = query.poll();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(query.state().is_fetching);
        drop(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;

        let state = query.state();
        assert!(!state.is_fetching);
        assert!(state.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Remounting polls again rather than joining a stranded request.
        let handle = query.poll();
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(query.state().data(), Some(&2));
        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_poll_finishes() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicU32::new(0));
        let query = counter_query(&client, &calls, QueryOptions::fetch_once());

        let handle = query.poll();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(handle.is_finished());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(query.state().is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_source_is_downcastable() {
        let client = QueryClient::new();
        let query: Query<u32> = Query::new(
            &client,
            QueryKey::new("broken"),
            QueryOptions::default().with_retry(0),
            || async { Err(HttpFailure(503)) },
        );

        assert!(query.refetch().await.is_err());

        let state = query.state();
        assert!(state.is_error());
        let source = state.error.as_ref().and_then(|e| e.downcast_ref::<HttpFailure>());
        assert_eq!(source.map(|e| e.0), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_ignores_freshness() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicU32::new(0));
        let query = counter_query(&client, &calls, QueryOptions::fetch_once());

        query.ensure().await.unwrap();
        query.ensure().await.unwrap();
        let value = query.refetch().await.unwrap();

        assert_eq!(*value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
