//! Shared query cache.
//!
//! One [`QueryClient`] is created at startup and handed to every view that
//! issues queries. Entries are keyed by [`QueryKey`]; each entry stores the
//! last value behind `Arc<dyn Any>` and, while a request runs, the shared
//! in-flight future. Concurrent fetches of the same key join that future,
//! so at most one request per key is outstanding. The request itself runs
//! on its own task and settles the entry even if every waiter is dropped.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::error::{BoxError, QueryError, QueryResult};
use crate::key::QueryKey;
use crate::options::QueryOptions;
use crate::state::{QueryState, QueryStatus};

/// Type-erased fetch function stored by a [`Query`](crate::Query).
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, BoxError>> + Send + Sync>;

type AnyData = Arc<dyn Any + Send + Sync>;

/// Capacity of the change-notification channel.
const EVENT_CAPACITY: usize = 256;

/// Cache change notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// A request started for the key.
    Fetching(QueryKey),
    /// New data is cached for the key.
    Updated(QueryKey),
    /// The last request for the key failed.
    Failed(QueryKey),
    /// The key's data was marked stale.
    Invalidated(QueryKey),
}

impl QueryEvent {
    /// Key the event refers to.
    #[must_use]
    pub fn key(&self) -> &QueryKey {
        match self {
            Self::Fetching(key) | Self::Updated(key) | Self::Failed(key) | Self::Invalidated(key) => key,
        }
    }
}

#[derive(Clone)]
struct FetchOutcome {
    result: Result<AnyData, QueryError>,
    failures: u32,
}

type InFlight = Shared<BoxFuture<'static, FetchOutcome>>;

struct Entry {
    type_id: TypeId,
    type_name: &'static str,
    status: QueryStatus,
    data: Option<AnyData>,
    error: Option<QueryError>,
    failure_count: u32,
    updated_at: Option<Instant>,
    invalidated: bool,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl Entry {
    fn new<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            status: QueryStatus::Idle,
            data: None,
            error: None,
            failure_count: 0,
            updated_at: None,
            invalidated: false,
            in_flight: None,
            generation: 0,
        }
    }

    fn check_type<T: Any>(&self, key: &QueryKey) -> QueryResult<()> {
        if self.type_id == TypeId::of::<T>() {
            Ok(())
        } else {
            Err(QueryError::TypeMismatch {
                key: key.clone(),
                cached: self.type_name,
                requested: std::any::type_name::<T>(),
            })
        }
    }

    fn snapshot<T: Any + Send + Sync>(&self) -> QueryState<T> {
        QueryState {
            status: self.status,
            data: self.data.clone().and_then(|data| data.downcast::<T>().ok()),
            error: self.error.clone(),
            is_fetching: self.in_flight.is_some(),
            failure_count: self.failure_count,
            updated_at: self.updated_at,
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    events: broadcast::Sender<QueryEvent>,
}

/// Shared, cloneable query cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.inner.entries.lock().len())
            .finish_non_exhaustive()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Receive cache change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.inner.events.subscribe()
    }

    /// Current state of `key` as type `T`.
    #[must_use]
    pub fn state<T: Any + Send + Sync>(&self, key: &QueryKey) -> QueryState<T> {
        let entries = self.inner.entries.lock();
        match entries.get(key) {
            None => QueryState::default(),
            Some(entry) if entry.type_id != TypeId::of::<T>() => {
                QueryState::type_mismatch(key, entry.type_name)
            }
            Some(entry) => entry.snapshot(),
        }
    }

    /// Store `value` for `key` as if it had just been fetched.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] if the key holds another type.
    pub fn set_data<T: Any + Send + Sync>(&self, key: &QueryKey, value: T) -> QueryResult<()> {
        {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new::<T>);
            entry.check_type::<T>(key)?;
            entry.data = Some(Arc::new(value));
            entry.status = QueryStatus::Success;
            entry.error = None;
            entry.failure_count = 0;
            entry.updated_at = Some(Instant::now());
            entry.invalidated = false;
        }
        self.emit(QueryEvent::Updated(key.clone()));
        Ok(())
    }

    /// Mark `key` stale so the next `ensure` refetches it.
    pub fn invalidate(&self, key: &QueryKey) {
        let found = self
            .inner
            .entries
            .lock()
            .get_mut(key)
            .map(|entry| entry.invalidated = true)
            .is_some();
        if found {
            self.emit(QueryEvent::Invalidated(key.clone()));
        }
    }

    /// Drop `key` from the cache.
    pub fn remove(&self, key: &QueryKey) {
        self.inner.entries.lock().remove(key);
    }

    /// Number of cached keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached data for `key` if it is younger than the stale time.
    fn fresh<T: Any + Send + Sync>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
    ) -> QueryResult<Option<Arc<T>>> {
        let entries = self.inner.entries.lock();
        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };
        entry.check_type::<T>(key)?;
        if entry.invalidated {
            return Ok(None);
        }
        let fresh = entry
            .updated_at
            .is_some_and(|at| at.elapsed() < options.stale_time);
        if !fresh {
            return Ok(None);
        }
        Ok(entry.data.clone().and_then(|data| data.downcast::<T>().ok()))
    }

    /// Return cached data while fresh, otherwise fetch.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    pub async fn ensure<T: Any + Send + Sync>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: &Fetcher<T>,
    ) -> QueryResult<Arc<T>> {
        if let Some(data) = self.fresh::<T>(key, options)? {
            trace!(key = %key, "serving fresh cached data");
            return Ok(data);
        }
        self.fetch(key, options, fetcher).await
    }

    /// Fetch `key` now, joining a request already in flight for it.
    ///
    /// A failed attempt is retried `options.retry` times. The request runs
    /// on a spawned task, so dropping this future leaves it running; its
    /// outcome is written to the cache exactly once.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Fetch`] with the last error when every attempt fails.
    /// - [`QueryError::TypeMismatch`] if the key caches another type.
    pub async fn fetch<T: Any + Send + Sync>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: &Fetcher<T>,
    ) -> QueryResult<Arc<T>> {
        let (in_flight, generation, started) = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new::<T>);
            entry.check_type::<T>(key)?;

            match &entry.in_flight {
                Some(in_flight) => {
                    debug!(key = %key, "joining in-flight fetch");
                    (in_flight.clone(), entry.generation, false)
                }
                None => {
                    entry.generation = entry.generation.wrapping_add(1);
                    let fut = self.spawn_fetch(key, entry.generation, options, fetcher);
                    entry.in_flight = Some(fut.clone());
                    if entry.data.is_none() {
                        entry.status = QueryStatus::Loading;
                    }
                    (fut, entry.generation, true)
                }
            }
        };
        if started {
            self.emit(QueryEvent::Fetching(key.clone()));
        }

        let outcome = in_flight.await;
        // Already applied by the fetch task unless that task panicked.
        self.settle(key, generation, &outcome);

        outcome.result.and_then(|data| {
            data.downcast::<T>().map_err(|_| QueryError::TypeMismatch {
                key: key.clone(),
                cached: "<unknown>",
                requested: std::any::type_name::<T>(),
            })
        })
    }

    /// Run the request for `key` on its own task and share its outcome.
    fn spawn_fetch<T: Any + Send + Sync>(
        &self,
        key: &QueryKey,
        generation: u64,
        options: &QueryOptions,
        fetcher: &Fetcher<T>,
    ) -> InFlight {
        let client = self.clone();
        let task_key = key.clone();
        let run = run_fetch(key.clone(), options.clone(), fetcher.clone());
        tokio::spawn(async move {
            let outcome = run.await;
            client.settle(&task_key, generation, &outcome);
            outcome
        })
        .map(|joined| {
            joined.unwrap_or_else(|err| FetchOutcome {
                result: Err(QueryError::Fetch(Arc::new(err))),
                failures: 0,
            })
        })
        .boxed()
        .shared()
    }

    /// Apply a finished fetch to the cache if it is still the current one.
    fn settle(&self, key: &QueryKey, generation: u64, outcome: &FetchOutcome) {
        let event = {
            let mut entries = self.inner.entries.lock();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };
            if entry.in_flight.is_none() || entry.generation != generation {
                return;
            }

            entry.in_flight = None;
            entry.failure_count = outcome.failures;
            match &outcome.result {
                Ok(data) => {
                    entry.data = Some(data.clone());
                    entry.error = None;
                    entry.status = QueryStatus::Success;
                    entry.updated_at = Some(Instant::now());
                    entry.invalidated = false;
                    QueryEvent::Updated(key.clone())
                }
                Err(err) => {
                    entry.error = Some(err.clone());
                    entry.status = QueryStatus::Error;
                    QueryEvent::Failed(key.clone())
                }
            }
        };
        self.emit(event);
    }

    fn emit(&self, event: QueryEvent) {
        // No receivers is fine: nothing is drawing.
        let _ = self.inner.events.send(event);
    }
}

async fn run_fetch<T: Any + Send + Sync>(
    key: QueryKey,
    options: QueryOptions,
    fetcher: Fetcher<T>,
) -> FetchOutcome {
    let mut failures = 0;
    loop {
        match fetcher().await {
            Ok(value) => {
                debug!(key = %key, failures, "fetch succeeded");
                return FetchOutcome {
                    result: Ok(Arc::new(value)),
                    failures,
                };
            }
            Err(err) => {
                failures += 1;
                if failures > options.retry {
                    warn!(key = %key, failures, error = %err, "fetch failed");
                    return FetchOutcome {
                        result: Err(QueryError::from(err)),
                        failures,
                    };
                }
                debug!(key = %key, attempt = failures, error = %err, "fetch failed, retrying");
                tokio::time::sleep(options.retry_delay).await;
            }
        }
    }
}
