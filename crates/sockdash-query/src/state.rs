//! Snapshot of a query as seen by a view.

use std::fmt;
use std::sync::Arc;

use tokio::time::Instant;

use crate::error::QueryError;
use crate::key::QueryKey;

/// Lifecycle of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// Never fetched.
    #[default]
    Idle,
    /// First fetch in progress, no data yet.
    Loading,
    /// Last fetch succeeded.
    Success,
    /// Last fetch failed; earlier data may still be present.
    Error,
}

/// Point-in-time view of one query.
///
/// `data` survives failed refetches, so a view can keep showing the last
/// good value next to the error.
pub struct QueryState<T> {
    /// Current status.
    pub status: QueryStatus,
    /// Last successfully fetched value.
    pub data: Option<Arc<T>>,
    /// Error of the last fetch, if it failed.
    pub error: Option<QueryError>,
    /// A fetch is in flight (initial or background).
    pub is_fetching: bool,
    /// Failed attempts of the last fetch (retries included).
    pub failure_count: u32,
    /// When `data` was last replaced.
    pub updated_at: Option<Instant>,
}

impl<T> QueryState<T> {
    /// No data and a fetch pending or in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && matches!(self.status, QueryStatus::Idle | QueryStatus::Loading)
    }

    /// Last fetch succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// Last fetch failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Borrow the data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub(crate) fn type_mismatch(key: &QueryKey, cached: &'static str) -> Self {
        Self {
            status: QueryStatus::Error,
            error: Some(QueryError::TypeMismatch {
                key: key.clone(),
                cached,
                requested: std::any::type_name::<T>(),
            }),
            ..Self::default()
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
            failure_count: 0,
            updated_at: None,
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
            failure_count: self.failure_count,
            updated_at: self.updated_at,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("status", &self.status)
            .field("data", &self.data)
            .field("error", &self.error)
            .field("is_fetching", &self.is_fetching)
            .field("failure_count", &self.failure_count)
            .finish_non_exhaustive()
    }
}
