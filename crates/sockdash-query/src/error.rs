//! Error types for the query cache.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

use crate::key::QueryKey;

/// Boxed error returned by fetchers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors surfaced through query state.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The fetcher failed on every attempt; holds the last error.
    #[error("{0}")]
    Fetch(Arc<dyn StdError + Send + Sync + 'static>),

    /// The key already caches a value of another type.
    #[error("query {key} holds {cached}, not {requested}")]
    TypeMismatch {
        /// Offending key.
        key: QueryKey,
        /// Type stored in the cache.
        cached: &'static str,
        /// Type the caller asked for.
        requested: &'static str,
    },
}

impl QueryError {
    /// The fetcher's error as a concrete type, if it is one.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Fetch(err) => err.downcast_ref::<E>(),
            Self::TypeMismatch { .. } => None,
        }
    }
}

impl From<BoxError> for QueryError {
    fn from(err: BoxError) -> Self {
        Self::Fetch(Arc::from(err))
    }
}
