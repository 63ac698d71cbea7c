//! Error types for the dashboard.

use sockdash_api::ApiError;
use sockdash_query::QueryError;
use thiserror::Error;

/// Result type alias for dashboard operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Errors raised by pages, the shell and the snapshot commands.
#[derive(Debug, Error)]
pub enum TuiError {
    /// API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Query failed or was misused.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A sort referred to a column that does not exist.
    #[error("unknown column '{column}' (available: {available})")]
    UnknownColumn {
        /// Requested column id.
        column: String,
        /// Comma-separated valid ids.
        available: String,
    },

    /// Malformed sort argument.
    #[error("invalid sort: {0}")]
    InvalidSort(String),

    /// A page could not draw itself.
    #[error("render failed: {0}")]
    Render(String),

    /// Terminal I/O failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
