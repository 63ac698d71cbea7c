//! Error types for the API client.

use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by [`ApiClient`](crate::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status outside the 2xx range.
    #[error("request failed: {status} {status_text}: {body}")]
    Request {
        /// Numeric HTTP status.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response (connection refused, reset, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON shape the caller asked for.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        /// Request path that produced the body.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server responded at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode { .. } | Self::InvalidBaseUrl(_) => None,
        }
    }

    /// Whether the error came from a non-success HTTP status.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        matches!(self, Self::Request { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        let err = ApiError::Request {
            status: 404,
            status_text: "Not Found".to_string(),
            body: "no such container".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request failed: 404 Not Found: no such container"
        );
        assert_eq!(err.status(), Some(404));
        assert!(err.is_request());
    }

    #[test]
    fn test_decode_error_has_no_status() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ApiError::Decode {
            path: "/internal/v1/status".to_string(),
            source,
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_request());
        assert!(err.to_string().contains("/internal/v1/status"));
    }

    #[test]
    fn test_invalid_base_url_display() {
        let err = ApiError::InvalidBaseUrl("ftp://x".to_string());
        assert_eq!(err.to_string(), "invalid base url: ftp://x");
    }
}
