//! # sockdash-api
//!
//! Typed HTTP client for the management endpoints polled by the sockdash
//! dashboards: the backend's `/internal/v1` API, the Docker frontend's
//! management server and the cloud simulators' `/sim/v1` API.
//!
//! All endpoints are read-only GETs. A non-success status surfaces as
//! [`ApiError::Request`] carrying the numeric status, its reason phrase and
//! the raw body.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod sim;
pub mod types;

pub use client::{resources_path, ApiClient, INTERNAL_PREFIX, SIM_PREFIX};
pub use error::{ApiError, ApiResult};
pub use sim::Provider;
pub use types::{
    BackendInfo, CheckResponse, CheckResult, ContainerSummary, FrontendMetrics, FrontendStatus,
    HealthResponse, LatencyStats, MetricsResponse, ResourceEntry, StatusResponse,
};
