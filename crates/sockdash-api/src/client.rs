//! HTTP client for the management endpoints.
//!
//! The client is deliberately thin: one GET per call, JSON decoding into
//! the caller's type, and a structured error for non-success statuses.
//! Retrying and caching belong to the query layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use sockdash_api::ApiClient;
//!
//! # async fn example() -> Result<(), sockdash_api::ApiError> {
//! let client = ApiClient::new("http://localhost:9100")?;
//! let status = client.status().await?;
//! println!("{} containers on {}", status.containers, status.backend_type);
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::sim::{
    ArRepository, AzureResource, CloudRunJob, EcrRepository, EcsTask, GcpFunction, GcsBucket,
    LambdaFunction, LogEntry, LogGroup, MonitorLogRow, S3Bucket, SimSummary,
};
use crate::types::{
    BackendInfo, CheckResponse, ContainerSummary, FrontendMetrics, FrontendStatus,
    HealthResponse, MetricsResponse, ResourceEntry, StatusResponse,
};

/// Path prefix of the backend management API.
pub const INTERNAL_PREFIX: &str = "/internal/v1";

/// Path prefix of the simulator dashboard API.
pub const SIM_PREFIX: &str = "/sim/v1";

/// Typed client for backend, frontend and simulator management endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:9100`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] unless the URL is an absolute
    /// `http` or `https` URL.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client that issues requests through a preconfigured
    /// [`reqwest::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] for non-http(s) URLs.
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> ApiResult<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|e| {
            ApiError::InvalidBaseUrl(format!("{base_url}: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }

        let base_url = base_url.strip_suffix('/').unwrap_or(&base_url).to_string();
        Ok(Self { base_url, http })
    }

    /// The base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and decode the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Request`] when the status is outside 2xx; the body is
    ///   read as text and attached.
    /// - [`ApiError::Transport`] when no response arrives.
    /// - [`ApiError::Decode`] when the body is not valid JSON for `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "request failed");
            return Err(ApiError::Request {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn internal<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch(&format!("{INTERNAL_PREFIX}{path}")).await
    }

    async fn sim<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch(&format!("{SIM_PREFIX}{path}")).await
    }

    /// Simulator list; a `null` body (an empty Go slice) is an empty list.
    async fn sim_list<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let rows: Option<Vec<T>> = self.sim(path).await?;
        Ok(rows.unwrap_or_default())
    }

    // ---- backend -------------------------------------------------------

    /// `GET /internal/v1/healthz`.
    pub async fn health(&self) -> ApiResult<HealthResponse> {
        self.internal("/healthz").await
    }

    /// `GET /internal/v1/status`.
    pub async fn status(&self) -> ApiResult<StatusResponse> {
        self.internal("/status").await
    }

    /// `GET /internal/v1/containers/summary`.
    pub async fn containers(&self) -> ApiResult<Vec<ContainerSummary>> {
        self.internal("/containers/summary").await
    }

    /// `GET /internal/v1/metrics`.
    pub async fn metrics(&self) -> ApiResult<MetricsResponse> {
        self.internal("/metrics").await
    }

    /// `GET /internal/v1/resources?active=<active>`.
    pub async fn resources(&self, active: bool) -> ApiResult<Vec<ResourceEntry>> {
        self.internal(&resources_path(active)).await
    }

    /// `GET /internal/v1/check`.
    pub async fn check(&self) -> ApiResult<CheckResponse> {
        self.internal("/check").await
    }

    /// `GET /internal/v1/info`.
    pub async fn info(&self) -> ApiResult<BackendInfo> {
        self.internal("/info").await
    }

    // ---- docker frontend ------------------------------------------------

    /// Frontend `GET /healthz`.
    pub async fn frontend_health(&self) -> ApiResult<HealthResponse> {
        self.fetch("/healthz").await
    }

    /// Frontend `GET /status`.
    pub async fn frontend_status(&self) -> ApiResult<FrontendStatus> {
        self.fetch("/status").await
    }

    /// Frontend `GET /metrics`.
    pub async fn frontend_metrics(&self) -> ApiResult<FrontendMetrics> {
        self.fetch("/metrics").await
    }

    // ---- simulators -------------------------------------------------------

    /// `GET /sim/v1/summary`.
    pub async fn sim_summary(&self) -> ApiResult<SimSummary> {
        self.sim("/summary").await
    }

    /// AWS `GET /sim/v1/ecs/tasks`.
    pub async fn ecs_tasks(&self) -> ApiResult<Vec<EcsTask>> {
        self.sim_list("/ecs/tasks").await
    }

    /// AWS `GET /sim/v1/lambda/functions`.
    pub async fn lambda_functions(&self) -> ApiResult<Vec<LambdaFunction>> {
        self.sim_list("/lambda/functions").await
    }

    /// AWS `GET /sim/v1/ecr/repositories`.
    pub async fn ecr_repositories(&self) -> ApiResult<Vec<EcrRepository>> {
        self.sim_list("/ecr/repositories").await
    }

    /// AWS `GET /sim/v1/s3/buckets`.
    pub async fn s3_buckets(&self) -> ApiResult<Vec<S3Bucket>> {
        self.sim_list("/s3/buckets").await
    }

    /// AWS `GET /sim/v1/cloudwatch/log-groups`.
    pub async fn cloudwatch_log_groups(&self) -> ApiResult<Vec<LogGroup>> {
        self.sim_list("/cloudwatch/log-groups").await
    }

    /// GCP `GET /sim/v1/cloudrun/jobs`.
    pub async fn cloudrun_jobs(&self) -> ApiResult<Vec<CloudRunJob>> {
        self.sim_list("/cloudrun/jobs").await
    }

    /// GCP `GET /sim/v1/functions`.
    pub async fn gcp_functions(&self) -> ApiResult<Vec<GcpFunction>> {
        self.sim_list("/functions").await
    }

    /// GCP `GET /sim/v1/ar/repositories`.
    pub async fn ar_repositories(&self) -> ApiResult<Vec<ArRepository>> {
        self.sim_list("/ar/repositories").await
    }

    /// GCP `GET /sim/v1/gcs/buckets`.
    pub async fn gcs_buckets(&self) -> ApiResult<Vec<GcsBucket>> {
        self.sim_list("/gcs/buckets").await
    }

    /// GCP `GET /sim/v1/logging/entries`.
    pub async fn log_entries(&self) -> ApiResult<Vec<LogEntry>> {
        self.sim_list("/logging/entries").await
    }

    /// Azure `GET /sim/v1/container-apps/jobs`.
    pub async fn container_app_jobs(&self) -> ApiResult<Vec<AzureResource>> {
        self.sim_list("/container-apps/jobs").await
    }

    /// Azure `GET /sim/v1/functions/sites`.
    pub async fn function_sites(&self) -> ApiResult<Vec<AzureResource>> {
        self.sim_list("/functions/sites").await
    }

    /// Azure `GET /sim/v1/acr/registries`.
    pub async fn acr_registries(&self) -> ApiResult<Vec<AzureResource>> {
        self.sim_list("/acr/registries").await
    }

    /// Azure `GET /sim/v1/storage/accounts`.
    pub async fn storage_accounts(&self) -> ApiResult<Vec<AzureResource>> {
        self.sim_list("/storage/accounts").await
    }

    /// Azure `GET /sim/v1/monitor/logs`.
    pub async fn monitor_logs(&self) -> ApiResult<Vec<MonitorLogRow>> {
        self.sim_list("/monitor/logs").await
    }
}

/// Relative path of the resource registry listing.
#[must_use]
pub fn resources_path(active: bool) -> String {
    format!("/resources?active={active}")
}
