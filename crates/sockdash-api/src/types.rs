//! Response types for backend and frontend management endpoints.
//!
//! Field names follow the JSON the servers emit, so some records use
//! `camelCase` or Docker-style `PascalCase` keys on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `GET /internal/v1/healthz` (and the frontend's `GET /healthz`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status, normally `"ok"`.
    pub status: String,
    /// Component that answered (`backend`, `frontend`, ...).
    pub component: String,
    /// Seconds since the component started.
    pub uptime_seconds: u64,
}

/// `GET /internal/v1/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Overall status string.
    pub status: String,
    /// Component name.
    pub component: String,
    /// Backend driver (`memory`, `ecs`, `cloudrun`, ...).
    pub backend_type: String,
    /// Unique id of this backend instance.
    pub instance_id: String,
    /// Seconds since the backend started.
    pub uptime_seconds: u64,
    /// Number of known containers.
    pub containers: u64,
    /// Number of live cloud resources.
    pub active_resources: u64,
    /// Active context name.
    pub context: String,
}

/// One entry of `GET /internal/v1/containers/summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Container id.
    pub id: String,
    /// Container name.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Lifecycle state (`running`, `exited`, ...).
    pub state: String,
    /// Creation timestamp (RFC 3339).
    pub created: String,
    /// Pod the container belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
}

/// Latency percentiles in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Median.
    pub p50: f64,
    /// 95th percentile.
    pub p95: f64,
    /// 99th percentile.
    pub p99: f64,
}

/// `GET /internal/v1/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// Request counts keyed by `"METHOD /path"`.
    pub requests: BTreeMap<String, u64>,
    /// Latency percentiles keyed like `requests`.
    pub latency_ms: BTreeMap<String, LatencyStats>,
    /// Live goroutines in the backend process.
    pub goroutines: u64,
    /// Heap in use, in MiB.
    pub heap_alloc_mb: f64,
    /// Seconds since start, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
    /// Container count, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<u64>,
    /// Active resource count, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_resources: Option<u64>,
}

/// One entry of `GET /internal/v1/resources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// Container that owns the resource.
    pub container_id: String,
    /// Backend that created it.
    pub backend: String,
    /// Cloud resource kind (`task`, `function`, ...).
    pub resource_type: String,
    /// Provider-side identifier.
    pub resource_id: String,
    /// Backend instance that created it.
    pub instance_id: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Whether the resource has been cleaned up.
    pub cleaned_up: bool,
    /// Provider status, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Single health check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name.
    pub name: String,
    /// Check outcome (`ok`, `warning`, `error`, ...).
    pub status: String,
    /// Optional detail message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// `GET /internal/v1/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Individual check results.
    pub checks: Vec<CheckResult>,
}

/// `GET /internal/v1/info`, a Docker-engine style info record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BackendInfo {
    /// Engine id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Engine name.
    pub name: String,
    /// Server version string.
    pub server_version: String,
    /// Total containers.
    pub containers: u64,
    /// Running containers.
    pub containers_running: u64,
    /// Stopped containers.
    pub containers_stopped: u64,
    /// Image count.
    pub images: u64,
    /// Storage driver.
    pub driver: String,
    /// Operating system description.
    pub operating_system: String,
    /// OS family.
    #[serde(rename = "OSType")]
    pub os_type: String,
    /// CPU architecture.
    pub architecture: String,
    /// CPU count.
    #[serde(rename = "NCPU")]
    pub ncpu: u32,
    /// Total memory in bytes.
    pub mem_total: u64,
}

/// Docker frontend `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendStatus {
    /// Overall status string.
    pub status: String,
    /// Component name.
    pub component: String,
    /// Address the Docker API listens on.
    pub docker_addr: String,
    /// Backend the frontend forwards to.
    pub backend_addr: String,
    /// Seconds since the frontend started.
    pub uptime_seconds: u64,
}

/// Docker frontend `GET /metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendMetrics {
    /// Component name.
    #[serde(default)]
    pub component: String,
    /// Seconds since the frontend started.
    #[serde(default)]
    pub uptime_seconds: u64,
    /// Docker API requests served.
    pub docker_requests: u64,
    /// Live goroutines.
    pub goroutines: u64,
    /// Heap in use, in MiB.
    pub heap_alloc_mb: f64,
}
