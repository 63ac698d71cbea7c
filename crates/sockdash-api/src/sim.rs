//! Simulator dashboard endpoints (`/sim/v1/...`).
//!
//! Each cloud simulator exposes a summary plus one flat list per emulated
//! service. The list records are summaries built by the simulator, not the
//! full provider resources.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Cloud provider emulated by a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Amazon Web Services.
    Aws,
    /// Google Cloud Platform.
    Gcp,
    /// Microsoft Azure.
    Azure,
}

impl Provider {
    /// Human-readable name used in titles.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Gcp => "GCP",
            Self::Azure => "Azure",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
        })
    }
}

/// `GET /sim/v1/summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSummary {
    /// Provider name as reported by the simulator.
    pub provider: String,
    /// Resource counts keyed by service.
    pub services: BTreeMap<String, u64>,
}

/// AWS `GET /sim/v1/ecs/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcsTask {
    /// Task ARN.
    pub task_arn: String,
    /// Last known status, e.g. `RUNNING`.
    pub status: String,
    /// ARN of the owning cluster.
    pub cluster_arn: String,
    /// `FARGATE` or `EC2`.
    pub launch_type: String,
    /// CPU units as declared by the task definition.
    pub cpu: String,
    /// Memory in MiB as declared by the task definition.
    pub memory: String,
}

/// AWS `GET /sim/v1/lambda/functions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaFunction {
    /// Function name.
    pub name: String,
    /// Runtime identifier, e.g. `provided.al2`.
    pub runtime: String,
    /// Function state.
    pub state: String,
    /// Memory in MB.
    pub memory_size: i64,
    /// Timeout in seconds.
    pub timeout: i64,
    /// Last modification timestamp.
    pub last_modified: String,
}

/// AWS `GET /sim/v1/ecr/repositories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcrRepository {
    /// Repository name.
    pub name: String,
    /// Repository URI used for pushes and pulls.
    pub uri: String,
    /// Unix seconds.
    pub created_at: i64,
}

/// AWS `GET /sim/v1/s3/buckets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Bucket {
    /// Bucket name.
    pub name: String,
    /// Creation timestamp.
    pub creation_date: String,
}

/// AWS `GET /sim/v1/cloudwatch/log-groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroup {
    /// Log group name.
    pub name: String,
    /// Unix milliseconds.
    pub creation_time: i64,
    /// Retention in days; zero means never expire.
    pub retention_in_days: i64,
    /// Bytes stored across all streams.
    pub stored_bytes: i64,
}

/// GCP `GET /sim/v1/cloudrun/jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudRunJob {
    /// Full resource name.
    pub name: String,
    /// Creation timestamp.
    pub create_time: String,
    /// Executions started so far.
    pub execution_count: i64,
    /// Launch stage, e.g. `GA`.
    pub launch_stage: String,
}

/// GCP `GET /sim/v1/functions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpFunction {
    /// Full resource name.
    pub name: String,
    /// Function state.
    pub state: String,
    /// `GEN_1` or `GEN_2`.
    pub environment: String,
    /// Creation timestamp.
    pub create_time: String,
}

/// GCP `GET /sim/v1/ar/repositories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArRepository {
    /// Full resource name.
    pub name: String,
    /// Package format, e.g. `DOCKER`.
    pub format: String,
    /// Creation timestamp.
    pub create_time: String,
}

/// GCP `GET /sim/v1/gcs/buckets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcsBucket {
    /// Bucket name.
    pub name: String,
    /// Raw bucket resource as stored by the simulator.
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl GcsBucket {
    /// String field from the raw bucket resource, if present.
    #[must_use]
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(serde_json::Value::as_str)
    }
}

/// GCP `GET /sim/v1/logging/entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Full log name.
    pub log_name: String,
    /// Entry timestamp.
    pub timestamp: String,
    /// Severity, e.g. `INFO`.
    pub severity: String,
    /// Plain-text payload, when the entry has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_payload: Option<String>,
}

/// Azure resources listed by the simulator share one shape; `kind` holds
/// the `type` or `kind` field depending on the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureResource {
    /// ARM resource id.
    pub id: String,
    /// Resource name.
    pub name: String,
    /// Azure region.
    pub location: String,
    /// Resource type or kind.
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Azure `GET /sim/v1/monitor/logs`: a row of field/value pairs.
pub type MonitorLogRow = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_display() {
        assert_eq!(Provider::Aws.to_string(), "aws");
        assert_eq!(Provider::Azure.display_name(), "Azure");
    }

    #[test]
    fn test_azure_type_alias() {
        let job: AzureResource = serde_json::from_value(json!({
            "id": "/subscriptions/x/jobs/a",
            "name": "a",
            "location": "eastus",
            "type": "Microsoft.App/jobs",
        }))
        .unwrap();
        assert_eq!(job.kind.as_deref(), Some("Microsoft.App/jobs"));

        let registry: AzureResource = serde_json::from_value(json!({
            "id": "/subscriptions/x/registries/r",
            "name": "r",
            "location": "westeurope",
        }))
        .unwrap();
        assert!(registry.kind.is_none());
    }

    #[test]
    fn test_gcs_bucket_data() {
        let bucket: GcsBucket = serde_json::from_value(json!({
            "name": "assets",
            "data": { "name": "assets", "location": "US", "storageClass": "STANDARD" },
        }))
        .unwrap();
        assert_eq!(bucket.data_str("location"), Some("US"));
        assert_eq!(bucket.data_str("missing"), None);
    }

    #[test]
    fn test_log_entry_without_payload() {
        let entry: LogEntry = serde_json::from_value(json!({
            "logName": "projects/p/logs/run",
            "timestamp": "2025-01-01T00:00:00Z",
            "severity": "INFO",
        }))
        .unwrap();
        assert!(entry.text_payload.is_none());
    }
}
