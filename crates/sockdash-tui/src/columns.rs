//! Column sets for every table the dashboards and snapshot commands show.

use chrono::DateTime;
use ratatui::style::{Color, Style};
use sockdash_api::sim::{
    ArRepository, AzureResource, CloudRunJob, EcrRepository, EcsTask, GcpFunction, GcsBucket, LambdaFunction,
    LogEntry, LogGroup, MonitorLogRow, S3Bucket,
};
use sockdash_api::{CheckResult, ContainerSummary, MetricsResponse, ResourceEntry};

use crate::table::{CellText, Column};
use crate::widgets::{format_bytes, status_style};

/// Last `/`-separated segment of an ARN or resource path.
#[must_use]
pub fn short_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// First twelve characters of a container id.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

fn badge(status: &str) -> CellText {
    CellText::styled(status, status_style(status))
}

fn dim(text: impl Into<String>) -> CellText {
    CellText::styled(text, Style::default().fg(Color::DarkGray))
}

fn unix_seconds(secs: i64) -> CellText {
    DateTime::from_timestamp(secs, 0).map_or_else(
        || dim(secs.to_string()),
        |dt| CellText::plain(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
    )
}

fn unix_millis(millis: i64) -> CellText {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || dim(millis.to_string()),
        |dt| CellText::plain(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
    )
}

/// Backend containers.
pub fn containers() -> Vec<Column<ContainerSummary>> {
    vec![
        Column::new("id", "ID", |c: &ContainerSummary| short_id(&c.id).into()).width(12),
        Column::new("name", "Name", |c: &ContainerSummary| (&c.name).into()),
        Column::new("image", "Image", |c: &ContainerSummary| (&c.image).into()),
        Column::new("state", "State", |c: &ContainerSummary| (&c.state).into())
            .width(10)
            .render_with(|c| badge(&c.state)),
        Column::new("pod", "Pod", |c: &ContainerSummary| c.pod_name.as_deref().into()),
        Column::new("created", "Created", |c: &ContainerSummary| (&c.created).into()).width(20),
    ]
}

/// Cloud resources tracked by the backend.
pub fn resources() -> Vec<Column<ResourceEntry>> {
    vec![
        Column::new("type", "Type", |r: &ResourceEntry| (&r.resource_type).into()).width(16),
        Column::new("id", "Resource ID", |r: &ResourceEntry| (&r.resource_id).into()),
        Column::new("container", "Container", |r: &ResourceEntry| short_id(&r.container_id).into()).width(12),
        Column::new("backend", "Backend", |r: &ResourceEntry| (&r.backend).into()).width(12),
        Column::new("status", "Status", |r: &ResourceEntry| resource_status(r).into())
            .width(10)
            .render_with(|r| badge(resource_status(r))),
        Column::new("created", "Created", |r: &ResourceEntry| (&r.created_at).into()).width(20),
    ]
}

/// Explicit status, or derived from the cleanup flag.
#[must_use]
pub fn resource_status(r: &ResourceEntry) -> &str {
    match (&r.status, r.cleaned_up) {
        (Some(status), _) => status.as_str(),
        (None, true) => "deleted",
        (None, false) => "active",
    }
}

/// Backend self-check results.
pub fn checks() -> Vec<Column<CheckResult>> {
    vec![
        Column::new("name", "Check", |c: &CheckResult| (&c.name).into()).width(20),
        Column::new("status", "Status", |c: &CheckResult| (&c.status).into())
            .width(8)
            .render_with(|c| badge(&c.status)),
        Column::new("detail", "Detail", |c: &CheckResult| c.detail.as_deref().into()),
    ]
}

/// One endpoint's request count and latency.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRow {
    /// `"METHOD /path"`.
    pub endpoint: String,
    /// Requests served.
    pub requests: u64,
    /// Latency percentiles, if recorded.
    pub p50: Option<f64>,
    /// 95th percentile.
    pub p95: Option<f64>,
    /// 99th percentile.
    pub p99: Option<f64>,
}

/// Per-endpoint rows from a metrics response, in endpoint order.
#[must_use]
pub fn endpoint_rows(metrics: &MetricsResponse) -> Vec<EndpointRow> {
    let mut endpoints: Vec<&String> = metrics.requests.keys().chain(metrics.latency_ms.keys()).collect();
    endpoints.sort();
    endpoints.dedup();
    endpoints
        .into_iter()
        .map(|endpoint| {
            let latency = metrics.latency_ms.get(endpoint);
            EndpointRow {
                endpoint: endpoint.clone(),
                requests: metrics.requests.get(endpoint).copied().unwrap_or(0),
                p50: latency.map(|l| l.p50),
                p95: latency.map(|l| l.p95),
                p99: latency.map(|l| l.p99),
            }
        })
        .collect()
}

fn millis(value: Option<f64>) -> CellText {
    value.map_or_else(|| dim("-"), |v| CellText::plain(format!("{v:.1} ms")))
}

/// Endpoint metrics.
pub fn endpoints() -> Vec<Column<EndpointRow>> {
    vec![
        Column::new("endpoint", "Endpoint", |e: &EndpointRow| (&e.endpoint).into()),
        Column::new("requests", "Requests", |e: &EndpointRow| e.requests.into()).width(10),
        Column::new("p50", "p50", |e: &EndpointRow| e.p50.into())
            .width(10)
            .render_with(|e| millis(e.p50)),
        Column::new("p95", "p95", |e: &EndpointRow| e.p95.into())
            .width(10)
            .render_with(|e| millis(e.p95)),
        Column::new("p99", "p99", |e: &EndpointRow| e.p99.into())
            .width(10)
            .render_with(|e| millis(e.p99)),
    ]
}

/// ECS tasks.
pub fn ecs_tasks() -> Vec<Column<EcsTask>> {
    vec![
        Column::new("task", "Task", |t: &EcsTask| short_name(&t.task_arn).into()),
        Column::new("status", "Status", |t: &EcsTask| (&t.status).into())
            .width(12)
            .render_with(|t| badge(&t.status)),
        Column::new("cluster", "Cluster", |t: &EcsTask| short_name(&t.cluster_arn).into()),
        Column::new("launch_type", "Launch Type", |t: &EcsTask| (&t.launch_type).into()).width(12),
        Column::new("cpu", "CPU", |t: &EcsTask| (&t.cpu).into()).width(6),
        Column::new("memory", "Memory", |t: &EcsTask| (&t.memory).into()).width(8),
    ]
}

/// Lambda functions.
pub fn lambda_functions() -> Vec<Column<LambdaFunction>> {
    vec![
        Column::new("name", "Name", |f: &LambdaFunction| (&f.name).into()),
        Column::new("runtime", "Runtime", |f: &LambdaFunction| (&f.runtime).into()).width(12),
        Column::new("state", "State", |f: &LambdaFunction| (&f.state).into())
            .width(10)
            .render_with(|f| badge(&f.state)),
        Column::new("memory", "Memory (MB)", |f: &LambdaFunction| f.memory_size.into()).width(12),
        Column::new("timeout", "Timeout (s)", |f: &LambdaFunction| f.timeout.into()).width(12),
        Column::new("modified", "Last Modified", |f: &LambdaFunction| (&f.last_modified).into()),
    ]
}

/// ECR repositories.
pub fn ecr_repositories() -> Vec<Column<EcrRepository>> {
    vec![
        Column::new("name", "Name", |r: &EcrRepository| (&r.name).into()),
        Column::new("uri", "URI", |r: &EcrRepository| (&r.uri).into()),
        Column::new("created", "Created", |r: &EcrRepository| r.created_at.into())
            .width(20)
            .render_with(|r| unix_seconds(r.created_at)),
    ]
}

/// S3 buckets.
pub fn s3_buckets() -> Vec<Column<S3Bucket>> {
    vec![
        Column::new("name", "Name", |b: &S3Bucket| (&b.name).into()),
        Column::new("created", "Created", |b: &S3Bucket| (&b.creation_date).into()),
    ]
}

/// CloudWatch log groups.
pub fn log_groups() -> Vec<Column<LogGroup>> {
    vec![
        Column::new("name", "Name", |g: &LogGroup| (&g.name).into()),
        Column::new("created", "Created", |g: &LogGroup| g.creation_time.into())
            .width(20)
            .render_with(|g| unix_millis(g.creation_time)),
        Column::new("retention", "Retention (days)", |g: &LogGroup| g.retention_in_days.into())
            .width(16)
            .render_with(|g| {
                if g.retention_in_days > 0 {
                    CellText::plain(g.retention_in_days.to_string())
                } else {
                    dim("never expires")
                }
            }),
        Column::new("stored", "Stored", |g: &LogGroup| g.stored_bytes.into())
            .width(10)
            .render_with(|g| CellText::plain(format_bytes(u64::try_from(g.stored_bytes).unwrap_or(0)))),
    ]
}

/// Cloud Run jobs.
pub fn cloudrun_jobs() -> Vec<Column<CloudRunJob>> {
    vec![
        Column::new("name", "Name", |j: &CloudRunJob| short_name(&j.name).into()),
        Column::new("created", "Created", |j: &CloudRunJob| (&j.create_time).into()),
        Column::new("executions", "Executions", |j: &CloudRunJob| j.execution_count.into()).width(10),
        Column::new("stage", "Launch Stage", |j: &CloudRunJob| (&j.launch_stage).into()).width(12),
    ]
}

/// Cloud Functions.
pub fn gcp_functions() -> Vec<Column<GcpFunction>> {
    vec![
        Column::new("name", "Name", |f: &GcpFunction| short_name(&f.name).into()),
        Column::new("state", "State", |f: &GcpFunction| (&f.state).into())
            .width(10)
            .render_with(|f| badge(&f.state)),
        Column::new("environment", "Environment", |f: &GcpFunction| (&f.environment).into()).width(12),
        Column::new("created", "Created", |f: &GcpFunction| (&f.create_time).into()),
    ]
}

/// Artifact Registry repositories.
pub fn ar_repositories() -> Vec<Column<ArRepository>> {
    vec![
        Column::new("name", "Name", |r: &ArRepository| short_name(&r.name).into()),
        Column::new("format", "Format", |r: &ArRepository| (&r.format).into()).width(8),
        Column::new("created", "Created", |r: &ArRepository| (&r.create_time).into()),
    ]
}

/// GCS buckets.
pub fn gcs_buckets() -> Vec<Column<GcsBucket>> {
    vec![
        Column::new("name", "Name", |b: &GcsBucket| (&b.name).into()),
        Column::new("location", "Location", |b: &GcsBucket| b.data_str("location").into()).width(12),
        Column::new("class", "Storage Class", |b: &GcsBucket| b.data_str("storageClass").into()).width(14),
        Column::new("created", "Created", |b: &GcsBucket| b.data_str("timeCreated").into()),
    ]
}

/// Cloud Logging entries.
pub fn log_entries() -> Vec<Column<LogEntry>> {
    vec![
        Column::new("timestamp", "Timestamp", |e: &LogEntry| (&e.timestamp).into()).width(24),
        Column::new("severity", "Severity", |e: &LogEntry| (&e.severity).into())
            .width(9)
            .render_with(|e| badge(&e.severity)),
        Column::new("log", "Log", |e: &LogEntry| short_name(&e.log_name).into()).width(20),
        Column::new("payload", "Payload", |e: &LogEntry| e.text_payload.as_deref().into()),
    ]
}

/// Azure ARM resources (jobs, sites, registries, storage accounts).
pub fn azure_resources() -> Vec<Column<AzureResource>> {
    vec![
        Column::new("name", "Name", |r: &AzureResource| (&r.name).into()),
        Column::new("location", "Location", |r: &AzureResource| (&r.location).into()).width(12),
        Column::new("kind", "Kind", |r: &AzureResource| r.kind.as_deref().into()),
        Column::new("id", "ID", |r: &AzureResource| (&r.id).into()),
    ]
}

fn monitor_field<'a>(row: &'a MonitorLogRow, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| row.get(*name)).map(String::as_str)
}

fn monitor_rest(row: &MonitorLogRow) -> String {
    row.iter()
        .filter(|(k, _)| !matches!(k.as_str(), "TimeGenerated" | "Level" | "Type"))
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Azure Monitor log rows: well-known fields plus the rest as `k=v`.
pub fn monitor_logs() -> Vec<Column<MonitorLogRow>> {
    vec![
        Column::new("time", "Time", |r: &MonitorLogRow| monitor_field(r, &["TimeGenerated"]).into()).width(24),
        Column::new("level", "Level", |r: &MonitorLogRow| monitor_field(r, &["Level"]).into())
            .width(9)
            .render_with(|r| monitor_field(r, &["Level"]).map_or_else(|| dim("-"), badge)),
        Column::new("table", "Table", |r: &MonitorLogRow| monitor_field(r, &["Type"]).into()).width(20),
        Column::new("fields", "Fields", |r: &MonitorLogRow| monitor_rest(r).into()).unsortable(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{visible_rows, SortDirection, SortState};
    use sockdash_api::LatencyStats;
    use std::collections::BTreeMap;

    fn resource(kind: &str, cleaned_up: bool, status: Option<&str>) -> ResourceEntry {
        ResourceEntry {
            container_id: "0123456789abcdef".to_string(),
            backend: "ecs".to_string(),
            resource_type: kind.to_string(),
            resource_id: format!("{kind}-1"),
            instance_id: "inst-1".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            cleaned_up,
            status: status.map(str::to_string),
            metadata: None,
        }
    }

    #[test]
    fn test_short_helpers() {
        assert_eq!(short_name("arn:aws:ecs:us-east-1:123:task/cluster/abc123"), "abc123");
        assert_eq!(short_name("plain"), "plain");
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_resource_status_fallbacks() {
        assert_eq!(resource_status(&resource("task", false, None)), "active");
        assert_eq!(resource_status(&resource("task", true, None)), "deleted");
        assert_eq!(resource_status(&resource("task", true, Some("orphaned"))), "orphaned");
    }

    #[test]
    fn test_resource_filter_matches_rendered_status() {
        let rows = vec![resource("task", false, None), resource("bucket", true, None)];
        let visible = visible_rows(&rows, &resources(), &SortState::unsorted(), "deleted");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].resource_type, "bucket");
    }

    #[test]
    fn test_endpoint_rows_merge_requests_and_latency() {
        let metrics = MetricsResponse {
            requests: BTreeMap::from([("GET /a".to_string(), 3), ("GET /b".to_string(), 9)]),
            latency_ms: BTreeMap::from([(
                "GET /a".to_string(),
                LatencyStats {
                    p50: 1.0,
                    p95: 2.0,
                    p99: 3.0,
                },
            )]),
            goroutines: 1,
            heap_alloc_mb: 1.0,
            uptime_seconds: None,
            containers: None,
            active_resources: None,
        };
        let rows = endpoint_rows(&metrics);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].p95, Some(2.0));
        assert_eq!(rows[1].p50, None);

        let sorted = visible_rows(&rows, &endpoints(), &SortState::by("requests", SortDirection::Descending), "");
        assert_eq!(sorted[0].endpoint, "GET /b");
    }

    #[test]
    fn test_log_group_renders_time_and_bytes() {
        let group = LogGroup {
            name: "/ecs/app".to_string(),
            creation_time: 1_700_000_000_000,
            retention_in_days: 0,
            stored_bytes: 2048,
        };
        let cols = log_groups();
        assert_eq!(cols[1].cell(&group).text, "2023-11-14 22:13:20");
        assert_eq!(cols[2].cell(&group).text, "never expires");
        assert_eq!(cols[3].cell(&group).text, "2.0 KiB");
    }

    #[test]
    fn test_monitor_rows_split_known_fields() {
        let row: MonitorLogRow = BTreeMap::from([
            ("TimeGenerated".to_string(), "2025-01-01T00:00:00Z".to_string()),
            ("Level".to_string(), "Error".to_string()),
            ("Message".to_string(), "boom".to_string()),
            ("Type".to_string(), "ContainerAppConsoleLogs".to_string()),
        ]);
        let cols = monitor_logs();
        assert_eq!(cols[1].cell(&row).text, "Error");
        assert_eq!(cols[2].cell(&row).text, "ContainerAppConsoleLogs");
        assert_eq!(cols[3].cell(&row).text, "Message=boom");
    }
}
