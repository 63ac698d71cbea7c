//! Query bindings for every endpoint the dashboards poll.
//!
//! Each function binds one [`ApiClient`] call to a cache key and a refetch
//! interval. Keys carry their parameters, so `resources(active=true)` and
//! `resources(active=false)` are cached separately.

use std::future::Future;
use std::time::Duration;

use sockdash_api::sim::{
    ArRepository, AzureResource, CloudRunJob, EcrRepository, EcsTask, GcpFunction, GcsBucket, LambdaFunction,
    LogEntry, LogGroup, MonitorLogRow, S3Bucket, SimSummary,
};
use sockdash_api::{
    ApiClient, ApiResult, BackendInfo, CheckResponse, ContainerSummary, FrontendMetrics, FrontendStatus,
    HealthResponse, MetricsResponse, ResourceEntry, StatusResponse,
};
use sockdash_query::{Query, QueryClient, QueryKey, QueryOptions};

/// Status, containers, metrics, resources and simulator lists.
pub const FAST_REFETCH: Duration = Duration::from_secs(5);
/// Health probes and the simulator summary.
pub const HEALTH_REFETCH: Duration = Duration::from_secs(10);
/// Backend self-checks.
pub const CHECK_REFETCH: Duration = Duration::from_secs(30);

fn bind<T, F, Fut>(cache: &QueryClient, api: &ApiClient, key: QueryKey, options: QueryOptions, call: F) -> Query<T>
where
    T: Send + Sync + 'static,
    F: Fn(ApiClient) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    let api = api.clone();
    Query::new(cache, key, options, move || call(api.clone()))
}

fn every(interval: Duration) -> QueryOptions {
    QueryOptions::poll_every(interval)
}

/// Backend health probe.
pub fn health(cache: &QueryClient, api: &ApiClient) -> Query<HealthResponse> {
    bind(cache, api, QueryKey::new("health"), every(HEALTH_REFETCH), |api| async move {
        api.health().await
    })
}

/// Backend status summary.
pub fn status(cache: &QueryClient, api: &ApiClient) -> Query<StatusResponse> {
    bind(cache, api, QueryKey::new("status"), every(FAST_REFETCH), |api| async move {
        api.status().await
    })
}

/// Containers known to the backend.
pub fn containers(cache: &QueryClient, api: &ApiClient) -> Query<Vec<ContainerSummary>> {
    bind(cache, api, QueryKey::new("containers"), every(FAST_REFETCH), |api| async move {
        api.containers().await
    })
}

/// Request and runtime metrics.
pub fn metrics(cache: &QueryClient, api: &ApiClient) -> Query<MetricsResponse> {
    bind(cache, api, QueryKey::new("metrics"), every(FAST_REFETCH), |api| async move {
        api.metrics().await
    })
}

/// Tracked cloud resources; `active` limits to resources not yet cleaned up.
pub fn resources(cache: &QueryClient, api: &ApiClient, active: bool) -> Query<Vec<ResourceEntry>> {
    let key = QueryKey::new("resources").param("active", active);
    bind(cache, api, key, every(FAST_REFETCH), move |api| async move {
        api.resources(active).await
    })
}

/// Backend self-checks.
pub fn check(cache: &QueryClient, api: &ApiClient) -> Query<CheckResponse> {
    bind(cache, api, QueryKey::new("check"), every(CHECK_REFETCH), |api| async move {
        api.check().await
    })
}

/// Docker-style system info, fetched once.
pub fn info(cache: &QueryClient, api: &ApiClient) -> Query<BackendInfo> {
    bind(cache, api, QueryKey::new("info"), QueryOptions::fetch_once(), |api| async move {
        api.info().await
    })
}

/// Frontend health probe.
pub fn frontend_health(cache: &QueryClient, api: &ApiClient) -> Query<HealthResponse> {
    bind(cache, api, QueryKey::new("frontend-health"), every(HEALTH_REFETCH), |api| async move {
        api.frontend_health().await
    })
}

/// Frontend status.
pub fn frontend_status(cache: &QueryClient, api: &ApiClient) -> Query<FrontendStatus> {
    bind(cache, api, QueryKey::new("frontend-status"), every(FAST_REFETCH), |api| async move {
        api.frontend_status().await
    })
}

/// Frontend metrics.
pub fn frontend_metrics(cache: &QueryClient, api: &ApiClient) -> Query<FrontendMetrics> {
    bind(cache, api, QueryKey::new("frontend-metrics"), every(FAST_REFETCH), |api| async move {
        api.frontend_metrics().await
    })
}

/// Simulator service counts.
pub fn sim_summary(cache: &QueryClient, api: &ApiClient) -> Query<SimSummary> {
    bind(cache, api, QueryKey::new("sim-summary"), every(HEALTH_REFETCH), |api| async move {
        api.sim_summary().await
    })
}

fn sim_key(service: &str) -> QueryKey {
    QueryKey::new("sim").param("service", service)
}

/// ECS tasks.
pub fn ecs_tasks(cache: &QueryClient, api: &ApiClient) -> Query<Vec<EcsTask>> {
    bind(cache, api, sim_key("ecs-tasks"), every(FAST_REFETCH), |api| async move {
        api.ecs_tasks().await
    })
}

/// Lambda functions.
pub fn lambda_functions(cache: &QueryClient, api: &ApiClient) -> Query<Vec<LambdaFunction>> {
    bind(cache, api, sim_key("lambda-functions"), every(FAST_REFETCH), |api| async move {
        api.lambda_functions().await
    })
}

/// ECR repositories.
pub fn ecr_repositories(cache: &QueryClient, api: &ApiClient) -> Query<Vec<EcrRepository>> {
    bind(cache, api, sim_key("ecr-repositories"), every(FAST_REFETCH), |api| async move {
        api.ecr_repositories().await
    })
}

/// S3 buckets.
pub fn s3_buckets(cache: &QueryClient, api: &ApiClient) -> Query<Vec<S3Bucket>> {
    bind(cache, api, sim_key("s3-buckets"), every(FAST_REFETCH), |api| async move {
        api.s3_buckets().await
    })
}

/// CloudWatch log groups.
pub fn cloudwatch_log_groups(cache: &QueryClient, api: &ApiClient) -> Query<Vec<LogGroup>> {
    bind(cache, api, sim_key("cloudwatch-log-groups"), every(FAST_REFETCH), |api| async move {
        api.cloudwatch_log_groups().await
    })
}

/// Cloud Run jobs.
pub fn cloudrun_jobs(cache: &QueryClient, api: &ApiClient) -> Query<Vec<CloudRunJob>> {
    bind(cache, api, sim_key("cloudrun-jobs"), every(FAST_REFETCH), |api| async move {
        api.cloudrun_jobs().await
    })
}

/// Cloud Functions.
pub fn gcp_functions(cache: &QueryClient, api: &ApiClient) -> Query<Vec<GcpFunction>> {
    bind(cache, api, sim_key("gcp-functions"), every(FAST_REFETCH), |api| async move {
        api.gcp_functions().await
    })
}

/// Artifact Registry repositories.
pub fn ar_repositories(cache: &QueryClient, api: &ApiClient) -> Query<Vec<ArRepository>> {
    bind(cache, api, sim_key("ar-repositories"), every(FAST_REFETCH), |api| async move {
        api.ar_repositories().await
    })
}

/// GCS buckets.
pub fn gcs_buckets(cache: &QueryClient, api: &ApiClient) -> Query<Vec<GcsBucket>> {
    bind(cache, api, sim_key("gcs-buckets"), every(FAST_REFETCH), |api| async move {
        api.gcs_buckets().await
    })
}

/// Cloud Logging entries.
pub fn log_entries(cache: &QueryClient, api: &ApiClient) -> Query<Vec<LogEntry>> {
    bind(cache, api, sim_key("log-entries"), every(FAST_REFETCH), |api| async move {
        api.log_entries().await
    })
}

/// Container Apps jobs.
pub fn container_app_jobs(cache: &QueryClient, api: &ApiClient) -> Query<Vec<AzureResource>> {
    bind(cache, api, sim_key("container-app-jobs"), every(FAST_REFETCH), |api| async move {
        api.container_app_jobs().await
    })
}

/// Function App sites.
pub fn function_sites(cache: &QueryClient, api: &ApiClient) -> Query<Vec<AzureResource>> {
    bind(cache, api, sim_key("function-sites"), every(FAST_REFETCH), |api| async move {
        api.function_sites().await
    })
}

/// Container registries.
pub fn acr_registries(cache: &QueryClient, api: &ApiClient) -> Query<Vec<AzureResource>> {
    bind(cache, api, sim_key("acr-registries"), every(FAST_REFETCH), |api| async move {
        api.acr_registries().await
    })
}

/// Storage accounts.
pub fn storage_accounts(cache: &QueryClient, api: &ApiClient) -> Query<Vec<AzureResource>> {
    bind(cache, api, sim_key("storage-accounts"), every(FAST_REFETCH), |api| async move {
        api.storage_accounts().await
    })
}

/// Azure Monitor log rows.
pub fn monitor_logs(cache: &QueryClient, api: &ApiClient) -> Query<Vec<MonitorLogRow>> {
    bind(cache, api, sim_key("monitor-logs"), every(FAST_REFETCH), |api| async move {
        api.monitor_logs().await
    })
}
