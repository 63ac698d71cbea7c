//! Snapshot commands against a local axum stub backend.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use sockdash_api::ApiClient;
use sockdash_tui::cli::ViewArgs;
use sockdash_tui::snapshot;
use sockdash_tui::TuiError;

async fn serve(router: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    ApiClient::new(format!("http://{addr}")).unwrap()
}

fn route(body: Value) -> axum::routing::MethodRouter {
    get(move || async move { Json(body) })
}

fn resources(cleaned: bool) -> Value {
    let active = json!([
        {
            "containerId": "c1a2b3c4d5e6f7a8", "backend": "ecs", "resourceType": "task",
            "resourceId": "arn:task/alpha", "instanceId": "i-1", "createdAt": "2025-03-01T10:00:00Z",
            "cleanedUp": false
        },
        {
            "containerId": "d9e8f7a6b5c4d3e2", "backend": "ecs", "resourceType": "service",
            "resourceId": "arn:service/beta", "instanceId": "i-1", "createdAt": "2025-03-01T11:00:00Z",
            "cleanedUp": false
        }
    ]);
    if !cleaned {
        return active;
    }
    let mut all = active.as_array().cloned().unwrap_or_default();
    all.push(json!({
        "containerId": "0011223344556677", "backend": "lambda", "resourceType": "function",
        "resourceId": "fn-gamma", "instanceId": "i-1", "createdAt": "2025-02-01T09:00:00Z",
        "cleanedUp": true
    }));
    Value::Array(all)
}

async fn backend() -> ApiClient {
    let router = Router::new()
        .route(
            "/internal/v1/healthz",
            route(json!({ "status": "ok", "component": "backend", "uptime_seconds": 185 })),
        )
        .route(
            "/internal/v1/status",
            route(json!({
                "status": "ok", "component": "backend", "backend_type": "ecs", "instance_id": "i-1",
                "uptime_seconds": 185, "containers": 2, "active_resources": 2, "context": "dev"
            })),
        )
        .route(
            "/internal/v1/containers/summary",
            route(json!([
                { "id": "aaaaaaaaaaaaaaaa", "name": "web", "image": "nginx", "state": "running", "created": "2025-03-01" },
                { "id": "bbbbbbbbbbbbbbbb", "name": "db", "image": "postgres", "state": "exited", "created": "2025-03-02" }
            ])),
        )
        .route(
            "/internal/v1/resources",
            get(|axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                Json(resources(query.as_deref() == Some("active=false")))
            }),
        );
    serve(router).await
}

fn view(filter: Option<&str>, sort: Option<&str>) -> ViewArgs {
    ViewArgs {
        filter: filter.map(str::to_string),
        sort: sort.map(str::to_string),
    }
}

#[tokio::test]
async fn status_prints_health_and_counts() {
    let api = backend().await;
    let mut out = Vec::new();
    snapshot::print_status(&api, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Backend (http://127.0.0.1:"));
    assert!(text.contains("UP (uptime: 3m 5s)"));
    assert!(text.contains("  Backend type: ecs\n"));
    assert!(text.contains("  Containers: 2\n"));
    assert!(text.contains("  Active resources: 2\n"));
}

#[tokio::test]
async fn status_reports_unreachable_backend_as_down() {
    let api = ApiClient::new("http://127.0.0.1:9").unwrap();
    let mut out = Vec::new();
    snapshot::print_status(&api, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Backend (http://127.0.0.1:9): DOWN"));
}

#[tokio::test]
async fn containers_sorted_by_name() {
    let api = backend().await;
    let mut out = Vec::new();
    snapshot::print_containers(&api, &view(None, Some("name")), &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ID"));
    assert!(lines[0].contains("NAME ↑"));
    assert!(lines[1].contains("db"));
    assert!(lines[2].contains("web"));
}

#[tokio::test]
async fn resources_active_only_by_default() {
    let api = backend().await;
    let mut out = Vec::new();
    snapshot::print_resources(&api, false, &view(None, None), &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("arn:task/alpha"));
    assert!(text.contains("arn:service/beta"));
    assert!(!text.contains("fn-gamma"));
}

#[tokio::test]
async fn resources_all_with_filter() {
    let api = backend().await;
    let mut out = Vec::new();
    snapshot::print_resources(&api, true, &view(Some("LAMBDA"), None), &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("fn-gamma"));
    assert!(text.contains("deleted"));
}

#[tokio::test]
async fn resources_unknown_sort_column_fails() {
    let api = backend().await;
    let mut out = Vec::new();
    let err = snapshot::print_resources(&api, false, &view(None, Some("size")), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, TuiError::UnknownColumn { ref column, .. } if column == "size"));
    assert!(out.is_empty());
}
