//! Dashboard definitions: the pages and routes for each target.

use sockdash_api::{ApiClient, Provider};
use sockdash_query::QueryClient;

use crate::app::App;
use crate::columns;
use crate::config::Target;
use crate::pages::{FrontendPage, ListPage, MetricsPage, OverviewPage, Page, ResourcesPage, SimOverviewPage};
use crate::queries;
use crate::router::{NavItem, Router};
use crate::table::{SortDirection, SortState};

/// Path of every dashboard's first page.
pub const HOME: &str = "/ui/";

#[derive(Default)]
struct Builder {
    nav: Vec<NavItem>,
    router: Router<usize>,
    pages: Vec<Box<dyn Page>>,
}

impl Builder {
    fn page(mut self, label: &str, path: &str, page: impl Page + 'static) -> Self {
        self.nav.push(NavItem::new(label, path));
        self.router = self.router.route(path, self.pages.len());
        self.pages.push(Box::new(page));
        self
    }

    fn build(self, target: Target) -> App {
        let mut app = App::new(target.title(), self.nav, self.router, self.pages);
        app.navigate(HOME);
        app
    }
}

/// Build the app for `target`, with every page reading through `cache`.
/// The home page is mounted, so this needs a tokio runtime.
#[must_use]
pub fn build(target: Target, api: &ApiClient, cache: &QueryClient) -> App {
    let builder = Builder::default();
    let builder = match (target, target.provider()) {
        (_, Some(provider)) => simulator(builder, provider, api, cache),
        (Target::Frontend, None) => builder.page("Overview", HOME, FrontendPage::new(cache, api)),
        (_, None) => backend(builder, api, cache),
    };
    builder.build(target)
}

fn simulator(builder: Builder, provider: Provider, api: &ApiClient, cache: &QueryClient) -> Builder {
    let builder = builder.page("Overview", HOME, SimOverviewPage::new(cache, api, provider));
    match provider {
        Provider::Aws => aws(builder, api, cache),
        Provider::Gcp => gcp(builder, api, cache),
        Provider::Azure => azure(builder, api, cache),
    }
}

fn backend(builder: Builder, api: &ApiClient, cache: &QueryClient) -> Builder {
    builder
        .page("Overview", HOME, OverviewPage::new(cache, api))
        .page(
            "Containers",
            "/ui/containers",
            ListPage::new("Containers", queries::containers(cache, api), columns::containers())
                .with_sort(SortState::by("name", SortDirection::Ascending)),
        )
        .page("Resources", "/ui/resources", ResourcesPage::new(cache, api))
        .page("Metrics", "/ui/metrics", MetricsPage::new(cache, api))
}

fn aws(builder: Builder, api: &ApiClient, cache: &QueryClient) -> Builder {
    builder
        .page(
            "ECS Tasks",
            "/ui/ecs",
            ListPage::new("ECS Tasks", queries::ecs_tasks(cache, api), columns::ecs_tasks()),
        )
        .page(
            "Lambda",
            "/ui/lambda",
            ListPage::new("Lambda Functions", queries::lambda_functions(cache, api), columns::lambda_functions()),
        )
        .page(
            "ECR",
            "/ui/ecr",
            ListPage::new("ECR Repositories", queries::ecr_repositories(cache, api), columns::ecr_repositories()),
        )
        .page(
            "S3",
            "/ui/s3",
            ListPage::new("S3 Buckets", queries::s3_buckets(cache, api), columns::s3_buckets()),
        )
        .page(
            "CloudWatch",
            "/ui/cloudwatch",
            ListPage::new("Log Groups", queries::cloudwatch_log_groups(cache, api), columns::log_groups()),
        )
}

fn gcp(builder: Builder, api: &ApiClient, cache: &QueryClient) -> Builder {
    builder
        .page(
            "Cloud Run Jobs",
            "/ui/cloudrun",
            ListPage::new("Cloud Run Jobs", queries::cloudrun_jobs(cache, api), columns::cloudrun_jobs()),
        )
        .page(
            "Functions",
            "/ui/functions",
            ListPage::new("Cloud Functions", queries::gcp_functions(cache, api), columns::gcp_functions()),
        )
        .page(
            "Artifact Registry",
            "/ui/ar",
            ListPage::new("Repositories", queries::ar_repositories(cache, api), columns::ar_repositories()),
        )
        .page(
            "GCS",
            "/ui/gcs",
            ListPage::new("GCS Buckets", queries::gcs_buckets(cache, api), columns::gcs_buckets()),
        )
        .page(
            "Logging",
            "/ui/logging",
            ListPage::new("Log Entries", queries::log_entries(cache, api), columns::log_entries())
                .with_sort(SortState::by("timestamp", SortDirection::Descending)),
        )
}

fn azure(builder: Builder, api: &ApiClient, cache: &QueryClient) -> Builder {
    builder
        .page(
            "Container Apps",
            "/ui/container-apps",
            ListPage::new("Container Apps Jobs", queries::container_app_jobs(cache, api), columns::azure_resources()),
        )
        .page(
            "Function Sites",
            "/ui/functions",
            ListPage::new("Function Sites", queries::function_sites(cache, api), columns::azure_resources()),
        )
        .page(
            "ACR",
            "/ui/acr",
            ListPage::new("Container Registries", queries::acr_registries(cache, api), columns::azure_resources()),
        )
        .page(
            "Storage",
            "/ui/storage",
            ListPage::new("Storage Accounts", queries::storage_accounts(cache, api), columns::azure_resources()),
        )
        .page(
            "Monitor Logs",
            "/ui/monitor",
            ListPage::new("Monitor Logs", queries::monitor_logs(cache, api), columns::monitor_logs())
                .with_sort(SortState::by("time", SortDirection::Descending)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::render;
    use crossterm::event::{KeyCode, KeyEvent};
    use test_case::test_case;

    fn api() -> ApiClient {
        // Nothing listens on the discard port; fetches fail fast.
        ApiClient::new("http://127.0.0.1:9").unwrap()
    }

    #[test_case(Target::Backend, &["Overview", "Containers", "Resources", "Metrics"] ; "backend")]
    #[test_case(Target::Frontend, &["Overview"] ; "frontend")]
    #[test_case(Target::Aws, &["Overview", "ECS Tasks", "Lambda", "ECR", "S3", "CloudWatch"] ; "aws")]
    #[test_case(Target::Gcp, &["Overview", "Cloud Run Jobs", "Functions", "Artifact Registry", "GCS", "Logging"] ; "gcp")]
    #[test_case(Target::Azure, &["Overview", "Container Apps", "Function Sites", "ACR", "Storage", "Monitor Logs"] ; "azure")]
    #[tokio::test]
    async fn test_dashboard_pages(target: Target, labels: &[&str]) {
        let cache = QueryClient::new();
        let app = build(target, &api(), &cache);

        let nav: Vec<&str> = app.nav().iter().map(|item| item.label.as_str()).collect();
        assert_eq!(nav, labels);
        assert_eq!(app.location(), HOME);
        assert!(app.is_page_mounted(0));
        assert_eq!(app.title, target.title());
    }

    #[tokio::test]
    async fn test_switching_pages_moves_the_mount() {
        let cache = QueryClient::new();
        let mut app = build(Target::Backend, &api(), &cache);

        app.handle_key(KeyEvent::from(KeyCode::Char('4')));
        assert_eq!(app.location(), "/ui/metrics");
        assert!(!app.is_page_mounted(0));
        assert!(app.is_page_mounted(3));

        app.handle_key(KeyEvent::from(KeyCode::Char('1')));
        assert!(app.is_page_mounted(0));
        assert!(!app.is_page_mounted(3));
    }

    #[test_case(Target::Aws, "AWS Simulator" ; "aws")]
    #[test_case(Target::Gcp, "GCP Simulator" ; "gcp")]
    #[test_case(Target::Azure, "Azure Simulator" ; "azure")]
    #[tokio::test]
    async fn test_simulator_overview_follows_target(target: Target, heading: &str) {
        let cache = QueryClient::new();
        let mut app = build(target, &api(), &cache);
        let page = app.current_page().unwrap();
        assert!(render(page, 100, 10).starts_with(heading));
    }

    #[tokio::test]
    async fn test_every_nav_path_resolves() {
        for target in [Target::Backend, Target::Frontend, Target::Aws, Target::Gcp, Target::Azure] {
            let cache = QueryClient::new();
            let mut app = build(target, &api(), &cache);
            let paths: Vec<String> = app.nav().iter().map(|item| item.path.clone()).collect();
            for path in paths {
                app.navigate(&path);
                assert!(app.current_page().is_some(), "{target}: {path}");
            }
        }
    }
}
