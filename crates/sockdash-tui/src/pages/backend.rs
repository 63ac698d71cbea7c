//! Backend dashboard pages.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use sockdash_api::{
    ApiClient, BackendInfo, CheckResponse, CheckResult, HealthResponse, MetricsResponse, ResourceEntry,
    StatusResponse,
};
use sockdash_query::{PollHandle, Query, QueryClient, QueryState};

use super::{any_fetching, card_row, draw_state, header_line, spawn_refetch, stale_note, DrawContext, Page};
use crate::columns::{self, endpoint_rows, EndpointRow};
use crate::error::TuiResult;
use crate::queries;
use crate::table::{DataTable, SortDirection, SortState};
use crate::widgets::{format_bytes, format_uptime, status_badge, status_style, MetricsCard, RefreshButton};

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<16}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value.into()),
    ])
}

fn health_note(state: &QueryState<HealthResponse>) -> Option<Span<'static>> {
    match (state.data(), &state.error) {
        (Some(health), _) => Some(Span::styled(
            format!("● {}  up {}", health.status, format_uptime(health.uptime_seconds)),
            status_style(&health.status),
        )),
        (None, Some(_)) => Some(Span::styled("● health check failed", Style::default().fg(Color::Red))),
        (None, None) => None,
    }
}

/// Backend overview: status cards, instance details, system info, checks.
pub struct OverviewPage {
    status: Query<StatusResponse>,
    health: Query<HealthResponse>,
    info: Query<BackendInfo>,
    check: Query<CheckResponse>,
    checks: DataTable<CheckResult>,
    polls: Vec<PollHandle>,
}

impl std::fmt::Debug for OverviewPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverviewPage")
            .field("mounted", &!self.polls.is_empty())
            .finish_non_exhaustive()
    }
}

impl OverviewPage {
    /// Overview bound to `api` through `cache`.
    #[must_use]
    pub fn new(cache: &QueryClient, api: &ApiClient) -> Self {
        Self {
            status: queries::status(cache, api),
            health: queries::health(cache, api),
            info: queries::info(cache, api),
            check: queries::check(cache, api),
            checks: DataTable::new("Health Checks", columns::checks()).with_empty_message("No checks reported"),
            polls: Vec::new(),
        }
    }

    fn draw_cards(frame: &mut Frame, area: Rect, status: &StatusResponse) {
        card_row(
            frame,
            area,
            vec![
                MetricsCard::new("Containers", status.containers),
                MetricsCard::new("Active Resources", status.active_resources),
                MetricsCard::new("Uptime", format_uptime(status.uptime_seconds)),
                MetricsCard::new("Backend", &status.backend_type),
            ],
        );
    }

    fn draw_instance(frame: &mut Frame, area: Rect, status: &StatusResponse) {
        let lines = vec![
            field("Instance ID", status.instance_id.clone()),
            field("Context", status.context.clone()),
            field("Component", status.component.clone()),
            Line::from(vec![
                Span::styled(format!("{:<16}", "Status"), Style::default().fg(Color::DarkGray)),
                status_badge(&status.status),
            ]),
        ];
        let block = Block::default().borders(Borders::ALL).title(" Instance ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_system(frame: &mut Frame, area: Rect, info: &BackendInfo) {
        let lines = vec![
            field("Name", info.name.clone()),
            field("Server Version", info.server_version.clone()),
            field("OS", format!("{} ({})", info.operating_system, info.os_type)),
            field("Architecture", info.architecture.clone()),
            field("CPUs", info.ncpu.to_string()),
            field("Memory", format_bytes(info.mem_total)),
            field("Driver", info.driver.clone()),
            field("Images", info.images.to_string()),
            field(
                "Containers",
                format!(
                    "{} ({} running, {} stopped)",
                    info.containers, info.containers_running, info.containers_stopped
                ),
            ),
        ];
        let block = Block::default().borders(Borders::ALL).title(" System ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Page for OverviewPage {
    fn title(&self) -> &str {
        "Overview"
    }

    fn mount(&mut self) {
        self.polls = vec![self.status.poll(), self.health.poll(), self.info.poll(), self.check.poll()];
    }

    fn unmount(&mut self) {
        self.polls.clear();
    }

    fn is_mounted(&self) -> bool {
        !self.polls.is_empty()
    }

    fn refresh(&mut self) -> bool {
        let fetching = any_fetching(&[
            self.status.state().is_fetching,
            self.health.state().is_fetching,
            self.info.state().is_fetching,
            self.check.state().is_fetching,
        ]);
        if !RefreshButton::new(fetching).press() {
            return false;
        }
        spawn_refetch(&self.status);
        spawn_refetch(&self.health);
        spawn_refetch(&self.info);
        spawn_refetch(&self.check);
        true
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let state = self.check.state();
        let rows = state.data().map_or(&[][..], |c| c.checks.as_slice());
        self.checks.handle_key(key, rows)
    }

    fn handle_click(&mut self, x: u16, y: u16) -> bool {
        let state = self.check.state();
        let rows = state.data().map_or(&[][..], |c| c.checks.as_slice());
        self.checks.handle_click(x, y, rows)
    }

    fn captures_input(&self) -> bool {
        self.checks.is_editing()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &DrawContext) -> TuiResult<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(body[0]);

        let status = self.status.state();
        let health = self.health.state();
        let info = self.info.state();
        let check = self.check.state();

        let fetching = any_fetching(&[status.is_fetching, health.is_fetching, check.is_fetching]);
        let note = stale_note(&status).or_else(|| health_note(&health));
        frame.render_widget(
            Paragraph::new(header_line("Overview", RefreshButton::new(fetching), note)),
            chunks[0],
        );

        draw_state(frame, chunks[1], "Status", &status, ctx, Self::draw_cards);
        draw_state(frame, left[0], "Instance", &status, ctx, Self::draw_instance);
        draw_state(frame, left[1], "System", &info, ctx, Self::draw_system);
        let checks = &mut self.checks;
        draw_state(frame, body[1], "Health Checks", &check, ctx, |frame, area, response| {
            checks.render(frame, area, &response.checks, ctx.focused);
        });
        Ok(())
    }
}

/// Cloud resources, toggling between active-only and all.
pub struct ResourcesPage {
    active: Query<Vec<ResourceEntry>>,
    all: Query<Vec<ResourceEntry>>,
    active_only: bool,
    table: DataTable<ResourceEntry>,
    poll: Option<PollHandle>,
}

impl std::fmt::Debug for ResourcesPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcesPage")
            .field("active_only", &self.active_only)
            .field("mounted", &self.poll.is_some())
            .finish_non_exhaustive()
    }
}

impl ResourcesPage {
    /// Resources page bound to `api`, starting with active resources only.
    #[must_use]
    pub fn new(cache: &QueryClient, api: &ApiClient) -> Self {
        Self {
            active: queries::resources(cache, api, true),
            all: queries::resources(cache, api, false),
            active_only: true,
            table: DataTable::new("Resources", columns::resources()).with_empty_message("No resources tracked"),
            poll: None,
        }
    }

    /// Whether only active resources are shown.
    #[must_use]
    pub const fn active_only(&self) -> bool {
        self.active_only
    }

    fn current(&self) -> &Query<Vec<ResourceEntry>> {
        if self.active_only {
            &self.active
        } else {
            &self.all
        }
    }

    /// Switch between active-only and all resources.
    pub fn toggle_active(&mut self) {
        self.active_only = !self.active_only;
        if self.poll.is_some() {
            self.poll = Some(self.current().poll());
        }
    }
}

impl Page for ResourcesPage {
    fn title(&self) -> &str {
        "Resources"
    }

    fn mount(&mut self) {
        self.poll = Some(self.current().poll());
    }

    fn unmount(&mut self) {
        self.poll = None;
    }

    fn is_mounted(&self) -> bool {
        self.poll.is_some()
    }

    fn refresh(&mut self) -> bool {
        let query = self.current();
        let pressed = RefreshButton::new(query.state().is_fetching).press();
        if pressed {
            spawn_refetch(query);
        }
        pressed
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('a') {
            self.toggle_active();
            return true;
        }
        let state = self.current().state();
        let rows = state.data().map_or(&[][..], Vec::as_slice);
        self.table.handle_key(key, rows)
    }

    fn handle_click(&mut self, x: u16, y: u16) -> bool {
        let state = self.current().state();
        let rows = state.data().map_or(&[][..], Vec::as_slice);
        self.table.handle_click(x, y, rows)
    }

    fn captures_input(&self) -> bool {
        self.table.is_editing()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &DrawContext) -> TuiResult<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let state = self.current().state();
        let scope = if self.active_only {
            Span::styled("[a] active only", Style::default().fg(Color::Green))
        } else {
            Span::styled("[a] all resources", Style::default().fg(Color::Yellow))
        };
        let mut header = header_line("Resources", RefreshButton::new(state.is_fetching), stale_note(&state));
        header.spans.push(Span::raw("  "));
        header.spans.push(scope);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        let table = &mut self.table;
        draw_state(frame, chunks[1], "Resources", &state, ctx, |frame, area, rows| {
            table.render(frame, area, rows, ctx.focused);
        });
        Ok(())
    }
}

/// Request counts, latency percentiles and runtime metrics.
pub struct MetricsPage {
    metrics: Query<MetricsResponse>,
    status: Query<StatusResponse>,
    table: DataTable<EndpointRow>,
    polls: Vec<PollHandle>,
}

impl std::fmt::Debug for MetricsPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsPage")
            .field("mounted", &!self.polls.is_empty())
            .finish_non_exhaustive()
    }
}

/// Count card value: the status endpoint's figure, else the one metrics reported.
fn count(status: Option<u64>, reported: Option<u64>) -> String {
    status.or(reported).map_or_else(|| "-".to_string(), |n| n.to_string())
}

impl MetricsPage {
    /// Metrics page bound to `api`, endpoints sorted by request count.
    #[must_use]
    pub fn new(cache: &QueryClient, api: &ApiClient) -> Self {
        Self {
            metrics: queries::metrics(cache, api),
            status: queries::status(cache, api),
            table: DataTable::new("Endpoints", columns::endpoints())
                .with_sort(SortState::by("requests", SortDirection::Descending))
                .with_empty_message("No requests recorded"),
            polls: Vec::new(),
        }
    }

    fn rows(&self) -> Vec<EndpointRow> {
        self.metrics.state().data().map(endpoint_rows).unwrap_or_default()
    }
}

impl Page for MetricsPage {
    fn title(&self) -> &str {
        "Metrics"
    }

    fn mount(&mut self) {
        self.polls = vec![self.metrics.poll(), self.status.poll()];
    }

    fn unmount(&mut self) {
        self.polls.clear();
    }

    fn is_mounted(&self) -> bool {
        !self.polls.is_empty()
    }

    fn refresh(&mut self) -> bool {
        let fetching = any_fetching(&[self.metrics.state().is_fetching, self.status.state().is_fetching]);
        if !RefreshButton::new(fetching).press() {
            return false;
        }
        spawn_refetch(&self.metrics);
        spawn_refetch(&self.status);
        true
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let rows = self.rows();
        self.table.handle_key(key, &rows)
    }

    fn handle_click(&mut self, x: u16, y: u16) -> bool {
        let rows = self.rows();
        self.table.handle_click(x, y, &rows)
    }

    fn captures_input(&self) -> bool {
        self.table.is_editing()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &DrawContext) -> TuiResult<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let state = self.metrics.state();
        let status = self.status.state();
        let fetching = any_fetching(&[state.is_fetching, status.is_fetching]);
        frame.render_widget(
            Paragraph::new(header_line("Metrics", RefreshButton::new(fetching), stale_note(&state))),
            chunks[0],
        );

        let counts = status.data();
        draw_state(frame, chunks[1], "Runtime", &state, ctx, |frame, area, metrics| {
            let total: u64 = metrics.requests.values().sum();
            card_row(
                frame,
                area,
                vec![
                    MetricsCard::new("Requests", total),
                    MetricsCard::new("Goroutines", metrics.goroutines),
                    MetricsCard::new("Heap", format!("{:.1} MB", metrics.heap_alloc_mb)),
                    MetricsCard::new("Containers", count(counts.map(|s| s.containers), metrics.containers)),
                    MetricsCard::new(
                        "Active Resources",
                        count(counts.map(|s| s.active_resources), metrics.active_resources),
                    ),
                    MetricsCard::new("Uptime", metrics.uptime_seconds.map_or_else(|| "-".to_string(), format_uptime)),
                ],
            );
        });

        let table = &mut self.table;
        draw_state(frame, chunks[2], "Endpoints", &state, ctx, |frame, area, metrics| {
            table.render(frame, area, &endpoint_rows(metrics), ctx.focused);
        });
        Ok(())
    }
}
