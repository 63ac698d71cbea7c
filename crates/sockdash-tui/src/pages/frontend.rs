//! Docker API frontend overview.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use sockdash_api::{ApiClient, FrontendMetrics, FrontendStatus, HealthResponse};
use sockdash_query::{PollHandle, Query, QueryClient};

use super::{any_fetching, card_row, draw_state, header_line, spawn_refetch, stale_note, DrawContext, Page};
use crate::error::TuiResult;
use crate::queries;
use crate::widgets::{format_uptime, status_badge, MetricsCard, RefreshButton};

/// Frontend status, configuration and runtime metrics.
pub struct FrontendPage {
    health: Query<HealthResponse>,
    status: Query<FrontendStatus>,
    metrics: Query<FrontendMetrics>,
    polls: Vec<PollHandle>,
}

impl std::fmt::Debug for FrontendPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontendPage")
            .field("mounted", &!self.polls.is_empty())
            .finish_non_exhaustive()
    }
}

impl FrontendPage {
    /// Frontend overview bound to `api`.
    #[must_use]
    pub fn new(cache: &QueryClient, api: &ApiClient) -> Self {
        Self {
            health: queries::frontend_health(cache, api),
            status: queries::frontend_status(cache, api),
            metrics: queries::frontend_metrics(cache, api),
            polls: Vec::new(),
        }
    }
}

fn config_lines(status: &FrontendStatus) -> Vec<Line<'static>> {
    let label = |text: &str| Span::styled(format!("{text:<16}"), Style::default().fg(Color::DarkGray));
    vec![
        Line::from(vec![label("Status"), status_badge(&status.status)]),
        Line::from(vec![label("Component"), Span::raw(status.component.clone())]),
        Line::from(vec![label("Docker address"), Span::raw(status.docker_addr.clone())]),
        Line::from(vec![label("Backend address"), Span::raw(status.backend_addr.clone())]),
        Line::from(vec![label("Uptime"), Span::raw(format_uptime(status.uptime_seconds))]),
    ]
}

impl Page for FrontendPage {
    fn title(&self) -> &str {
        "Overview"
    }

    fn mount(&mut self) {
        self.polls = vec![self.health.poll(), self.status.poll(), self.metrics.poll()];
    }

    fn unmount(&mut self) {
        self.polls.clear();
    }

    fn is_mounted(&self) -> bool {
        !self.polls.is_empty()
    }

    fn refresh(&mut self) -> bool {
        let fetching = any_fetching(&[
            self.health.state().is_fetching,
            self.status.state().is_fetching,
            self.metrics.state().is_fetching,
        ]);
        if !RefreshButton::new(fetching).press() {
            return false;
        }
        spawn_refetch(&self.health);
        spawn_refetch(&self.status);
        spawn_refetch(&self.metrics);
        true
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &DrawContext) -> TuiResult<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let health = self.health.state();
        let status = self.status.state();
        let metrics = self.metrics.state();

        let fetching = any_fetching(&[health.is_fetching, status.is_fetching, metrics.is_fetching]);
        let note = stale_note(&status).or_else(|| {
            health.error.as_ref().map(|_| {
                Span::styled("● health check failed", Style::default().fg(Color::Red))
            })
        });
        frame.render_widget(
            Paragraph::new(header_line("Frontend", RefreshButton::new(fetching), note)),
            chunks[0],
        );

        draw_state(frame, chunks[1], "Metrics", &metrics, ctx, |frame, area, m| {
            card_row(
                frame,
                area,
                vec![
                    MetricsCard::new("Docker Requests", m.docker_requests),
                    MetricsCard::new("Goroutines", m.goroutines),
                    MetricsCard::new("Heap", format!("{:.1} MB", m.heap_alloc_mb)),
                    MetricsCard::new("Uptime", format_uptime(m.uptime_seconds)),
                ],
            );
        });

        draw_state(frame, chunks[2], "Configuration", &status, ctx, |frame, area, s| {
            let block = Block::default().borders(Borders::ALL).title(" Configuration ");
            frame.render_widget(Paragraph::new(config_lines(s)).block(block), area);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::render;
    use sockdash_query::QueryKey;

    #[test]
    fn test_renders_config_and_metrics() {
        let cache = QueryClient::new();
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        cache
            .set_data(
                &QueryKey::new("frontend-status"),
                FrontendStatus {
                    status: "ok".to_string(),
                    component: "frontend".to_string(),
                    docker_addr: "tcp://0.0.0.0:2375".to_string(),
                    backend_addr: "http://backend:9100".to_string(),
                    uptime_seconds: 7_620,
                },
            )
            .unwrap();
        cache
            .set_data(
                &QueryKey::new("frontend-metrics"),
                FrontendMetrics {
                    component: "frontend".to_string(),
                    uptime_seconds: 7_620,
                    docker_requests: 314,
                    goroutines: 9,
                    heap_alloc_mb: 2.25,
                },
            )
            .unwrap();
        let mut page = FrontendPage::new(&cache, &api);

        let screen = render(&mut page, 100, 14);
        assert!(screen.contains("tcp://0.0.0.0:2375"));
        assert!(screen.contains("http://backend:9100"));
        assert!(screen.contains("314"));
        assert!(screen.contains("2h 7m"));
    }
}
