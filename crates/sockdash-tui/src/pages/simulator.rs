//! Simulator overview: resource counts per emulated service.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};
use sockdash_api::sim::SimSummary;
use sockdash_api::{ApiClient, Provider};
use sockdash_query::{PollHandle, Query, QueryClient};

use super::{card_row, draw_state, header_line, spawn_refetch, stale_note, DrawContext, Page};
use crate::error::TuiResult;
use crate::queries;
use crate::widgets::{MetricsCard, RefreshButton};

const CARDS_PER_ROW: usize = 4;

/// Counts of simulated resources, one card per service.
pub struct SimOverviewPage {
    provider: Provider,
    summary: Query<SimSummary>,
    poll: Option<PollHandle>,
}

impl std::fmt::Debug for SimOverviewPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimOverviewPage")
            .field("provider", &self.provider)
            .field("mounted", &self.poll.is_some())
            .finish_non_exhaustive()
    }
}

impl SimOverviewPage {
    /// Overview of the `provider` simulator behind `api`.
    #[must_use]
    pub fn new(cache: &QueryClient, api: &ApiClient, provider: Provider) -> Self {
        Self {
            provider,
            summary: queries::sim_summary(cache, api),
            poll: None,
        }
    }
}

fn draw_summary(frame: &mut Frame, area: Rect, summary: &SimSummary) {
    let total: u64 = summary.services.values().sum();
    let mut cards: Vec<MetricsCard<'_>> = vec![MetricsCard::new("Total", total).color(Color::Green)];
    cards.extend(
        summary
            .services
            .iter()
            .map(|(service, count)| MetricsCard::new(service.as_str(), count)),
    );

    let rows: Vec<Vec<MetricsCard<'_>>> = cards
        .chunks(CARDS_PER_ROW)
        .map(<[MetricsCard<'_>]>::to_vec)
        .collect();
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows.iter().map(|_| Constraint::Length(3)).chain(std::iter::once(Constraint::Min(0))))
        .split(area);
    for (mut row, rect) in rows.into_iter().zip(areas.iter()) {
        // Pad the last row so every card keeps the same width.
        while row.len() < CARDS_PER_ROW {
            row.push(MetricsCard::new("", ""));
        }
        card_row(frame, *rect, row);
    }
}

impl Page for SimOverviewPage {
    fn title(&self) -> &str {
        "Overview"
    }

    fn mount(&mut self) {
        self.poll = Some(self.summary.poll());
    }

    fn unmount(&mut self) {
        self.poll = None;
    }

    fn is_mounted(&self) -> bool {
        self.poll.is_some()
    }

    fn refresh(&mut self) -> bool {
        let pressed = RefreshButton::new(self.summary.state().is_fetching).press();
        if pressed {
            spawn_refetch(&self.summary);
        }
        pressed
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &DrawContext) -> TuiResult<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let state = self.summary.state();
        let title = format!("{} Simulator", self.provider.display_name());
        let mut header = header_line(&title, RefreshButton::new(state.is_fetching), stale_note(&state));
        if let Some(summary) = state.data() {
            if summary.provider != self.provider.to_string() {
                header.spans.push(Span::raw("  "));
                header.spans.push(Span::styled(
                    format!("⚠ simulator reports provider '{}'", summary.provider),
                    Style::default().fg(Color::Yellow),
                ));
            }
        }
        frame.render_widget(Paragraph::new(header), chunks[0]);

        draw_state(frame, chunks[1], "Summary", &state, ctx, draw_summary);
        Ok(())
    }
}
