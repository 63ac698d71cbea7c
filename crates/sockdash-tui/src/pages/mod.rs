//! Dashboard pages.
//!
//! A page owns its queries. Mounting starts their poll tasks; unmounting
//! drops the handles, which aborts the tasks and discards in-flight
//! results. Drawing only reads cached state, so a page that has never been
//! mounted still draws (as loading) without touching the network.

mod backend;
mod frontend;
mod list;
mod simulator;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};
use sockdash_query::{Query, QueryState};
use tracing::{debug, warn};

use crate::error::TuiResult;
use crate::widgets::{ErrorPanel, MetricsCard, RefreshButton, Spinner};

pub use backend::{MetricsPage, OverviewPage, ResourcesPage};
pub use frontend::FrontendPage;
pub use list::ListPage;
pub use simulator::SimOverviewPage;

/// Per-frame values shared with pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawContext {
    /// Animation tick.
    pub tick: u64,
    /// Whether the content pane has keyboard focus.
    pub focused: bool,
}

/// A routed view in the main pane.
pub trait Page {
    /// Title shown in the page header.
    fn title(&self) -> &str;

    /// Start polling this page's queries.
    fn mount(&mut self);

    /// Stop polling; in-flight results are discarded.
    fn unmount(&mut self);

    /// Whether poll tasks are running.
    fn is_mounted(&self) -> bool;

    /// Refetch everything now. Returns false when a refresh is already
    /// running.
    fn refresh(&mut self) -> bool;

    /// Handle a key the shell did not consume. Returns whether it was used.
    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }

    /// Handle a left click at a terminal cell.
    fn handle_click(&mut self, _x: u16, _y: u16) -> bool {
        false
    }

    /// Whether the page wants every key (e.g. while editing a filter).
    fn captures_input(&self) -> bool {
        false
    }

    /// Draw into `area`.
    ///
    /// # Errors
    ///
    /// Returns an error when the page cannot draw; the shell shows a
    /// fallback instead.
    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &DrawContext) -> TuiResult<()>;
}

/// Refetch `query` on a background task.
pub(crate) fn spawn_refetch<T: Send + Sync + 'static>(query: &Query<T>) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!(key = %query.key(), "refresh requested outside a runtime");
        return;
    };
    let query = query.clone();
    runtime.spawn(async move {
        if let Err(err) = query.refetch().await {
            debug!(key = %query.key(), error = %err, "manual refresh failed");
        }
    });
}

/// Whether any of `states` is fetching.
pub(crate) fn any_fetching(states: &[bool]) -> bool {
    states.iter().any(|fetching| *fetching)
}

/// One-line page header: title, refresh control, optional note.
pub(crate) fn header_line(title: &str, refresh: RefreshButton, note: Option<Span<'static>>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        refresh.span(),
    ];
    if let Some(note) = note {
        spans.push(Span::raw("  "));
        spans.push(note);
    }
    Line::from(spans)
}

/// Note shown when a refetch failed but older data is still displayed.
pub(crate) fn stale_note<T>(state: &QueryState<T>) -> Option<Span<'static>> {
    match (&state.error, &state.data) {
        (Some(err), Some(_)) => Some(Span::styled(
            format!("⚠ showing stale data: {err}"),
            Style::default().fg(Color::Yellow),
        )),
        _ => None,
    }
}

/// Lay `cards` out side by side in equal widths.
pub(crate) fn card_row(frame: &mut Frame, area: Rect, cards: Vec<MetricsCard<'_>>) {
    let count = u32::try_from(cards.len()).unwrap_or(u32::MAX).max(1);
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);
    for (card, rect) in cards.into_iter().zip(areas.iter()) {
        frame.render_widget(card, *rect);
    }
}

/// Draw `state`: the data through `draw`, else the error, else a spinner.
pub(crate) fn draw_state<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &QueryState<T>,
    ctx: &DrawContext,
    draw: impl FnOnce(&mut Frame, Rect, &T),
) {
    match (state.data(), &state.error) {
        (Some(data), _) => draw(frame, area, data),
        (None, Some(err)) => frame.render_widget(ErrorPanel::new(title, err), area),
        (None, None) => frame.render_widget(Spinner::new(ctx.tick), area),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::{DrawContext, Page};

    /// Draw `page` on a `width`×`height` test terminal and return the text.
    pub fn render(page: &mut dyn Page, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                page.draw(frame, frame.area(), &DrawContext::default()).unwrap();
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    /// Buffer contents, one line per row.
    pub fn buffer_text(buffer: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}
