//! Generic list page: one polled query shown in a data table.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};
use sockdash_query::{PollHandle, Query};

use super::{draw_state, header_line, spawn_refetch, stale_note, DrawContext, Page};
use crate::error::TuiResult;
use crate::table::{Column, DataTable, SortState};
use crate::widgets::RefreshButton;

/// A page showing one polled list in a [`DataTable`].
pub struct ListPage<R> {
    title: String,
    query: Query<Vec<R>>,
    table: DataTable<R>,
    poll: Option<PollHandle>,
}

impl<R> std::fmt::Debug for ListPage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPage")
            .field("title", &self.title)
            .field("query", &self.query)
            .field("mounted", &self.poll.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Send + Sync + 'static> ListPage<R> {
    /// Page titled `title` listing `query` with `columns`.
    pub fn new(title: impl Into<String>, query: Query<Vec<R>>, columns: Vec<Column<R>>) -> Self {
        let title = title.into();
        let table = DataTable::new(title.clone(), columns).with_empty_message(format!("No {}", title.to_lowercase()));
        Self {
            title,
            query,
            table,
            poll: None,
        }
    }

    /// Start with `sort` applied.
    #[must_use]
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.table = self.table.with_sort(sort);
        self
    }

    /// The table.
    #[must_use]
    pub const fn table(&self) -> &DataTable<R> {
        &self.table
    }
}

impl<R: Send + Sync + 'static> Page for ListPage<R> {
    fn title(&self) -> &str {
        &self.title
    }

    fn mount(&mut self) {
        self.poll = Some(self.query.poll());
    }

    fn unmount(&mut self) {
        self.poll = None;
    }

    fn is_mounted(&self) -> bool {
        self.poll.is_some()
    }

    fn refresh(&mut self) -> bool {
        let pressed = RefreshButton::new(self.query.state().is_fetching).press();
        if pressed {
            spawn_refetch(&self.query);
        }
        pressed
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let state = self.query.state();
        let rows = state.data().map_or(&[][..], Vec::as_slice);
        self.table.handle_key(key, rows)
    }

    fn handle_click(&mut self, x: u16, y: u16) -> bool {
        let state = self.query.state();
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

        let state = self.query.state();
        let header = header_line(&self.title, RefreshButton::new(state.is_fetching), stale_note(&state));
        frame.render_widget(Paragraph::new(header), chunks[0]);

        let table = &mut self.table;
        draw_state(frame, chunks[1], &self.title, &state, ctx, |frame, area, rows| {
            table.render(frame, area, rows, ctx.focused);
        });
        Ok(())
    }
}
