//! Interactive table: selection, header focus, filter editing, drawing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState as ViewState},
    Frame,
};

use super::column::Column;
use super::sort::SortState;
use super::visible_indices;

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const COLUMN_SPACING: u16 = 1;

/// User-controlled table state: sort, filter, header focus and selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    /// Active sort.
    pub sort: SortState,
    /// Filter text.
    pub filter: String,
    /// Whether keystrokes go to the filter.
    pub editing_filter: bool,
    /// Header column that `s`/Enter sorts.
    pub focused_column: usize,
    /// Selected index into the visible rows.
    pub selected: usize,
}

/// A titled table over rows of type `R`.
pub struct DataTable<R> {
    title: String,
    columns: Vec<Column<R>>,
    state: TableState,
    empty_message: String,
    header_hitboxes: Vec<Rect>,
    view: ViewState,
}

impl<R> std::fmt::Debug for DataTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("title", &self.title)
            .field("columns", &self.columns)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<R> DataTable<R> {
    /// Table titled `title` with `columns`, unsorted and unfiltered.
    pub fn new(title: impl Into<String>, columns: Vec<Column<R>>) -> Self {
        Self {
            title: title.into(),
            columns,
            state: TableState::default(),
            empty_message: "No rows".to_string(),
            header_hitboxes: Vec::new(),
            view: ViewState::default(),
        }
    }

    /// Start with `sort` applied.
    #[must_use]
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.state.sort = sort;
        self
    }

    /// Message shown when no row is visible.
    #[must_use]
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Columns.
    #[must_use]
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &TableState {
        &self.state
    }

    /// Replace the filter text.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.state.filter = filter.into();
        self.state.selected = 0;
    }

    /// Whether the filter is being edited.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.state.editing_filter
    }

    /// Advance column `index` through its sort cycle. Returns false for an
    /// unknown or unsortable column.
    pub fn toggle_sort(&mut self, index: usize, rows: &[R]) -> bool {
        let Some(column) = self.columns.get(index) else {
            return false;
        };
        if !column.is_sortable() {
            return false;
        }
        let first = column.first_direction(rows);
        self.state.sort.toggle(column.id(), first);
        self.state.focused_column = index;
        true
    }

    /// Visible row indices into `rows`.
    #[must_use]
    pub fn visible_indices(&self, rows: &[R]) -> Vec<usize> {
        visible_indices(rows, &self.columns, &self.state.sort, &self.state.filter)
    }

    /// Visible rows.
    #[must_use]
    pub fn visible<'a>(&self, rows: &'a [R]) -> Vec<&'a R> {
        self.visible_indices(rows).into_iter().map(|i| &rows[i]).collect()
    }

    /// Selected visible row.
    #[must_use]
    pub fn selected_row<'a>(&self, rows: &'a [R]) -> Option<&'a R> {
        self.visible_indices(rows)
            .get(self.state.selected)
            .map(|&i| &rows[i])
    }

    /// Handle a key. Returns whether the table consumed it.
    pub fn handle_key(&mut self, key: KeyEvent, rows: &[R]) -> bool {
        if self.state.editing_filter {
            return self.edit_filter(key);
        }
        let visible = self.visible_indices(rows).len();
        let last_column = self.columns.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('/') => self.state.editing_filter = true,
            KeyCode::Esc if !self.state.filter.is_empty() => self.set_filter(""),
            KeyCode::Left | KeyCode::Char('h') => {
                self.state.focused_column = self.state.focused_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.state.focused_column = (self.state.focused_column + 1).min(last_column);
            }
            KeyCode::Char('s') | KeyCode::Enter => {
                return self.toggle_sort(self.state.focused_column, rows);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.selected = self.state.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.selected = (self.state.selected + 1).min(visible.saturating_sub(1));
            }
            KeyCode::Home | KeyCode::Char('g') => self.state.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.state.selected = visible.saturating_sub(1),
            _ => return false,
        }
        true
    }

    fn edit_filter(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.state.editing_filter = false,
            KeyCode::Backspace => {
                self.state.filter.pop();
                self.state.selected = 0;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.set_filter(""),
            KeyCode::Char(c) => {
                self.state.filter.push(c);
                self.state.selected = 0;
            }
            _ => return false,
        }
        true
    }

    /// Handle a left click at terminal cell (`x`, `y`). Clicking a header
    /// sorts by it. Returns whether the click hit a header.
    pub fn handle_click(&mut self, x: u16, y: u16, rows: &[R]) -> bool {
        let hit = self
            .header_hitboxes
            .iter()
            .position(|rect| rect.contains(Position::new(x, y)));
        hit.is_some_and(|index| self.toggle_sort(index, rows))
    }

    /// Draw into `area`. `focused` highlights the focused header column.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, rows: &[R], focused: bool) {
        let visible = self.visible_indices(rows);
        self.state.selected = self.state.selected.min(visible.len().saturating_sub(1));
        self.state.focused_column = self.state.focused_column.min(self.columns.len().saturating_sub(1));

        let title = format!(" {} ({}/{}) ", self.title, visible.len(), rows.len());
        let border = if focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(self.filter_line(), chunks[0]);

        let widths: Vec<Constraint> = self
            .columns
            .iter()
            .map(|c| c.fixed_width().map_or(Constraint::Fill(1), Constraint::Length))
            .collect();
        self.header_hitboxes = header_hitboxes(chunks[1], &widths);

        if visible.is_empty() {
            self.render_header_only(frame, chunks[1], &widths, focused);
            let message_area = Rect {
                y: chunks[1].y.saturating_add(2),
                height: chunks[1].height.saturating_sub(2),
                ..chunks[1]
            };
            let message = Paragraph::new(Line::from(Span::styled(
                self.empty_message.as_str(),
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(message, message_area);
            return;
        }

        let body: Vec<Row> = visible
            .iter()
            .map(|&i| {
                Row::new(self.columns.iter().map(|c| {
                    let cell = c.cell(&rows[i]);
                    Cell::from(Span::styled(cell.text, cell.style))
                }))
            })
            .collect();
        let table = self.table(body, &widths, focused);
        self.view.select(Some(self.state.selected));
        frame.render_stateful_widget(table, chunks[1], &mut self.view);
    }

    fn render_header_only(&self, frame: &mut Frame, area: Rect, widths: &[Constraint], focused: bool) {
        let table = self.table(Vec::new(), widths, focused);
        frame.render_widget(table, area);
    }

    fn table<'a>(&self, body: Vec<Row<'a>>, widths: &[Constraint], focused: bool) -> Table<'a> {
        let header = Row::new(self.columns.iter().enumerate().map(|(i, c)| {
            let marker = self.state.sort.direction_of(c.id()).map_or("", |d| d.marker());
            let mut style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
            if focused && i == self.state.focused_column {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Cell::from(Span::styled(format!("{}{marker}", c.header()), style))
        }))
        .bottom_margin(1);

        Table::new(body, widths.to_vec())
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .flex(Flex::Start)
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_symbol(HIGHLIGHT_SYMBOL)
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    }

    fn filter_line(&self) -> Paragraph<'static> {
        let line = if self.state.editing_filter {
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.state.filter.clone()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ])
        } else if self.state.filter.is_empty() {
            Line::from(Span::styled(
                "Search all columns... (press /)",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.state.filter.clone()),
                Span::styled("  (Esc clears)", Style::default().fg(Color::DarkGray)),
            ])
        };
        Paragraph::new(line)
    }
}

/// Header cell rectangles, laid out the way the table lays out columns.
fn header_hitboxes(area: Rect, widths: &[Constraint]) -> Vec<Rect> {
    if area.height == 0 {
        return Vec::new();
    }
    let symbol_width = u16::try_from(HIGHLIGHT_SYMBOL.chars().count()).unwrap_or(0);
    let columns_area = Rect {
        x: area.x.saturating_add(symbol_width),
        width: area.width.saturating_sub(symbol_width),
        height: 1,
        ..area
    };
    Layout::horizontal(widths.to_vec())
        .flex(Flex::Start)
        .spacing(COLUMN_SPACING)
        .split(columns_area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{SortDirection, CellValue};
    use ratatui::{backend::TestBackend, Terminal};

    #[derive(Debug, PartialEq)]
    struct Person {
        name: &'static str,
        age: u32,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Alice", age: 30 },
            Person { name: "Bob", age: 25 },
            Person { name: "Charlie", age: 35 },
        ]
    }

    fn table() -> DataTable<Person> {
        DataTable::new(
            "People",
            vec![
                Column::new("name", "Name", |p: &Person| CellValue::from(p.name)).width(12),
                Column::new("age", "Age", |p: &Person| CellValue::from(p.age)).width(6),
            ],
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ages(table: &DataTable<Person>, rows: &[Person]) -> Vec<u32> {
        table.visible(rows).iter().map(|p| p.age).collect()
    }

    fn draw(table: &mut DataTable<Person>, rows: &[Person]) -> String {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| table.render(frame, frame.area(), rows, true))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_header_press_cycles_age_sort() {
        let rows = people();
        let mut table = table();

        assert!(table.toggle_sort(1, &rows));
        assert_eq!(ages(&table, &rows), vec![35, 30, 25]);

        assert!(table.toggle_sort(1, &rows));
        assert_eq!(ages(&table, &rows), vec![25, 30, 35]);

        assert!(table.toggle_sort(1, &rows));
        assert_eq!(ages(&table, &rows), vec![30, 25, 35]);
    }

    #[test]
    fn test_unsortable_column_ignores_press() {
        let rows = people();
        let mut table = DataTable::new(
            "People",
            vec![Column::new("name", "Name", |p: &Person| CellValue::from(p.name)).unsortable()],
        );
        assert!(!table.toggle_sort(0, &rows));
        assert!(!table.toggle_sort(5, &rows));
        assert!(table.state().sort.is_unsorted());
    }

    #[test]
    fn test_keyboard_sort_on_focused_column() {
        let rows = people();
        let mut table = table();

        assert!(table.handle_key(key(KeyCode::Right), &rows));
        assert!(table.handle_key(key(KeyCode::Char('s')), &rows));
        assert_eq!(table.state().sort.direction_of("age"), Some(SortDirection::Descending));

        assert!(table.handle_key(key(KeyCode::Left), &rows));
        assert!(table.handle_key(key(KeyCode::Enter), &rows));
        assert_eq!(table.state().sort.direction_of("name"), Some(SortDirection::Ascending));
        assert_eq!(table.state().sort.direction_of("age"), None);
    }

    #[test]
    fn test_typing_filter() {
        let rows = people();
        let mut table = table();

        assert!(table.handle_key(key(KeyCode::Char('/')), &rows));
        assert!(table.is_editing());
        for c in "Ali".chars() {
            table.handle_key(key(KeyCode::Char(c)), &rows);
        }
        assert_eq!(table.visible(&rows), vec![&rows[0]]);

        table.handle_key(key(KeyCode::Enter), &rows);
        assert!(!table.is_editing());
        assert_eq!(table.state().filter, "Ali");

        table.handle_key(key(KeyCode::Esc), &rows);
        assert_eq!(table.state().filter, "");
        assert_eq!(table.visible(&rows).len(), 3);
    }

    #[test]
    fn test_filter_keys_are_not_commands_while_editing() {
        let rows = people();
        let mut table = table();
        table.handle_key(key(KeyCode::Char('/')), &rows);
        table.handle_key(key(KeyCode::Char('s')), &rows);
        assert!(table.state().sort.is_unsorted());
        assert_eq!(table.state().filter, "s");
    }

    #[test]
    fn test_selection_is_bounded() {
        let rows = people();
        let mut table = table();
        for _ in 0..10 {
            table.handle_key(key(KeyCode::Down), &rows);
        }
        assert_eq!(table.state().selected, 2);
        assert_eq!(table.selected_row(&rows), Some(&rows[2]));
        table.handle_key(key(KeyCode::Char('g')), &rows);
        assert_eq!(table.selected_row(&rows), Some(&rows[0]));
    }

    #[test]
    fn test_unhandled_key_is_not_consumed() {
        let rows = people();
        let mut table = table();
        assert!(!table.handle_key(key(KeyCode::Char('x')), &rows));
        assert!(!table.handle_key(key(KeyCode::Esc), &rows));
    }

    #[test]
    fn test_render_shows_sorted_rows_and_marker() {
        let rows = people();
        let mut table = table();
        table.toggle_sort(1, &rows);

        let screen = draw(&mut table, &rows);
        assert!(screen.contains("People (3/3)"));
        assert!(screen.contains("Age ↓"));
        let charlie = screen.find("Charlie").unwrap();
        let alice = screen.find("Alice").unwrap();
        let bob = screen.find("Bob").unwrap();
        assert!(charlie < alice && alice < bob);
    }

    #[test]
    fn test_render_empty_message() {
        let rows = people();
        let mut table = table().with_empty_message("Nobody here");
        table.set_filter("zzz");
        let screen = draw(&mut table, &rows);
        assert!(screen.contains("People (0/3)"));
        assert!(screen.contains("Nobody here"));
    }

    #[test]
    fn test_click_on_header_sorts() {
        let rows = people();
        let mut table = table();
        draw(&mut table, &rows);

        // Border row, filter line, then the header row at y = 2.
        let age_header = table.header_hitboxes[1];
        assert_eq!(age_header.y, 2);
        assert!(table.handle_click(age_header.x, age_header.y, &rows));
        assert_eq!(ages(&table, &rows), vec![35, 30, 25]);

        assert!(!table.handle_click(age_header.x, age_header.y + 3, &rows));
    }
}
