//! UI rendering: header, sidebar, routed page and footer.

use std::panic::{catch_unwind, AssertUnwindSafe};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use tracing::error;

use crate::app::{App, Focus};
use crate::pages::{DrawContext, Page};

/// Sidebar width in cells.
pub const SIDEBAR_WIDTH: u16 = 24;

/// Main UI rendering function.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);
    app.sidebar_area = main[0];
    app.content_area = main[1];

    draw_header(frame, app, chunks[0]);
    draw_sidebar(frame, app, main[0]);
    draw_content(frame, app, main[1]);
    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" sockdash ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(app.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(app.location().to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.active_nav();
    let focused = app.focus == Focus::Sidebar;
    let items: Vec<ListItem> = app
        .nav()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut style = Style::default();
            if Some(i) == active {
                style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
            }
            if focused && i == app.nav_selected() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let marker = if Some(i) == active { "▶" } else { " " };
            ListItem::new(Line::from(format!("{marker} {} {}", i + 1, item.label))).style(style)
        })
        .collect();

    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Pages ");
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let ctx = DrawContext {
        tick: app.tick,
        focused: app.focus == Focus::Content,
    };
    let location = app.location().to_string();
    let failure = match app.current_page() {
        Some(page) => draw_guarded(frame, area, page, &ctx),
        None => {
            draw_not_found(frame, area, &location);
            None
        }
    };
    if failure != app.page_error {
        if let Some(message) = &failure {
            error!(path = %location, error = %message, "page failed to draw");
        }
        app.page_error = failure;
    }
}

fn draw_not_found(frame: &mut Frame, area: Rect, location: &str) {
    let text = vec![
        Line::from(Span::styled("Page not found", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(format!("Nothing is routed at {location}.")),
        Line::from("Press 1 to go back to the overview."),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

/// Draw `page` into `area`, replacing it with a fallback if the draw fails
/// or panics. Returns the failure message.
pub fn draw_guarded(frame: &mut Frame, area: Rect, page: &mut dyn Page, ctx: &DrawContext) -> Option<String> {
    let outcome = catch_unwind(AssertUnwindSafe(|| page.draw(frame, area, ctx)));
    let message = match outcome {
        Ok(Ok(())) => return None,
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };
    draw_fallback(frame, area, page.title(), &message);
    Some(message)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "page panicked".to_string()
    }
}

fn draw_fallback(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let text = vec![
        Line::from(Span::styled(
            "Something went wrong while drawing this page.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Switch pages or press r to retry.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {title} "));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let connection = match (app.connected, app.last_update) {
        (true, _) => Span::styled("● connected", Style::default().fg(Color::Green)),
        (false, None) => Span::styled("○ connecting", Style::default().fg(Color::Yellow)),
        (false, Some(_)) => Span::styled("● disconnected", Style::default().fg(Color::Red)),
    };
    let updated = app
        .last_update
        .map_or_else(|| "never".to_string(), |at| at.format("%H:%M:%S").to_string());

    let line = Line::from(vec![
        Span::raw(" "),
        connection,
        Span::raw("  │  "),
        Span::raw(format!("Updated {updated}")),
        Span::raw("  │  "),
        Span::styled(
            "q quit  Tab focus  1-9 pages  r refresh  / filter  ←→ s sort",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}
