//! Small reusable widgets.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use sockdash_api::ApiError;
use sockdash_query::QueryError;

/// Color family of a status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// Healthy or finished well.
    Success,
    /// In progress or degraded.
    Warning,
    /// Failed.
    Danger,
    /// Stopped or informational.
    Info,
    /// Unknown.
    Neutral,
}

impl StatusCategory {
    /// Terminal color.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Danger => Color::Red,
            Self::Info => Color::Blue,
            Self::Neutral => Color::Gray,
        }
    }
}

/// Classify a status string, ignoring case. Unknown values are neutral.
#[must_use]
pub fn status_category(status: &str) -> StatusCategory {
    match status.trim().to_ascii_lowercase().as_str() {
        "ok" | "healthy" | "running" | "active" | "ready" | "available" | "succeeded" | "success" | "pass"
        | "passed" | "up" | "completed" => StatusCategory::Success,
        "pending" | "creating" | "starting" | "provisioning" | "restarting" | "paused" | "degraded"
        | "warning" | "warn" | "updating" | "deploying" | "inactive" => StatusCategory::Warning,
        "error" | "failed" | "failure" | "fail" | "unhealthy" | "dead" | "down" | "critical" | "stopping" => {
            StatusCategory::Danger
        }
        "created" | "stopped" | "exited" | "removing" | "deleted" | "info" | "notice" | "debug" => {
            StatusCategory::Info
        }
        _ => StatusCategory::Neutral,
    }
}

/// Style for a status string.
#[must_use]
pub fn status_style(status: &str) -> Style {
    Style::default()
        .fg(status_category(status).color())
        .add_modifier(Modifier::BOLD)
}

/// Colored badge span for a status string.
#[must_use]
pub fn status_badge(status: &str) -> Span<'static> {
    Span::styled(format!("● {status}"), status_style(status))
}

/// Human uptime: `42s`, `3m 5s`, `2h 7m`, `1d 4h`.
#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    let (days, hours, minutes, secs) = (
        seconds / 86_400,
        seconds % 86_400 / 3_600,
        seconds % 3_600 / 60,
        seconds % 60,
    );
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Human byte count using binary units.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Bordered card with a title and one large value.
#[derive(Debug, Clone)]
pub struct MetricsCard<'a> {
    title: &'a str,
    value: String,
    color: Color,
}

impl<'a> MetricsCard<'a> {
    /// Card showing `value` under `title`.
    pub fn new(title: &'a str, value: impl ToString) -> Self {
        Self {
            title,
            value: value.to_string(),
            color: Color::Cyan,
        }
    }

    /// Value color.
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for MetricsCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(Line::from(Span::styled(
            self.value,
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(block)
        .render(area, buf);
    }
}

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Animated loading indicator; `tick` selects the frame.
#[derive(Debug, Clone, Copy)]
pub struct Spinner<'a> {
    tick: u64,
    label: &'a str,
}

impl<'a> Spinner<'a> {
    /// Spinner at animation step `tick`.
    #[must_use]
    pub const fn new(tick: u64) -> Self {
        Self {
            tick,
            label: "Loading...",
        }
    }

    /// Label shown next to the glyph.
    #[must_use]
    pub const fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    /// Current glyph.
    #[must_use]
    pub fn glyph(&self) -> char {
        SPINNER_FRAMES[(self.tick % SPINNER_FRAMES.len() as u64) as usize]
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(vec![
            Span::styled(self.glyph().to_string(), Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled(self.label, Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}

/// Manual refresh control, disabled while a fetch is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshButton {
    loading: bool,
}

impl RefreshButton {
    /// Button for a query that is (or is not) currently fetching.
    #[must_use]
    pub const fn new(loading: bool) -> Self {
        Self { loading }
    }

    /// Press the button. Returns whether a refresh should start.
    #[must_use]
    pub const fn press(&self) -> bool {
        !self.loading
    }

    /// Label span.
    #[must_use]
    pub fn span(&self) -> Span<'static> {
        if self.loading {
            Span::styled("[r] Refreshing...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled("[r] Refresh", Style::default().fg(Color::Cyan))
        }
    }
}

/// Explanation of a failed query.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPanel<'a> {
    title: &'a str,
    error: &'a QueryError,
}

impl<'a> ErrorPanel<'a> {
    /// Panel describing `error` under `title`.
    #[must_use]
    pub const fn new(title: &'a str, error: &'a QueryError) -> Self {
        Self { title, error }
    }

    /// Lines describing the error: HTTP status first when there is one.
    #[must_use]
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        match self.error.downcast_ref::<ApiError>() {
            Some(ApiError::Request {
                status,
                status_text,
                body,
            }) => {
                lines.push(Line::from(Span::styled(
                    format!("HTTP {status} {status_text}"),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
                if !body.trim().is_empty() {
                    lines.push(Line::from(body.trim().to_string()));
                }
            }
            Some(other) => lines.push(Line::from(other.to_string())),
            None => lines.push(Line::from(self.error.to_string())),
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Press r to retry.",
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }
}

impl Widget for ErrorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(Color::Red));
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
