//! Application state: navigation, focus and input routing.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use sockdash_query::QueryEvent;
use tracing::{debug, info};

use crate::pages::Page;
use crate::router::{NavItem, Router};

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The page list.
    Sidebar,
    /// The current page.
    #[default]
    Content,
}

/// Main application state.
pub struct App {
    /// Is the app running.
    pub running: bool,
    /// Dashboard title.
    pub title: String,
    /// Pane with keyboard focus.
    pub focus: Focus,
    /// Animation tick counter.
    pub tick: u64,
    /// Time of the last successful fetch.
    pub last_update: Option<DateTime<Local>>,
    /// Whether the last fetch succeeded.
    pub connected: bool,
    /// Fallback message for the current page after a failed draw.
    pub page_error: Option<String>,
    /// Sidebar area from the last draw, for mouse hit testing.
    pub sidebar_area: Rect,
    /// Content area from the last draw.
    pub content_area: Rect,
    nav: Vec<NavItem>,
    router: Router<usize>,
    pages: Vec<Box<dyn Page>>,
    location: String,
    current: Option<usize>,
    nav_selected: usize,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("title", &self.title)
            .field("location", &self.location)
            .field("current", &self.current)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl App {
    /// App with a sidebar of `nav`, routes resolving to indices into
    /// `pages`. Nothing is mounted until the first [`App::navigate`].
    #[must_use]
    pub fn new(title: impl Into<String>, nav: Vec<NavItem>, router: Router<usize>, pages: Vec<Box<dyn Page>>) -> Self {
        Self {
            running: true,
            title: title.into(),
            focus: Focus::default(),
            tick: 0,
            last_update: None,
            connected: false,
            page_error: None,
            sidebar_area: Rect::default(),
            content_area: Rect::default(),
            nav,
            router,
            pages,
            location: String::new(),
            current: None,
            nav_selected: 0,
        }
    }

    /// Sidebar entries.
    #[must_use]
    pub fn nav(&self) -> &[NavItem] {
        &self.nav
    }

    /// Highlighted sidebar entry.
    #[must_use]
    pub const fn nav_selected(&self) -> usize {
        self.nav_selected
    }

    /// Current path.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Index of the sidebar entry for the current path, if any.
    #[must_use]
    pub fn active_nav(&self) -> Option<usize> {
        self.nav.iter().position(|item| item.path == self.location)
    }

    /// Routed page, or `None` when nothing matches the current path.
    pub fn current_page(&mut self) -> Option<&mut (dyn Page + 'static)> {
        let index = self.current?;
        self.pages.get_mut(index).map(|page| &mut **page)
    }

    /// Whether page `index` has running poll tasks.
    #[must_use]
    pub fn is_page_mounted(&self, index: usize) -> bool {
        self.pages.get(index).is_some_and(|page| page.is_mounted())
    }

    /// Go to `path`. Leaving a page unmounts it; entering one mounts it.
    pub fn navigate(&mut self, path: &str) {
        let next = self.router.resolve(path).map(|(index, _)| *index);
        if next != self.current {
            if let Some(page) = self.current.and_then(|i| self.pages.get_mut(i)) {
                page.unmount();
            }
            if let Some(page) = next.and_then(|i| self.pages.get_mut(i)) {
                page.mount();
            }
            self.current = next;
            self.page_error = None;
        }
        self.location = path.to_string();
        if let Some(index) = self.active_nav() {
            self.nav_selected = index;
        }
        info!(path, matched = next.is_some(), "navigated");
    }

    fn navigate_nav(&mut self, index: usize) {
        if let Some(item) = self.nav.get(index) {
            let path = item.path.clone();
            self.navigate(&path);
        }
    }

    /// Go to the next sidebar entry, wrapping.
    pub fn next_page(&mut self) {
        if self.nav.is_empty() {
            return;
        }
        let from = self.active_nav().unwrap_or(self.nav.len() - 1);
        self.navigate_nav((from + 1) % self.nav.len());
    }

    /// Go to the previous sidebar entry, wrapping.
    pub fn prev_page(&mut self) {
        if self.nav.is_empty() {
            return;
        }
        let from = self.active_nav().unwrap_or(0);
        self.navigate_nav(from.checked_sub(1).unwrap_or(self.nav.len() - 1));
    }

    /// Leave the app, unmounting the current page.
    pub fn quit(&mut self) {
        if let Some(page) = self.current_page() {
            page.unmount();
        }
        self.running = false;
    }

    /// Advance animations.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Record a cache event.
    pub fn on_query_event(&mut self, event: &QueryEvent) {
        match event {
            QueryEvent::Updated(_) => {
                self.connected = true;
                self.last_update = Some(Local::now());
            }
            QueryEvent::Failed(key) => {
                self.connected = false;
                debug!(%key, "query failed");
            }
            QueryEvent::Fetching(_) | QueryEvent::Invalidated(_) => {}
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.focus == Focus::Content {
            if let Some(page) = self.current_page() {
                if page.captures_input() {
                    page.handle_key(key);
                    return;
                }
            }
        }
        match key.code {
            KeyCode::Char('q' | 'Q') => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Content,
                    Focus::Content => Focus::Sidebar,
                };
            }
            KeyCode::BackTab => self.prev_page(),
            KeyCode::Char(d @ '1'..='9') => {
                let index = d as usize - '1' as usize;
                self.navigate_nav(index);
            }
            KeyCode::Char('r') => {
                if let Some(page) = self.current_page() {
                    page.refresh();
                }
            }
            _ => match self.focus {
                Focus::Sidebar => self.handle_sidebar_key(key),
                Focus::Content => {
                    if let Some(page) = self.current_page() {
                        page.handle_key(key);
                    }
                }
            },
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        let last = self.nav.len().saturating_sub(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.nav_selected = self.nav_selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.nav_selected = (self.nav_selected + 1).min(last),
            KeyCode::Enter | KeyCode::Right => {
                self.navigate_nav(self.nav_selected);
                self.focus = Focus::Content;
            }
            _ => {}
        }
    }

    /// Handle a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.sidebar_area.contains(position) => {
                self.focus = Focus::Sidebar;
                // Items start below the sidebar's top border.
                if mouse.row <= self.sidebar_area.y {
                    return;
                }
                let row = mouse.row - self.sidebar_area.y - 1;
                if usize::from(row) < self.nav.len() {
                    self.nav_selected = usize::from(row);
                    self.navigate_nav(usize::from(row));
                }
            }
            MouseEventKind::Down(MouseButton::Left) if self.content_area.contains(position) => {
                self.focus = Focus::Content;
                if let Some(page) = self.current_page() {
                    page.handle_click(mouse.column, mouse.row);
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp if self.content_area.contains(position) => {
                let code = if mouse.kind == MouseEventKind::ScrollDown {
                    KeyCode::Down
                } else {
                    KeyCode::Up
                };
                if let Some(page) = self.current_page() {
                    page.handle_key(KeyEvent::from(code));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TuiResult;
    use crate::pages::DrawContext;
    use ratatui::Frame;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Counters {
        mounts: AtomicU32,
        unmounts: AtomicU32,
        keys: AtomicU32,
        refreshes: AtomicU32,
    }

    struct FakePage {
        title: &'static str,
        mounted: bool,
        editing: bool,
        counters: Arc<Counters>,
    }

    impl Page for FakePage {
        fn title(&self) -> &str {
            self.title
        }

        fn mount(&mut self) {
            self.mounted = true;
            self.counters.mounts.fetch_add(1, Ordering::SeqCst);
        }

        fn unmount(&mut self) {
            self.mounted = false;
            self.counters.unmounts.fetch_add(1, Ordering::SeqCst);
        }

        fn is_mounted(&self) -> bool {
            self.mounted
        }

        fn refresh(&mut self) -> bool {
            self.counters.refreshes.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn handle_key(&mut self, key: KeyEvent) -> bool {
            self.counters.keys.fetch_add(1, Ordering::SeqCst);
            if key.code == KeyCode::Char('/') {
                self.editing = true;
            }
            true
        }

        fn captures_input(&self) -> bool {
            self.editing
        }

        fn draw(&mut self, _frame: &mut Frame, _area: Rect, _ctx: &DrawContext) -> TuiResult<()> {
            Ok(())
        }
    }

    fn app() -> (App, Vec<Arc<Counters>>) {
        let counters: Vec<Arc<Counters>> = (0..3).map(|_| Arc::new(Counters::default())).collect();
        let pages: Vec<Box<dyn Page>> = ["Overview", "Containers", "Metrics"]
            .iter()
            .zip(&counters)
            .map(|(title, c)| {
                Box::new(FakePage {
                    title: *title,
                    mounted: false,
                    editing: false,
                    counters: c.clone(),
                }) as Box<dyn Page>
            })
            .collect();
        let nav = vec![
            NavItem::new("Overview", "/ui/"),
            NavItem::new("Containers", "/ui/containers"),
            NavItem::new("Metrics", "/ui/metrics"),
        ];
        let router = Router::new()
            .route("/ui/", 0)
            .route("/ui/containers", 1)
            .route("/ui/metrics", 2);
        (App::new("Test", nav, router, pages), counters)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    #[test]
    fn test_navigation_mounts_and_unmounts() {
        let (mut app, counters) = app();
        app.navigate("/ui/");
        assert!(app.is_page_mounted(0));

        app.navigate("/ui/metrics");
        assert!(!app.is_page_mounted(0));
        assert!(app.is_page_mounted(2));
        assert_eq!(counters[0].unmounts.load(Ordering::SeqCst), 1);
        assert_eq!(app.active_nav(), Some(2));
    }

    #[test]
    fn test_same_route_does_not_remount() {
        let (mut app, counters) = app();
        app.navigate("/ui/");
        app.navigate("/ui");
        assert_eq!(counters[0].mounts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_path_unmounts_and_has_no_page() {
        let (mut app, _counters) = app();
        app.navigate("/ui/containers");
        app.navigate("/nowhere");
        assert!(app.current_page().is_none());
        assert!(!app.is_page_mounted(1));
        assert_eq!(app.location(), "/nowhere");
    }

    #[test]
    fn test_number_keys_and_tabs_navigate() {
        let (mut app, _counters) = app();
        app.navigate("/ui/");
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.location(), "/ui/containers");

        app.next_page();
        assert_eq!(app.location(), "/ui/metrics");
        app.next_page();
        assert_eq!(app.location(), "/ui/");

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.location(), "/ui/metrics");

        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.location(), "/ui/metrics");
    }

    #[test]
    fn test_sidebar_focus_moves_selection() {
        let (mut app, _counters) = app();
        app.navigate("/ui/");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Sidebar);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.nav_selected(), 2);
        assert_eq!(app.location(), "/ui/");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.location(), "/ui/metrics");
        assert_eq!(app.focus, Focus::Content);
    }

    #[test]
    fn test_capturing_page_gets_quit_key() {
        let (mut app, counters) = app();
        app.navigate("/ui/");
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(counters[0].keys.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_quit_and_refresh() {
        let (mut app, counters) = app();
        app.navigate("/ui/");
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(counters[0].refreshes.load(Ordering::SeqCst), 1);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
        assert!(!app.is_page_mounted(0));
    }

    #[test]
    fn test_sidebar_click_navigates() {
        let (mut app, _counters) = app();
        app.navigate("/ui/");
        app.sidebar_area = Rect::new(0, 3, 24, 20);
        app.content_area = Rect::new(24, 3, 56, 20);

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.location(), "/ui/containers");
    }

    #[test]
    fn test_sidebar_border_click_keeps_location() {
        let (mut app, _counters) = app();
        app.navigate("/ui/metrics");
        app.sidebar_area = Rect::new(0, 3, 24, 20);
        app.content_area = Rect::new(24, 3, 56, 20);

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.location(), "/ui/metrics");
        assert_eq!(app.focus, Focus::Sidebar);

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.location(), "/ui/");
    }

    #[test]
    fn test_query_events_update_footer_state() {
        let (mut app, _counters) = app();
        app.on_query_event(&QueryEvent::Updated("status".into()));
        assert!(app.connected);
        assert!(app.last_update.is_some());
        app.on_query_event(&QueryEvent::Failed("status".into()));
        assert!(!app.connected);
    }
}
