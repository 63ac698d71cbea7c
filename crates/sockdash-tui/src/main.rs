//! sockdash - terminal dashboards for sockerless.
//!
//! Read-only: every page polls GET endpoints and nothing is ever changed on
//! the watched service.

use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use sockdash_api::ApiClient;
use sockdash_query::QueryClient;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sockdash_tui::cli::{Cli, Commands};
use sockdash_tui::events::{AppEvent, EventHandler};
use sockdash_tui::{dashboards, snapshot, ui, DashboardConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    // The dashboard owns the terminal, so logs only go to a file.
    init_tracing(config.log_file.as_deref())?;

    let api = ApiClient::new(config.base_url.clone())?;
    if let Some(command) = cli.command {
        let mut out = io::stdout().lock();
        match command {
            Commands::Status => snapshot::print_status(&api, &mut out).await?,
            Commands::Resources { all, view } => snapshot::print_resources(&api, all, &view, &mut out).await?,
            Commands::Containers { view } => snapshot::print_containers(&api, &view, &mut out).await?,
        }
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic| {
        error!(%panic, "panic");
    }));

    let (guard, mut terminal) = TerminalGuard::enter(config.mouse)?;
    let result = run_app(&mut terminal, &config, api).await;
    drop(guard);

    if let Err(err) = &result {
        error!(error = %err, "dashboard exited with error");
    }
    result
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("sockdash=info"))?;
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    tracing_subscriber::registry().with(file_layer).with(filter).init();
    Ok(())
}

/// Raw mode and the alternate screen, undone on drop (including unwinding).
struct TerminalGuard {
    mouse: bool,
}

impl TerminalGuard {
    fn enter(mouse: bool) -> anyhow::Result<(Self, Terminal<CrosstermBackend<Stdout>>)> {
        enable_raw_mode()?;
        let guard = Self { mouse };
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok((guard, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        let _ = execute!(stdout, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &DashboardConfig,
    api: ApiClient,
) -> anyhow::Result<()> {
    let cache = QueryClient::new();
    let mut events = EventHandler::new(config.tick_rate);
    events.forward_queries(cache.subscribe());

    let mut app = dashboards::build(config.target, &api, &cache);
    info!(dashboard = %config.target, url = %config.base_url, "dashboard started");

    while app.running {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        let Some(event) = events.next().await else {
            break;
        };
        match event {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
            // Terminal redraws at the new size on the next pass.
            AppEvent::Resize(_, _) => {}
            AppEvent::Tick => app.on_tick(),
            AppEvent::Query(event) => app.on_query_event(&event),
        }
    }

    info!("dashboard stopped");
    Ok(())
}
