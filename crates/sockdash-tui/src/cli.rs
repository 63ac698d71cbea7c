//! Command-line argument parsing with clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{DashboardConfig, Target, DEFAULT_BASE_URL};

/// sockdash - terminal dashboards for sockerless backends and simulators.
#[derive(Parser, Debug, Clone)]
#[command(name = "sockdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the service to watch.
    #[arg(short, long, env = "SOCKDASH_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Dashboard to show.
    #[arg(short, long, value_enum, env = "SOCKDASH_TARGET", default_value_t = Target::Backend)]
    pub target: Target,

    /// Write logs to this file.
    #[arg(long, env = "SOCKDASH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Redraw interval in milliseconds.
    #[arg(long, default_value_t = 250)]
    pub tick_ms: u64,

    /// Disable mouse capture.
    #[arg(long)]
    pub no_mouse: bool,

    /// Print a snapshot instead of opening the dashboard.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Snapshot subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show backend health and status.
    Status,

    /// List cloud resources tracked by the backend.
    Resources {
        /// Include cleaned-up resources.
        #[arg(short, long)]
        all: bool,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// List containers known to the backend.
    Containers {
        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Filter and sort options for table snapshots.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Only rows with a cell containing this text (case-insensitive).
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Sort by a column: `name`, `name:asc` or `name:desc`.
    #[arg(short, long)]
    pub sort: Option<String>,
}

impl Cli {
    /// Dashboard configuration from the parsed arguments.
    #[must_use]
    pub fn config(&self) -> DashboardConfig {
        let config = DashboardConfig::new(self.url.clone())
            .with_target(self.target)
            .with_tick_rate(Duration::from_millis(self.tick_ms.max(1)))
            .with_mouse(!self.no_mouse);
        match &self.log_file {
            Some(path) => config.with_log_file(path.clone()),
            None => config,
        }
    }
}
