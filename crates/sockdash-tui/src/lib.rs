//! # sockdash-tui
//!
//! Terminal dashboards for a sockerless backend, its Docker API frontend and
//! the AWS, GCP and Azure simulators.
//!
//! The binary picks a dashboard with `--target`, builds its pages in
//! [`dashboards`], and runs the event loop: terminal input and cache
//! notifications arrive as [`events::AppEvent`]s, [`app::App`] routes them,
//! and [`ui::draw`] redraws from cached query state. The snapshot
//! subcommands in [`snapshot`] print the same tables as plain text.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod columns;
pub mod config;
pub mod dashboards;
pub mod error;
pub mod events;
pub mod pages;
pub mod queries;
pub mod router;
pub mod snapshot;
pub mod table;
pub mod ui;
pub mod widgets;

pub use app::{App, Focus};
pub use config::{DashboardConfig, Target};
pub use error::{TuiError, TuiResult};
