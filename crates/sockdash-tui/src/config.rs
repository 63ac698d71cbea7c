//! Dashboard configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use sockdash_api::Provider;

/// Default management API address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9100";

/// Which service the dashboard watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Target {
    /// Backend management API.
    #[default]
    Backend,
    /// Docker API frontend management server.
    Frontend,
    /// AWS simulator.
    Aws,
    /// GCP simulator.
    Gcp,
    /// Azure simulator.
    Azure,
}

impl Target {
    /// Simulator provider, if this target is a simulator.
    #[must_use]
    pub const fn provider(self) -> Option<Provider> {
        match self {
            Self::Aws => Some(Provider::Aws),
            Self::Gcp => Some(Provider::Gcp),
            Self::Azure => Some(Provider::Azure),
            Self::Backend | Self::Frontend => None,
        }
    }

    /// Dashboard title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Backend => "Backend",
            Self::Frontend => "Frontend",
            Self::Aws => "AWS Simulator",
            Self::Gcp => "GCP Simulator",
            Self::Azure => "Azure Simulator",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
        })
    }
}

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the watched service.
    pub base_url: String,
    /// Dashboard to show.
    pub target: Target,
    /// Redraw tick interval.
    pub tick_rate: Duration,
    /// Log file; logs are discarded when unset.
    pub log_file: Option<PathBuf>,
    /// Capture mouse events.
    pub mouse: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            target: Target::default(),
            tick_rate: Duration::from_millis(250),
            log_file: None,
            mouse: true,
        }
    }
}

impl DashboardConfig {
    /// Configuration watching `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the dashboard target.
    #[must_use]
    pub const fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Set the redraw tick interval.
    #[must_use]
    pub const fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Write logs to `path`.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Enable or disable mouse capture.
    #[must_use]
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.base_url, "http://localhost:9100");
        assert_eq!(config.target, Target::Backend);
        assert_eq!(config.tick_rate, Duration::from_millis(250));
        assert!(config.log_file.is_none());
        assert!(config.mouse);
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::new("http://sim:4566")
            .with_target(Target::Aws)
            .with_tick_rate(Duration::from_millis(100))
            .with_log_file("/tmp/sockdash.log")
            .with_mouse(false);

        assert_eq!(config.base_url, "http://sim:4566");
        assert_eq!(config.target, Target::Aws);
        assert_eq!(config.tick_rate, Duration::from_millis(100));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/sockdash.log")));
        assert!(!config.mouse);
    }

    #[test]
    fn test_target_provider() {
        assert_eq!(Target::Gcp.provider(), Some(Provider::Gcp));
        assert_eq!(Target::Backend.provider(), None);
        assert_eq!(Target::Azure.to_string(), "azure");
    }
}
