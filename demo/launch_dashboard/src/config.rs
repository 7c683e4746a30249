use std::fs;
use std::path::{Path, PathBuf};

use launchdash_core::dashboard::DashboardConfig;
use launchdash_core::telemetry::DEFAULT_LOG_FILTER;

/// High-level configuration for the launch dashboard
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchDashConfig {
    /// CSV file with the launch records
    pub dataset_path: PathBuf,
    pub dashboard: DashboardConfig,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Buffered chart updates per SSE client
    pub broadcast_capacity: usize,
}

impl Default for LaunchDashConfig {
    fn default() -> Self {
        Self {
            dataset_path: std::env::var("LAUNCH_DASH_DATASET")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("spacex_launch_dash.csv")),
            dashboard: DashboardConfig::from_env(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            broadcast_capacity: std::env::var("LAUNCH_DASH_BROADCAST_CAPACITY")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(256),
        }
    }
}

/// Where the effective configuration came from.
///
/// Loading happens before tracing is installed (the file may carry the log
/// filter), so the outcome is returned and logged by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigSource {
    /// No file at the path; defaults and env only
    Defaults(PathBuf),
    /// File overlaid onto defaults and env
    File(PathBuf),
    /// File present but unusable; defaults and env only
    Rejected { path: PathBuf, reason: String },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults(path) => {
                tracing::info!(target: "launch_dashboard", path = %path.display(), "No TOML config found; using defaults/env")
            }
            ConfigSource::File(path) => {
                tracing::info!(target: "launch_dashboard", path = %path.display(), "Loaded TOML config")
            }
            ConfigSource::Rejected { path, reason } => {
                tracing::warn!(target: "launch_dashboard", path = %path.display(), error = %reason, "Ignoring TOML config; using defaults/env")
            }
        }
    }
}

impl LaunchDashConfig {
    /// Load configuration from a TOML file (path via LAUNCH_DASH_CONFIG or ./launch_dash.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> (Self, ConfigSource) {
        let path =
            std::env::var("LAUNCH_DASH_CONFIG").unwrap_or_else(|_| "launch_dash.toml".into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(p: &Path) -> (Self, ConfigSource) {
        let default = Self::default();
        let path = p.to_path_buf();
        if !p.exists() {
            return (default, ConfigSource::Defaults(path));
        }
        let parsed = fs::read_to_string(p)
            .map_err(|e| format!("failed to read: {}", e))
            .and_then(|s| {
                toml::from_str::<LaunchDashToml>(&s).map_err(|e| format!("failed to parse: {}", e))
            });
        match parsed {
            Ok(t) => (t.overlay(default), ConfigSource::File(path)),
            Err(reason) => (default, ConfigSource::Rejected { path, reason }),
        }
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct LaunchDashToml {
    pub dataset_path: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub broadcast_capacity: Option<usize>,
    pub dashboard: Option<DashboardToml>,
}

impl LaunchDashToml {
    fn overlay(self, mut base: LaunchDashConfig) -> LaunchDashConfig {
        if let Some(p) = self.dataset_path {
            base.dataset_path = p;
        }
        if let Some(f) = self.log_filter {
            base.log_filter = f;
        }
        if let Some(c) = self.broadcast_capacity {
            base.broadcast_capacity = c.max(1);
        }
        if let Some(d) = self.dashboard {
            d.apply(&mut base.dashboard);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct DashboardToml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl DashboardToml {
    fn apply(self, d: &mut DashboardConfig) {
        if let Some(h) = self.host {
            d.host = h;
        }
        if let Some(p) = self.port {
            d.port = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let (cfg, source) = LaunchDashConfig::load_from(&path);
        assert_eq!(cfg, LaunchDashConfig::default());
        assert_eq!(source, ConfigSource::Defaults(path));
    }

    #[test]
    fn partial_toml_overlays_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "dataset_path = \"data/launches.csv\"\n[dashboard]\nport = 9100"
        )
        .unwrap();

        let base = LaunchDashConfig::default();
        let (cfg, source) = LaunchDashConfig::load_from(file.path());
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
        assert_eq!(cfg.dataset_path, PathBuf::from("data/launches.csv"));
        assert_eq!(cfg.dashboard.port, 9100);
        assert_eq!(cfg.dashboard.host, base.dashboard.host);
        assert_eq!(cfg.broadcast_capacity, base.broadcast_capacity);
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dataset_path = [not toml").unwrap();
        let (cfg, source) = LaunchDashConfig::load_from(file.path());
        assert_eq!(cfg, LaunchDashConfig::default());
        match source {
            ConfigSource::Rejected { path, reason } => {
                assert_eq!(path, file.path());
                assert!(reason.starts_with("failed to parse"), "reason was {reason}");
            }
            other => panic!("expected rejected config, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_path_is_rejected() {
        // a directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        let (cfg, source) = LaunchDashConfig::load_from(dir.path());
        assert_eq!(cfg, LaunchDashConfig::default());
        assert!(
            matches!(&source, ConfigSource::Rejected { reason, .. } if reason.starts_with("failed to read")),
            "got {source:?}"
        );
    }
}
