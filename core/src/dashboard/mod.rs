// Dashboard module - launch records web page
//
// Serves the page, the layout description, chart snapshots, control endpoints,
// and an SSE stream of chart updates.

mod api;
mod event_stream;
mod static_assets;

pub use api::{router, DashboardServer};
pub use event_stream::ChartBroadcaster;

const DEFAULT_PORT: u16 = 8050;
const DEFAULT_HOST: &str = "127.0.0.1";

/// Dashboard configuration
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub port: u16,
    pub host: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("LAUNCH_DASH_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            host: std::env::var("LAUNCH_DASH_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
