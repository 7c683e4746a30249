mod config;
use config::LaunchDashConfig;
use launchdash_core::telemetry::init_tracing;
use launchdash_core::LaunchDash;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults + env + optional TOML overlay)
    let (cfg, source) = LaunchDashConfig::load();

    // Logging / tracing; the config file may set the filter, so it is read first
    init_tracing(&cfg.log_filter);
    source.log();

    info!(
        target: "launch_dashboard",
        dataset = %cfg.dataset_path.display(),
        "Starting launch records dashboard"
    );

    // Dataset load failures abort before anything is served
    let dash = LaunchDash::load(&cfg.dataset_path, cfg.broadcast_capacity).map_err(|e| {
        error!(target: "launch_dashboard", error = %e, "Failed to load launch dataset");
        e
    })?;

    // Ctrl+C handler to shutdown gracefully
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(target: "launch_dashboard", error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!(target: "launch_dashboard", "Shutting down...");
    };

    let server_result = dash
        .dashboard(cfg.dashboard.clone())
        .serve_with_shutdown(shutdown)
        .await;

    dash.shutdown().await.ok();
    server_result.map_err(|e| e.into())
}
