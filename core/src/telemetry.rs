// Logging setup
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info,launchdash_core=info,launch_dashboard=info";

/// Install the global fmt subscriber. `RUST_LOG` wins over `fallback_filter`.
///
/// Returns `false` if a subscriber was already installed (tests call this repeatedly).
pub fn init_tracing(fallback_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
