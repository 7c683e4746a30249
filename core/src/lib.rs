// Launch Dash Core Library
// Launch records dashboard: dataset store, filters, aggregation, reactive chart updates

pub mod aggregate;
pub mod chart;
pub mod controller;
pub mod dashboard;
pub mod dataset;
pub mod filter;
pub mod layout;
pub mod telemetry;

// Export core types
pub use aggregate::{
    aggregate_by_outcome, aggregate_by_site, OutcomeAggregate, OutcomeCounts, SiteSuccessTotals,
};
pub use chart::{PieChart, PieSlice, ScatterChart, ScatterPoint, ScatterSeries};
pub use controller::{
    ChartController, ChartSnapshot, ChartUpdate, ControlEvent, ControlState, ControllerHandle,
};
pub use dataset::{Dataset, LaunchRecord, OutcomeClass};
pub use filter::{filter_by_payload, filter_by_site, PayloadRange, SiteSelection};
pub use layout::DashboardLayout;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("Dataset has no records with a payload mass")]
    EmptyDataset,

    #[error("Chart controller is closed")]
    ControllerClosed,

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, DashError>;

use dashboard::{ChartBroadcaster, DashboardConfig, DashboardServer};
use std::path::Path;
use std::sync::Arc;

/// Core runtime: the loaded dataset plus the controller task that owns the control state
pub struct LaunchDash {
    pub dataset: Arc<Dataset>,
    pub broadcaster: ChartBroadcaster,
    pub controller: ControllerHandle,
}

impl LaunchDash {
    /// Load the dataset and spawn the controller. Must run inside a tokio runtime.
    pub fn load<P: AsRef<Path>>(path: P, broadcast_capacity: usize) -> Result<Self> {
        let dataset = Arc::new(Dataset::load(path)?);
        Ok(Self::with_dataset(dataset, broadcast_capacity))
    }

    pub fn with_dataset(dataset: Arc<Dataset>, broadcast_capacity: usize) -> Self {
        let broadcaster = ChartBroadcaster::new(broadcast_capacity);
        let controller = ControllerHandle::spawn(Arc::clone(&dataset), broadcaster.clone());
        Self {
            dataset,
            broadcaster,
            controller,
        }
    }

    /// Build the HTTP server for this runtime
    pub fn dashboard(&self, config: DashboardConfig) -> DashboardServer {
        DashboardServer::new(
            config,
            Arc::clone(&self.dataset),
            self.controller.clone(),
            self.broadcaster.clone(),
        )
    }

    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutting down Launch Dash...");
        self.controller.shutdown().await?;
        tracing::info!("Launch Dash shut down successfully");
        Ok(())
    }
}
