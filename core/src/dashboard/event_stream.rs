// Chart update streaming for Dashboard
//
// Uses tokio broadcast channel to fan chart updates out to multiple SSE clients.
// The latest full update (both charts) is kept in a watch slot so a client that
// lagged behind the broadcast buffer can be resynchronised.

use crate::controller::ChartUpdate;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Chart update broadcaster
#[derive(Clone)]
pub struct ChartBroadcaster {
    sender: broadcast::Sender<ChartUpdate>,
    latest: Arc<watch::Sender<Option<ChartUpdate>>>,
}

impl ChartBroadcaster {
    /// Create a new broadcaster with buffer size
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let (latest, _) = watch::channel(None);
        Self {
            sender,
            latest: Arc::new(latest),
        }
    }

    /// Broadcast an update to all subscribers
    pub fn broadcast(&self, update: ChartUpdate) {
        // Ignore error if no subscribers
        let _ = self.sender.send(update);
    }

    /// Replace the full update handed to clients that need a resync
    pub fn record_latest(&self, full: ChartUpdate) {
        self.latest.send_replace(Some(full));
    }

    /// Latest full update, if the controller has published one
    pub fn latest(&self) -> Option<ChartUpdate> {
        self.latest.borrow().clone()
    }

    /// Subscribe to updates
    pub fn subscribe(&self) -> broadcast::Receiver<ChartUpdate> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChartBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}
