//! The change-feed transport between the store and the notification hub.

use crate::error::TransportError;
use crate::repository::StoreChange;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

/// A source of store commit events.
///
/// `connect` may fail or hand back a receiver that later closes; the hub
/// treats both as a transport outage and reconnects.
#[async_trait]
pub trait ChangeFeed: Send + Sync + 'static {
    async fn connect(&self) -> Result<broadcast::Receiver<StoreChange>, TransportError>;
}

/// In-process feed backed by a broadcast channel.
#[derive(Clone)]
pub struct LocalFeed {
    sender: broadcast::Sender<StoreChange>,
}

impl LocalFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a commit. Having no listeners is not an error.
    pub fn publish(&self, change: StoreChange) {
        let revision = change.revision;
        if self.sender.send(change).is_err() {
            trace!(revision, "No change feed listeners");
        }
    }

    /// Number of open transport connections.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl ChangeFeed for LocalFeed {
    async fn connect(&self) -> Result<broadcast::Receiver<StoreChange>, TransportError> {
        Ok(self.sender.subscribe())
    }
}
