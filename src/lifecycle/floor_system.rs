use crate::catalog::Catalog;
use crate::clients::{Capabilities, CustomerClient, CustomerSession, KitchenClient, StaffClient};
use crate::counter::NotificationCounter;
use crate::error::SystemError;
use crate::lifecycle::SystemConfig;
use crate::model::OrderId;
use crate::notify::{LocalFeed, NotificationClient, NotificationHub};
use crate::repository::{self, RepositoryClient, RepositoryContext};
use crate::tracker::TrackerHandle;
use std::sync::Arc;
use tracing::{error, info};

/// Starts the repository and the notification hub and hands out role clients.
///
/// # Architecture
///
/// - **Repository actor**: owns every order and table, processes one request
///   at a time and publishes each commit on the change feed.
/// - **Notification hub**: relays commits from the change feed to
///   subscribers as payload-free signals.
///
/// # Example
///
/// ```ignore
/// let system = FloorSystem::new(SystemConfig::from_env()?, Arc::new(catalog));
///
/// let order = system.staff.create_order(NewOrder::takeaway(items)).await?;
/// let tracker = system.track(order.id);
///
/// system.shutdown().await?;
/// ```
pub struct FloorSystem {
    pub staff: StaffClient,
    pub kitchen: KitchenClient,
    pub customer: CustomerClient,
    pub notifications: NotificationClient,

    repository: RepositoryClient,
    feed: LocalFeed,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl FloorSystem {
    /// Creates the system with both actors running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: SystemConfig, catalog: Arc<dyn Catalog>) -> Self {
        let feed = LocalFeed::new(config.notification.change_feed_capacity);

        let (repository_actor, repository) = repository::new(config.repository_buffer, config.default_page_size);
        let repository_handle = tokio::spawn(repository_actor.run(RepositoryContext {
            catalog,
            feed: feed.clone(),
        }));

        let (hub, notifications) = NotificationHub::new(Arc::new(feed.clone()), config.notification.clone());
        let hub_handle = tokio::spawn(hub.run());

        Self {
            staff: StaffClient::new(repository.clone(), Capabilities::READ_WRITE),
            kitchen: KitchenClient::new(repository.clone()),
            customer: CustomerClient::new(repository.clone()),
            notifications,
            repository,
            feed,
            handles: vec![repository_handle, hub_handle],
        }
    }

    /// The feed the repository publishes commits on.
    pub fn feed(&self) -> &LocalFeed {
        &self.feed
    }

    /// Starts following one order as its customer would.
    pub fn track(&self, order_id: OrderId) -> TrackerHandle {
        TrackerHandle::start(order_id, self.customer.clone(), self.notifications.clone())
    }

    /// A fresh customer device: empty cart, nothing tracked.
    pub fn customer_session(&self) -> CustomerSession {
        CustomerSession::new(self.customer.clone(), self.notifications.clone())
    }

    /// Starts the staff badge counter.
    pub fn notification_counter(&self) -> NotificationCounter {
        NotificationCounter::start(self.repository.clone(), self.notifications.clone())
    }

    /// Drops every client, then waits for both actors to finish.
    ///
    /// Trackers, counters and subscriptions created from this system hold
    /// clients too; drop them first or shutdown waits for them.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.staff);
        drop(self.kitchen);
        drop(self.customer);
        drop(self.notifications);
        drop(self.repository);
        drop(self.feed);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
