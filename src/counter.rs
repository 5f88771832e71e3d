//! Badge counts for the staff screen.

use crate::error::RepositoryError;
use crate::model::{KitchenStatus, Order, OrderFilter, OrderStatus};
use crate::notify::{NotificationClient, Topic};
use crate::repository::RepositoryClient;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationCounts {
    /// Customer orders waiting for a staff member to validate them.
    pub pending_validation: usize,
    /// Orders the kitchen has received but not finished.
    pub in_kitchen: usize,
    /// Orders ready to be carried to the table.
    pub ready_to_serve: usize,
}

impl NotificationCounts {
    pub fn total(&self) -> usize {
        self.pending_validation + self.in_kitchen + self.ready_to_serve
    }
}

pub fn count(orders: &[Order]) -> NotificationCounts {
    orders.iter().fold(NotificationCounts::default(), |mut counts, order| {
        if order.status == OrderStatus::PendingValidation {
            counts.pending_validation += 1;
        }
        match order.kitchen_status {
            KitchenStatus::Received => counts.in_kitchen += 1,
            KitchenStatus::Ready => counts.ready_to_serve += 1,
            _ => {}
        }
        counts
    })
}

/// Keeps [`NotificationCounts`] current by recounting on every signal.
///
/// A failed read leaves the last counts in place.
pub struct NotificationCounter {
    counts: watch::Receiver<NotificationCounts>,
    task: JoinHandle<()>,
}

impl NotificationCounter {
    pub fn start(repository: RepositoryClient, notifications: NotificationClient) -> Self {
        let (publisher, counts) = watch::channel(NotificationCounts::default());
        let task = tokio::spawn(recount(repository, notifications, publisher));
        Self { counts, task }
    }

    pub fn counts(&self) -> NotificationCounts {
        *self.counts.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<NotificationCounts> {
        self.counts.clone()
    }

    /// Waits until the counts satisfy `ready`. `None` if the counter stopped first.
    pub async fn wait_for(&mut self, ready: impl FnMut(&NotificationCounts) -> bool) -> Option<NotificationCounts> {
        self.counts.wait_for(ready).await.ok().map(|counts| *counts)
    }
}

impl Drop for NotificationCounter {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn refresh(repository: &RepositoryClient, publisher: &watch::Sender<NotificationCounts>) {
    let result: Result<Vec<Order>, RepositoryError> = repository.list_orders(OrderFilter::All).await;
    match result {
        Ok(orders) => {
            let next = count(&orders);
            publisher.send_if_modified(|current| {
                let changed = *current != next;
                *current = next;
                changed
            });
        }
        Err(e) => warn!(error = %e, "Could not refresh notification counts"),
    }
}

async fn recount(
    repository: RepositoryClient,
    notifications: NotificationClient,
    publisher: watch::Sender<NotificationCounts>,
) {
    let mut subscription = match notifications.subscribe(Topic::OrdersChanged).await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(error = %e, "Notification counter could not subscribe");
            return;
        }
    };

    refresh(&repository, &publisher).await;
    loop {
        match subscription.recv().await {
            Ok(signal) => {
                debug!(?signal, "Recounting");
                refresh(&repository, &publisher).await;
            }
            Err(e) => {
                warn!(error = %e, "Notification counter stopped");
                return;
            }
        }
        if publisher.is_closed() {
            return;
        }
    }
}
