//! Follows one order for the customer who placed it.
//!
//! The tracker subscribes first and fetches second, then re-fetches the order
//! on every signal. It only ever reads.

use crate::clients::CustomerClient;
use crate::error::RepositoryError;
use crate::model::{Order, OrderId};
use crate::notify::{NotificationClient, Topic};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What the customer sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerView {
    Loading,
    Tracking(Order),
    /// The order does not exist. Terminal: the tracker stops.
    NotFound,
    /// A read failed. The tracker keeps listening and retries on the next signal.
    Unavailable,
}

impl TrackerView {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TrackerView::NotFound)
    }

    pub fn order(&self) -> Option<&Order> {
        match self {
            TrackerView::Tracking(order) => Some(order),
            _ => None,
        }
    }
}

/// A running tracker. Dropping it stops tracking.
pub struct TrackerHandle {
    order_id: OrderId,
    view: watch::Receiver<TrackerView>,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    pub fn start(order_id: OrderId, customer: CustomerClient, notifications: NotificationClient) -> Self {
        let (publisher, view) = watch::channel(TrackerView::Loading);
        let task = tokio::spawn(follow(order_id, customer, notifications, publisher));
        Self { order_id, view, task }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// The view as of now.
    pub fn view(&self) -> TrackerView {
        self.view.borrow().clone()
    }

    /// A receiver for rendering loops.
    pub fn watch(&self) -> watch::Receiver<TrackerView> {
        self.view.clone()
    }

    /// Waits until the view satisfies `ready`. `None` if the tracker stopped first.
    pub async fn wait_for(&mut self, ready: impl FnMut(&TrackerView) -> bool) -> Option<TrackerView> {
        self.view.wait_for(ready).await.ok().map(|view| view.clone())
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn publish(publisher: &watch::Sender<TrackerView>, next: TrackerView) {
    publisher.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

async fn follow(
    order_id: OrderId,
    customer: CustomerClient,
    notifications: NotificationClient,
    publisher: watch::Sender<TrackerView>,
) {
    let mut subscription = match notifications.subscribe(Topic::OrdersChanged).await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(%order_id, error = %e, "Tracker could not subscribe");
            publish(&publisher, TrackerView::Unavailable);
            return;
        }
    };

    loop {
        let next = match customer.order(order_id).await {
            Ok(order) => TrackerView::Tracking(order),
            Err(RepositoryError::NotFound(_)) => {
                info!(%order_id, "Tracked order not found");
                publish(&publisher, TrackerView::NotFound);
                return;
            }
            Err(e) => {
                warn!(%order_id, error = %e, "Order status temporarily unavailable");
                TrackerView::Unavailable
            }
        };
        publish(&publisher, next);
        if publisher.is_closed() {
            return;
        }

        match subscription.recv().await {
            Ok(signal) => debug!(%order_id, ?signal, "Refreshing tracked order"),
            Err(e) => {
                warn!(%order_id, error = %e, "Tracker lost its subscription");
                publish(&publisher, TrackerView::Unavailable);
                return;
            }
        }
    }
}
