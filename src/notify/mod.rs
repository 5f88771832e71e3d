//! Signal-only publish/subscribe between the store and its readers.
//!
//! The repository publishes every commit on a [`ChangeFeed`]. The
//! [`NotificationHub`] relays commits to [`Subscription`]s as payload-free
//! [`Signal`]s; subscribers re-read whatever they display.

pub mod feed;
pub mod hub;
pub mod subscription;

pub use feed::{ChangeFeed, LocalFeed};
pub use hub::{NotificationClient, NotificationHub};
pub use subscription::Subscription;

use crate::repository::{ChangedEntity, StoreChange};

/// Notification topics. There is one, covering orders, items and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    OrdersChanged,
}

impl Topic {
    /// Wire name of the topic.
    pub fn name(&self) -> &'static str {
        match self {
            Topic::OrdersChanged => "orders_updated",
        }
    }

    /// Whether a commit concerns this topic.
    pub fn covers(&self, change: &StoreChange) -> bool {
        match self {
            Topic::OrdersChanged => change.entities.iter().any(|entity| {
                matches!(
                    entity,
                    ChangedEntity::Orders | ChangedEntity::OrderItems | ChangedEntity::Tables
                )
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Something was committed.
    Changed,
    /// Commits may have been missed (reconnect or lag); refresh everything.
    Resync,
}

/// State of the transport behind a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    /// Waiting to reconnect. `attempt` is the last failed attempt, 0 right
    /// after the drop.
    Disconnected { attempt: u32 },
    /// Reconnecting gave up; subscriptions have ended.
    Failed { attempts: u32 },
}
