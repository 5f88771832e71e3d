//! Status dimensions of an order and the derived table status.
//!
//! Each enum serializes to the snake_case names used on the wire
//! (`pending_validation`, `not_sent`, `occupied_awaiting`, ...).

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Dine-in orders sit at a table; takeaway orders never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::Takeaway => "takeaway",
        }
    }
}

/// Lifecycle of an order, forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Customer self-service order waiting for staff confirmation.
    PendingValidation,
    InProgress,
    Finalized,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingValidation => "pending_validation",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Finalized => "finalized",
        }
    }

    pub(crate) fn rank(&self) -> u8 {
        *self as u8
    }
}

/// Preparation pipeline of an order.
///
/// The declaration order is the pipeline order; `rank` is used by the
/// validator to reject skips and regressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitchenStatus {
    NotSent,
    Received,
    Ready,
    Served,
    /// Takeaway or customer order handed off.
    Delivered,
}

impl KitchenStatus {
    pub const PIPELINE: [KitchenStatus; 5] = [
        KitchenStatus::NotSent,
        KitchenStatus::Received,
        KitchenStatus::Ready,
        KitchenStatus::Served,
        KitchenStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KitchenStatus::NotSent => "not_sent",
            KitchenStatus::Received => "received",
            KitchenStatus::Ready => "ready",
            KitchenStatus::Served => "served",
            KitchenStatus::Delivered => "delivered",
        }
    }

    pub(crate) fn rank(&self) -> u8 {
        *self as u8
    }

    /// The single legal successor, if any.
    pub fn next(&self) -> Option<KitchenStatus> {
        Self::PIPELINE.get(self.rank() as usize + 1).copied()
    }

    /// Whether the order still waits on the kitchen.
    pub fn is_awaiting(&self) -> bool {
        matches!(self, KitchenStatus::NotSent | KitchenStatus::Received)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Sent,
    Cancelled,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Sent => "sent",
            ItemStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Card => "card",
        }
    }
}

/// Displayed status of a table. Never stored; see [`crate::table_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Free,
    OccupiedAwaiting,
    OccupiedServed,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Free => "free",
            TableStatus::OccupiedAwaiting => "occupied_awaiting",
            TableStatus::OccupiedServed => "occupied_served",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    OrderType,
    OrderStatus,
    KitchenStatus,
    ItemStatus,
    PaymentStatus,
    PaymentMethod,
    TableStatus
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitchen_pipeline_successors() {
        assert_eq!(KitchenStatus::NotSent.next(), Some(KitchenStatus::Received));
        assert_eq!(KitchenStatus::Served.next(), Some(KitchenStatus::Delivered));
        assert_eq!(KitchenStatus::Delivered.next(), None);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&OrderStatus::PendingValidation).unwrap();
        assert_eq!(json, "\"pending_validation\"");
        let parsed: KitchenStatus = serde_json::from_str("\"not_sent\"").unwrap();
        assert_eq!(parsed, KitchenStatus::NotSent);
        assert_eq!(TableStatus::OccupiedAwaiting.to_string(), "occupied_awaiting");
    }
}
