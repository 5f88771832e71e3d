use crate::model::{KitchenStatus, OrderId, TableStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(pub u32);

impl From<u32> for TableId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table_{}", self.0)
    }
}

/// A physical seating unit.
///
/// Has no status field: the displayed status is resolved from the linked
/// order on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub capacity: u32,
    pub linked_order: Option<OrderId>,
    /// Mirrors the linked order's covers; 0 when free.
    pub covers: u32,
}

impl Table {
    pub fn new(id: TableId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            linked_order: None,
            covers: 0,
        }
    }
}

/// Payload for creating a new table.
#[derive(Debug, Clone)]
pub struct TableCreate {
    pub name: String,
    pub capacity: u32,
}

/// Payload for editing a table's configuration.
#[derive(Debug, Clone, Default)]
pub struct TableUpdate {
    pub name: Option<String>,
    pub capacity: Option<u32>,
}

/// The part of a linked order the table resolver needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenSummary {
    pub order_id: OrderId,
    pub kitchen_status: KitchenStatus,
    /// When the order first reached the kitchen, for wait-time displays.
    pub sent_to_kitchen_at: Option<DateTime<Utc>>,
}

/// A table joined with its linked order's kitchen summary, read in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub table: Table,
    pub kitchen: Option<KitchenSummary>,
    pub status: TableStatus,
    /// The table points at an order that no longer exists.
    pub needs_repair: bool,
}
