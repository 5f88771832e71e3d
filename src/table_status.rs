//! Displayed table status, derived on every read.

use crate::model::{KitchenSummary, Table, TableStatus, TableView};
use tracing::warn;

/// Outcome of resolving one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub status: TableStatus,
    /// Set when the table references an order that cannot be found.
    pub needs_repair: bool,
}

/// Derives a table's status from its linked order's kitchen summary.
///
/// `linked` is whatever the caller could read for `table.linked_order`; `None`
/// while a link is set means the reference is orphaned. Orphans resolve to
/// `free` and are flagged rather than treated as an error.
pub fn resolve(table: &Table, linked: Option<&KitchenSummary>) -> Resolution {
    let Some(order_id) = table.linked_order else {
        return Resolution {
            status: TableStatus::Free,
            needs_repair: false,
        };
    };

    match linked {
        Some(summary) if summary.order_id == order_id => Resolution {
            status: if summary.kitchen_status.is_awaiting() {
                TableStatus::OccupiedAwaiting
            } else {
                TableStatus::OccupiedServed
            },
            needs_repair: false,
        },
        _ => {
            warn!(table_id = %table.id, %order_id, "Orphaned order reference, flag for repair");
            Resolution {
                status: TableStatus::Free,
                needs_repair: true,
            }
        }
    }
}

/// Builds the joined view returned by table reads.
pub fn view(table: Table, linked: Option<KitchenSummary>) -> TableView {
    let resolution = resolve(&table, linked.as_ref());
    TableView {
        table,
        kitchen: linked,
        status: resolution.status,
        needs_repair: resolution.needs_repair,
    }
}
