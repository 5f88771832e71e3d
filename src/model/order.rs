//! Orders and their item lines.
//!
//! An [`Order`] owns its [`OrderItem`]s. `total` and `profit` are private and only
//! change through [`Order::recompute_totals`], which the repository calls in the
//! same unit of work as every item mutation.

use crate::model::{ItemStatus, KitchenStatus, OrderStatus, OrderType, PaymentMethod, PaymentStatus, TableId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Amounts in minor currency units.
pub type Money = i64;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Type-safe identifier for order lines. Unique across all orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderItemId(pub u32);

impl From<u32> for OrderItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// Contact details attached to customer self-service orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Product name and prices as they were when the line was created.
///
/// There are no setters: a snapshot is captured once and never re-synced with
/// the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    product_ref: String,
    name: String,
    unit_price: Money,
    unit_cost: Money,
}

impl ProductSnapshot {
    pub fn capture(
        product_ref: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        unit_cost: Money,
    ) -> Self {
        Self {
            product_ref: product_ref.into(),
            name: name.into(),
            unit_price,
            unit_cost,
        }
    }

    pub fn product_ref(&self) -> &str {
        &self.product_ref
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn unit_cost(&self) -> Money {
        self.unit_cost
    }
}

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    snapshot: ProductSnapshot,
    pub quantity: u32,
    /// Kitchen-facing only; does not affect price or cost.
    pub excluded_ingredients: BTreeSet<String>,
    pub comment: Option<String>,
    pub status: ItemStatus,
    pub sent_at: Option<DateTime<Utc>>,
}

impl OrderItem {
    pub fn new(id: OrderItemId, snapshot: ProductSnapshot, draft: ItemDraft) -> Self {
        Self {
            id,
            snapshot,
            quantity: draft.quantity,
            excluded_ingredients: draft.excluded_ingredients,
            comment: draft.comment,
            status: ItemStatus::Pending,
            sent_at: None,
        }
    }

    pub fn snapshot(&self) -> &ProductSnapshot {
        &self.snapshot
    }

    pub fn line_total(&self) -> Money {
        self.snapshot.unit_price * Money::from(self.quantity)
    }

    pub fn line_profit(&self) -> Money {
        (self.snapshot.unit_price - self.snapshot.unit_cost) * Money::from(self.quantity)
    }

    pub fn is_billable(&self) -> bool {
        self.status != ItemStatus::Cancelled
    }
}

/// Lifecycle milestones, each stamped at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    SentToKitchen,
    Ready,
    Served,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTimestamps {
    pub created_at: DateTime<Utc>,
    pub sent_to_kitchen_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub served_at: Option<DateTime<Utc>>,
}

impl OrderTimestamps {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            sent_to_kitchen_at: None,
            ready_at: None,
            served_at: None,
        }
    }

    fn latest(&self) -> DateTime<Utc> {
        [self.sent_to_kitchen_at, self.ready_at, self.served_at]
            .into_iter()
            .flatten()
            .fold(self.created_at, DateTime::max)
    }

    /// Sets the milestone if it is still unset. The stored value is never
    /// earlier than any stamp already present, so the sequence stays monotonic
    /// even if the wall clock steps back.
    pub fn stamp(&mut self, milestone: Milestone, now: DateTime<Utc>) {
        let at = now.max(self.latest());
        let slot = match milestone {
            Milestone::SentToKitchen => &mut self.sent_to_kitchen_at,
            Milestone::Ready => &mut self.ready_at,
            Milestone::Served => &mut self.served_at,
        };
        if slot.is_none() {
            *slot = Some(at);
        }
    }
}

/// One customer consumption session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_type: OrderType,
    pub table_id: Option<TableId>,
    /// Name of `table_id`, joined from the table on every read.
    pub table_name: Option<String>,
    pub covers: u32,
    pub status: OrderStatus,
    pub kitchen_status: KitchenStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    items: Vec<OrderItem>,
    total: Money,
    profit: Money,
    pub timestamps: OrderTimestamps,
    pub client_info: Option<ClientInfo>,
    pub receipt_url: Option<String>,
    pub payment_receipt_url: Option<String>,
}

impl Order {
    pub fn new(id: OrderId, order_type: OrderType, status: OrderStatus, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            order_type,
            table_id: None,
            table_name: None,
            covers: 0,
            status,
            kitchen_status: KitchenStatus::NotSent,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            items: Vec::new(),
            total: 0,
            profit: 0,
            timestamps: OrderTimestamps::new(created_at),
            client_info: None,
            receipt_url: None,
            payment_receipt_url: None,
        }
    }

    /// Items in entry order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, id: OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn item_mut(&mut self, id: OrderItemId) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut OrderItem> {
        self.items.iter_mut()
    }

    /// Appends lines and recomputes totals.
    pub fn push_items(&mut self, items: impl IntoIterator<Item = OrderItem>) {
        self.items.extend(items);
        self.recompute_totals();
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn profit(&self) -> Money {
        self.profit
    }

    pub fn recompute_totals(&mut self) {
        let billable = self.items.iter().filter(|item| item.is_billable());
        let (total, profit) = billable.fold((0, 0), |(total, profit), item| {
            (total + item.line_total(), profit + item.line_profit())
        });
        self.total = total;
        self.profit = profit;
    }

    pub fn is_settled(&self) -> bool {
        self.status == OrderStatus::Finalized && self.payment_status == PaymentStatus::Paid
    }
}

/// A requested line, before the catalog snapshot is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub product_ref: String,
    pub quantity: u32,
    #[serde(default)]
    pub excluded_ingredients: BTreeSet<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ItemDraft {
    pub fn new(product_ref: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_ref: product_ref.into(),
            quantity,
            excluded_ingredients: BTreeSet::new(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn without(mut self, ingredient: impl Into<String>) -> Self {
        self.excluded_ingredients.insert(ingredient.into());
        self
    }
}

/// Payload for a staff-entered order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_type: OrderType,
    pub table_id: Option<TableId>,
    pub covers: u32,
    pub items: Vec<ItemDraft>,
}

impl NewOrder {
    pub fn dine_in(table_id: TableId, covers: u32, items: Vec<ItemDraft>) -> Self {
        Self {
            order_type: OrderType::DineIn,
            table_id: Some(table_id),
            covers,
            items,
        }
    }

    pub fn takeaway(items: Vec<ItemDraft>) -> Self {
        Self {
            order_type: OrderType::Takeaway,
            table_id: None,
            covers: 0,
            items,
        }
    }
}

/// Payload submitted by the customer self-service surface.
#[derive(Debug, Clone)]
pub struct CustomerOrder {
    pub client_info: ClientInfo,
    pub items: Vec<ItemDraft>,
    pub receipt_url: Option<String>,
}

/// Changes to a pending line. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub quantity: Option<u32>,
    pub comment: Option<Option<String>>,
    pub excluded_ingredients: Option<BTreeSet<String>>,
}

/// How an order was paid, as reported by the cashier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub method: Option<PaymentMethod>,
    /// Opaque URL returned by the upload service.
    pub receipt_url: Option<String>,
}

impl PaymentDetails {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method: Some(method),
            receipt_url: None,
        }
    }

    pub fn with_receipt(mut self, url: impl Into<String>) -> Self {
        self.receipt_url = Some(url.into());
        self
    }
}

/// Selection for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    Status(OrderStatus),
    Kitchen(KitchenStatus),
    /// Orders the kitchen still has to hand off, oldest sent first.
    KitchenQueue,
}
