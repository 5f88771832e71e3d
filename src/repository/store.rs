//! The authoritative in-memory store.
//!
//! Every public method is one unit of work: it validates everything first and
//! only then mutates, so a failed call leaves the store exactly as it was.
//! Successful writes record which entity kinds changed; the owning actor turns
//! that into a [`StoreChange`] after each request.

use crate::error::RepositoryError;
use crate::model::{
    ClientInfo, ItemDraft, ItemEdit, ItemStatus, KitchenStatus, KitchenSummary, Order, OrderFilter, OrderId,
    OrderItem, OrderItemId, OrderStatus, OrderType, PaymentDetails, PaymentStatus, ProductSnapshot, Table,
    TableCreate, TableId, TableUpdate, TableView,
};
use crate::table_status;
use crate::transition::{
    check_expected, check_item_status, check_kitchen_status, check_order_status, check_payment_status,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Kinds of records a write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedEntity {
    Orders,
    OrderItems,
    Tables,
}

/// Commit event emitted by the store after a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreChange {
    pub revision: u64,
    pub entities: Vec<ChangedEntity>,
}

/// Rejects lines that can never be valid, before the catalog is consulted.
pub fn validate_drafts(drafts: &[ItemDraft]) -> Result<(), RepositoryError> {
    if drafts.is_empty() {
        return Err(RepositoryError::Validation("at least one item is required".into()));
    }
    for draft in drafts {
        if draft.product_ref.trim().is_empty() {
            return Err(RepositoryError::Validation("item without product".into()));
        }
        if draft.quantity == 0 {
            return Err(RepositoryError::Validation(format!(
                "quantity for {} must be positive",
                draft.product_ref
            )));
        }
    }
    Ok(())
}

fn validate_client_info(info: &ClientInfo) -> Result<(), RepositoryError> {
    if info.name.trim().is_empty() {
        return Err(RepositoryError::Validation("client name is required".into()));
    }
    if info.phone.trim().is_empty() {
        return Err(RepositoryError::Validation("client phone is required".into()));
    }
    Ok(())
}

fn priced(
    drafts: Vec<ItemDraft>,
    snapshots: Vec<ProductSnapshot>,
) -> Result<Vec<(ProductSnapshot, ItemDraft)>, RepositoryError> {
    validate_drafts(&drafts)?;
    if drafts.len() != snapshots.len() {
        return Err(RepositoryError::Validation(format!(
            "{} items but {} product snapshots",
            drafts.len(),
            snapshots.len()
        )));
    }
    for (snapshot, draft) in snapshots.iter().zip(&drafts) {
        if snapshot.product_ref() != draft.product_ref {
            return Err(RepositoryError::Validation(format!(
                "snapshot for {} does not match item {}",
                snapshot.product_ref(),
                draft.product_ref
            )));
        }
    }
    Ok(snapshots.into_iter().zip(drafts).collect())
}

fn apply_payment(order: &mut Order, payment: PaymentDetails) {
    order.payment_status = PaymentStatus::Paid;
    order.payment_method = payment.method;
    if payment.receipt_url.is_some() {
        order.payment_receipt_url = payment.receipt_url;
    }
}

fn ensure_open(order: &Order) -> Result<(), RepositoryError> {
    if order.status == OrderStatus::Finalized {
        return Err(RepositoryError::Validation(format!("{} is finalized", order.id)));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct Store {
    orders: BTreeMap<OrderId, Order>,
    tables: BTreeMap<TableId, Table>,
    next_order: u32,
    next_item: u32,
    next_table: u32,
    revision: u64,
    touched: BTreeSet<ChangedEntity>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the change record of the last write, if it changed anything.
    pub fn take_change(&mut self) -> Option<StoreChange> {
        if self.touched.is_empty() {
            return None;
        }
        self.revision += 1;
        let entities = std::mem::take(&mut self.touched).into_iter().collect();
        Some(StoreChange {
            revision: self.revision,
            entities,
        })
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn touch(&mut self, entities: &[ChangedEntity]) {
        self.touched.extend(entities.iter().copied());
    }

    fn order(&self, id: OrderId) -> Result<&Order, RepositoryError> {
        self.orders.get(&id).ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Copy of `order` with its table name joined in.
    fn joined(&self, order: &Order) -> Order {
        let mut order = order.clone();
        order.table_name = order
            .table_id
            .and_then(|table_id| self.tables.get(&table_id))
            .map(|table| table.name.clone());
        order
    }

    fn read(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.order(id).map(|order| self.joined(order))
    }

    fn order_mut(&mut self, id: OrderId) -> Result<&mut Order, RepositoryError> {
        self.orders.get_mut(&id).ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn table(&self, id: TableId) -> Result<&Table, RepositoryError> {
        self.tables.get(&id).ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn linking_table(&self, order_id: OrderId) -> Option<TableId> {
        self.tables
            .values()
            .find(|table| table.linked_order == Some(order_id))
            .map(|table| table.id)
    }

    fn build_items(&mut self, lines: Vec<(ProductSnapshot, ItemDraft)>) -> Vec<OrderItem> {
        lines
            .into_iter()
            .map(|(snapshot, draft)| {
                self.next_item += 1;
                OrderItem::new(OrderItemId(self.next_item), snapshot, draft)
            })
            .collect()
    }

    fn insert_order(&mut self, mut order: Order, lines: Vec<(ProductSnapshot, ItemDraft)>) -> OrderId {
        let items = self.build_items(lines);
        order.push_items(items);
        let id = order.id;
        self.orders.insert(id, order);
        self.touch(&[ChangedEntity::Orders, ChangedEntity::OrderItems]);
        id
    }

    fn next_order_id(&mut self) -> OrderId {
        self.next_order += 1;
        OrderId(self.next_order)
    }

    /// Unlinks every table still pointing at a settled order.
    fn release_if_settled(&mut self, order_id: OrderId) {
        let settled = self.orders.get(&order_id).is_some_and(Order::is_settled);
        if !settled {
            return;
        }
        let mut released = false;
        for table in self.tables.values_mut().filter(|t| t.linked_order == Some(order_id)) {
            table.linked_order = None;
            table.covers = 0;
            released = true;
        }
        if released {
            self.touch(&[ChangedEntity::Tables]);
        }
    }

    fn table_view(&self, table: &Table) -> TableView {
        let summary = table
            .linked_order
            .and_then(|id| self.orders.get(&id))
            .map(|order| KitchenSummary {
                order_id: order.id,
                kitchen_status: order.kitchen_status,
                sent_to_kitchen_at: order.timestamps.sent_to_kitchen_at,
            });
        table_status::view(table.clone(), summary)
    }

    // ---------------------------------------------------------------------
    // Orders
    // ---------------------------------------------------------------------

    /// Creates a staff order. Dine-in orders link their table in the same step.
    pub fn create_order(
        &mut self,
        order_type: OrderType,
        table_id: Option<TableId>,
        covers: u32,
        drafts: Vec<ItemDraft>,
        snapshots: Vec<ProductSnapshot>,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let lines = priced(drafts, snapshots)?;
        let table_id = match (order_type, table_id) {
            (OrderType::DineIn, Some(table_id)) => {
                let table = self.table(table_id)?;
                if let Some(linked) = table.linked_order {
                    return Err(RepositoryError::ReferentialConflict(format!(
                        "{table_id} is already linked to {linked}"
                    )));
                }
                Some(table_id)
            }
            (OrderType::DineIn, None) => {
                return Err(RepositoryError::Validation("dine-in orders need a table".into()));
            }
            (OrderType::Takeaway, Some(_)) => {
                return Err(RepositoryError::Validation("takeaway orders cannot take a table".into()));
            }
            (OrderType::Takeaway, None) if covers > 0 => {
                return Err(RepositoryError::Validation("takeaway orders have no covers".into()));
            }
            (OrderType::Takeaway, None) => None,
        };

        let id = self.next_order_id();
        let mut order = Order::new(id, order_type, OrderStatus::InProgress, now);
        order.table_id = table_id;
        order.covers = covers;
        self.insert_order(order, lines);

        if let Some(table) = table_id.and_then(|table_id| self.tables.get_mut(&table_id)) {
            table.linked_order = Some(id);
            table.covers = covers;
            self.touch(&[ChangedEntity::Tables]);
        }
        self.read(id)
    }

    /// Creates a takeaway order awaiting staff validation.
    pub fn submit_customer_order(
        &mut self,
        client_info: ClientInfo,
        receipt_url: Option<String>,
        drafts: Vec<ItemDraft>,
        snapshots: Vec<ProductSnapshot>,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        validate_client_info(&client_info)?;
        let lines = priced(drafts, snapshots)?;

        let id = self.next_order_id();
        let mut order = Order::new(id, OrderType::Takeaway, OrderStatus::PendingValidation, now);
        order.client_info = Some(client_info);
        order.receipt_url = receipt_url;
        self.insert_order(order, lines);
        self.read(id)
    }

    pub fn get_order(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).map(|order| self.joined(order))
    }

    pub fn list_orders(&self, filter: OrderFilter) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|order| match filter {
                OrderFilter::All => true,
                OrderFilter::Status(status) => order.status == status,
                OrderFilter::Kitchen(kitchen) => order.kitchen_status == kitchen,
                OrderFilter::KitchenQueue => {
                    order.status != OrderStatus::PendingValidation && order.kitchen_status != KitchenStatus::Delivered
                }
            })
            .map(|order| self.joined(order))
            .collect();

        match filter {
            OrderFilter::KitchenQueue => orders.sort_by_key(|order| {
                (
                    order.timestamps.sent_to_kitchen_at.is_none(),
                    order.timestamps.sent_to_kitchen_at,
                    order.timestamps.created_at,
                    order.id,
                )
            }),
            _ => orders.sort_by(|a, b| {
                (b.timestamps.created_at, b.id).cmp(&(a.timestamps.created_at, a.id))
            }),
        }
        orders
    }

    pub fn add_items(
        &mut self,
        order_id: OrderId,
        drafts: Vec<ItemDraft>,
        snapshots: Vec<ProductSnapshot>,
    ) -> Result<Order, RepositoryError> {
        ensure_open(self.order(order_id)?)?;
        let lines = priced(drafts, snapshots)?;

        let items = self.build_items(lines);
        let order = self.order_mut(order_id)?;
        order.push_items(items);
        self.touch(&[ChangedEntity::Orders, ChangedEntity::OrderItems]);
        self.read(order_id)
    }

    /// Edits a line that has not been sent to the kitchen yet.
    pub fn edit_item(
        &mut self,
        order_id: OrderId,
        item_id: OrderItemId,
        edit: ItemEdit,
    ) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        ensure_open(order)?;
        let item = order
            .item(item_id)
            .ok_or_else(|| RepositoryError::NotFound(item_id.to_string()))?;
        if item.status != ItemStatus::Pending {
            return Err(RepositoryError::Validation(format!(
                "{item_id} is {} and can no longer be edited",
                item.status
            )));
        }
        if edit.quantity == Some(0) {
            return Err(RepositoryError::Validation("quantity must be positive".into()));
        }

        let order = self.order_mut(order_id)?;
        if let Some(item) = order.item_mut(item_id) {
            if let Some(quantity) = edit.quantity {
                item.quantity = quantity;
            }
            if let Some(comment) = edit.comment {
                item.comment = comment;
            }
            if let Some(excluded) = edit.excluded_ingredients {
                item.excluded_ingredients = excluded;
            }
        }
        order.recompute_totals();
        self.touch(&[ChangedEntity::Orders, ChangedEntity::OrderItems]);
        self.read(order_id)
    }

    pub fn set_item_status(
        &mut self,
        order_id: OrderId,
        item_id: OrderItemId,
        to: ItemStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        ensure_open(order)?;
        let item = order
            .item(item_id)
            .ok_or_else(|| RepositoryError::NotFound(item_id.to_string()))?;
        check_item_status(item.status, to)?;

        let order = self.order_mut(order_id)?;
        if let Some(item) = order.item_mut(item_id) {
            item.status = to;
            if to == ItemStatus::Sent && item.sent_at.is_none() {
                item.sent_at = Some(now);
            }
        }
        order.recompute_totals();
        self.touch(&[ChangedEntity::Orders, ChangedEntity::OrderItems]);
        self.read(order_id)
    }

    /// Sends every pending line. The first send moves the kitchen to `received`.
    pub fn send_to_kitchen(&mut self, order_id: OrderId, now: DateTime<Utc>) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        ensure_open(order)?;
        if order.status == OrderStatus::PendingValidation {
            return Err(RepositoryError::Validation(format!("{order_id} awaits validation")));
        }
        if !order.items().iter().any(|item| item.status == ItemStatus::Pending) {
            return Err(RepositoryError::Validation(format!("{order_id} has no pending items")));
        }
        let milestone = match order.kitchen_status {
            KitchenStatus::NotSent => check_kitchen_status(KitchenStatus::NotSent, KitchenStatus::Received)?,
            _ => None,
        };

        let order = self.order_mut(order_id)?;
        for item in order.items_mut().filter(|item| item.status == ItemStatus::Pending) {
            item.status = ItemStatus::Sent;
            item.sent_at = Some(now);
        }
        if order.kitchen_status == KitchenStatus::NotSent {
            order.kitchen_status = KitchenStatus::Received;
        }
        if let Some(milestone) = milestone {
            order.timestamps.stamp(milestone, now);
        }
        self.touch(&[ChangedEntity::Orders, ChangedEntity::OrderItems]);
        self.read(order_id)
    }

    /// Compare-and-set on the kitchen status. Orders awaiting validation never
    /// reach the kitchen, and receiving an order sends its pending lines.
    pub fn advance_kitchen(
        &mut self,
        order_id: OrderId,
        from: KitchenStatus,
        to: KitchenStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        if order.status == OrderStatus::PendingValidation {
            return Err(RepositoryError::Validation(format!("{order_id} awaits validation")));
        }
        check_expected("kitchen_status", from, order.kitchen_status, to)?;
        let milestone = check_kitchen_status(order.kitchen_status, to)?;

        let order = self.order_mut(order_id)?;
        let receiving = order.kitchen_status == KitchenStatus::NotSent;
        if receiving {
            for item in order.items_mut().filter(|item| item.status == ItemStatus::Pending) {
                item.status = ItemStatus::Sent;
                item.sent_at = Some(now);
            }
        }
        order.kitchen_status = to;
        if let Some(milestone) = milestone {
            order.timestamps.stamp(milestone, now);
        }
        self.touch(&[ChangedEntity::Orders]);
        if receiving {
            self.touch(&[ChangedEntity::OrderItems]);
        }
        self.read(order_id)
    }

    /// Compare-and-set on the order status. Finalizing a paid order frees its table.
    pub fn set_order_status(
        &mut self,
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        check_expected("order_status", from, order.status, to)?;
        let milestone = check_order_status(order.status, to)?;

        let order = self.order_mut(order_id)?;
        order.status = to;
        if let Some(milestone) = milestone {
            order.timestamps.stamp(milestone, now);
        }
        self.touch(&[ChangedEntity::Orders]);
        self.release_if_settled(order_id);
        self.read(order_id)
    }

    /// Records payment. Paying a finalized order frees its table.
    pub fn mark_paid(&mut self, order_id: OrderId, payment: PaymentDetails) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        check_payment_status(order.payment_status, PaymentStatus::Paid)?;

        let order = self.order_mut(order_id)?;
        apply_payment(order, payment);
        self.touch(&[ChangedEntity::Orders]);
        self.release_if_settled(order_id);
        self.read(order_id)
    }

    /// Administrative `paid -> unpaid`. Does not re-link any table.
    pub fn reverse_payment(&mut self, order_id: OrderId) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        if order.payment_status != PaymentStatus::Paid {
            return Err(RepositoryError::Validation(format!("{order_id} is not paid")));
        }

        let order = self.order_mut(order_id)?;
        order.payment_status = PaymentStatus::Unpaid;
        order.payment_method = None;
        self.touch(&[ChangedEntity::Orders]);
        self.read(order_id)
    }

    /// Finalizes, pays and unlinks in one step.
    pub fn settle_order(
        &mut self,
        order_id: OrderId,
        payment: PaymentDetails,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let order = self.order(order_id)?;
        check_payment_status(order.payment_status, PaymentStatus::Paid)?;
        let milestone = match order.status {
            OrderStatus::Finalized => None,
            status => check_order_status(status, OrderStatus::Finalized)?,
        };

        let order = self.order_mut(order_id)?;
        order.status = OrderStatus::Finalized;
        if let Some(milestone) = milestone {
            order.timestamps.stamp(milestone, now);
        }
        apply_payment(order, payment);
        self.touch(&[ChangedEntity::Orders]);
        self.release_if_settled(order_id);
        self.read(order_id)
    }

    /// Deletes an order nobody references. Finalized or paid orders are history.
    pub fn delete_order(&mut self, order_id: OrderId) -> Result<(), RepositoryError> {
        let order = self.order(order_id)?;
        if let Some(table_id) = self.linking_table(order_id) {
            return Err(RepositoryError::ReferentialConflict(format!(
                "{order_id} is still linked from {table_id}"
            )));
        }
        if order.status == OrderStatus::Finalized || order.payment_status == PaymentStatus::Paid {
            return Err(RepositoryError::Validation(format!(
                "{order_id} is {} and {}, it cannot be deleted",
                order.status, order.payment_status
            )));
        }
        self.orders.remove(&order_id);
        self.touch(&[ChangedEntity::Orders, ChangedEntity::OrderItems]);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    pub fn create_table(&mut self, params: TableCreate) -> Result<TableView, RepositoryError> {
        if params.name.trim().is_empty() {
            return Err(RepositoryError::Validation("table name is required".into()));
        }
        if params.capacity == 0 {
            return Err(RepositoryError::Validation("table capacity must be positive".into()));
        }
        self.next_table += 1;
        let table = Table::new(TableId(self.next_table), params.name.trim(), params.capacity);
        let view = self.table_view(&table);
        self.tables.insert(table.id, table);
        self.touch(&[ChangedEntity::Tables]);
        Ok(view)
    }

    pub fn update_table(&mut self, table_id: TableId, update: TableUpdate) -> Result<TableView, RepositoryError> {
        self.table(table_id)?;
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(RepositoryError::Validation("table name is required".into()));
        }
        if update.capacity == Some(0) {
            return Err(RepositoryError::Validation("table capacity must be positive".into()));
        }

        let Some(table) = self.tables.get_mut(&table_id) else {
            return Err(RepositoryError::NotFound(table_id.to_string()));
        };
        if let Some(name) = update.name {
            table.name = name.trim().to_string();
        }
        if let Some(capacity) = update.capacity {
            table.capacity = capacity;
        }
        let table = table.clone();
        self.touch(&[ChangedEntity::Tables]);
        Ok(self.table_view(&table))
    }

    pub fn delete_table(&mut self, table_id: TableId) -> Result<(), RepositoryError> {
        let table = self.table(table_id)?;
        if let Some(order_id) = table.linked_order {
            return Err(RepositoryError::ReferentialConflict(format!(
                "{table_id} still links {order_id}"
            )));
        }
        self.tables.remove(&table_id);
        self.touch(&[ChangedEntity::Tables]);
        Ok(())
    }

    pub fn get_table(&self, table_id: TableId) -> Option<TableView> {
        self.tables.get(&table_id).map(|table| self.table_view(table))
    }

    /// One page of tables ordered by name, each joined with its kitchen summary.
    /// Pages start at 1.
    pub fn list_tables(&self, page: usize, limit: usize) -> Result<Vec<TableView>, RepositoryError> {
        if page == 0 || limit == 0 {
            return Err(RepositoryError::Validation("page and limit start at 1".into()));
        }
        let mut tables: Vec<&Table> = self.tables.values().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(tables
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .map(|table| self.table_view(table))
            .collect())
    }

    /// Points a free table at a dine-in order and mirrors its covers.
    pub fn link_order_to_table(&mut self, table_id: TableId, order_id: OrderId) -> Result<TableView, RepositoryError> {
        let table = self.table(table_id)?;
        let order = self.order(order_id)?;
        if table.linked_order == Some(order_id) {
            return Ok(self.table_view(table));
        }
        if let Some(linked) = table.linked_order {
            return Err(RepositoryError::ReferentialConflict(format!(
                "{table_id} is already linked to {linked}"
            )));
        }
        if let Some(other) = self.linking_table(order_id) {
            return Err(RepositoryError::ReferentialConflict(format!(
                "{order_id} is already linked from {other}"
            )));
        }
        if order.order_type != OrderType::DineIn {
            return Err(RepositoryError::Validation(format!("{order_id} is not a dine-in order")));
        }
        if order.is_settled() {
            return Err(RepositoryError::Validation(format!("{order_id} is finalized and paid")));
        }

        let covers = order.covers;
        if let Some(order) = self.orders.get_mut(&order_id) {
            order.table_id = Some(table_id);
        }
        let Some(table) = self.tables.get_mut(&table_id) else {
            return Err(RepositoryError::NotFound(table_id.to_string()));
        };
        table.linked_order = Some(order_id);
        table.covers = covers;
        let table = table.clone();
        self.touch(&[ChangedEntity::Tables, ChangedEntity::Orders]);
        Ok(self.table_view(&table))
    }

    /// Frees a table. An open order it pointed at drops its table reference in
    /// the same step; settled orders keep theirs as history.
    pub fn unlink_table(&mut self, table_id: TableId) -> Result<TableView, RepositoryError> {
        let table = self.table(table_id)?;
        if table.linked_order.is_none() && table.covers == 0 {
            return Ok(self.table_view(table));
        }
        let linked = table.linked_order;

        let mut detached = false;
        if let Some(order) = linked.and_then(|order_id| self.orders.get_mut(&order_id)) {
            if !order.is_settled() && order.table_id == Some(table_id) {
                order.table_id = None;
                detached = true;
            }
        }
        let Some(table) = self.tables.get_mut(&table_id) else {
            return Err(RepositoryError::NotFound(table_id.to_string()));
        };
        table.linked_order = None;
        table.covers = 0;
        let table = table.clone();
        self.touch(&[ChangedEntity::Tables]);
        if detached {
            self.touch(&[ChangedEntity::Orders]);
        }
        Ok(self.table_view(&table))
    }

    /// Points a table at an order id without any checks. Only for exercising
    /// the orphan path in tests.
    #[cfg(test)]
    pub(crate) fn force_link(&mut self, table_id: TableId, order_id: OrderId) {
        if let Some(table) = self.tables.get_mut(&table_id) {
            table.linked_order = Some(order_id);
        }
    }
}
