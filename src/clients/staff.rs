use crate::clients::access::fetch_order;
use crate::error::RepositoryError;
use crate::model::{
    ItemDraft, ItemEdit, ItemStatus, KitchenStatus, NewOrder, Order, OrderFilter, OrderId, OrderItemId,
    OrderStatus, PaymentDetails, TableCreate, TableId, TableUpdate, TableView,
};
use crate::repository::RepositoryClient;
use tracing::{debug, instrument, warn};

/// What the authorization collaborator grants the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub may_write: bool,
}

impl Capabilities {
    pub const READ_ONLY: Capabilities = Capabilities { may_write: false };
    pub const READ_WRITE: Capabilities = Capabilities { may_write: true };
}

/// Front-of-house console: full access to orders, items and tables.
///
/// Writes are refused with [`RepositoryError::PermissionDenied`] unless the
/// caller was granted `may_write`. The check is a plain flag; who gets it is
/// decided elsewhere.
#[derive(Clone)]
pub struct StaffClient {
    repository: RepositoryClient,
    capabilities: Capabilities,
}

impl StaffClient {
    pub fn new(repository: RepositoryClient, capabilities: Capabilities) -> Self {
        Self {
            repository,
            capabilities,
        }
    }

    /// The same console with different capabilities.
    pub fn with_capabilities(&self, capabilities: Capabilities) -> Self {
        Self {
            repository: self.repository.clone(),
            capabilities,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn ensure_write(&self, op: &'static str) -> Result<(), RepositoryError> {
        if self.capabilities.may_write {
            Ok(())
        } else {
            warn!(op, "Write refused");
            Err(RepositoryError::PermissionDenied(op.to_string()))
        }
    }

    // --- Orders ---

    #[instrument(skip(self, params))]
    pub async fn create_order(&self, params: NewOrder) -> Result<Order, RepositoryError> {
        debug!(?params, "create_order called");
        self.ensure_write("create_order")?;
        self.repository.create_order(params).await
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        self.repository.list_orders(filter).await
    }

    #[instrument(skip(self, items))]
    pub async fn add_items(&self, id: OrderId, items: Vec<ItemDraft>) -> Result<Order, RepositoryError> {
        self.ensure_write("add_items")?;
        self.repository.add_items(id, items).await
    }

    #[instrument(skip(self, edit))]
    pub async fn edit_item(&self, id: OrderId, item_id: OrderItemId, edit: ItemEdit) -> Result<Order, RepositoryError> {
        self.ensure_write("edit_item")?;
        self.repository.edit_item(id, item_id, edit).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_item(&self, id: OrderId, item_id: OrderItemId) -> Result<Order, RepositoryError> {
        self.ensure_write("cancel_item")?;
        self.repository.set_item_status(id, item_id, ItemStatus::Cancelled).await
    }

    #[instrument(skip(self))]
    pub async fn send_to_kitchen(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.ensure_write("send_to_kitchen")?;
        self.repository.send_to_kitchen(id).await
    }

    #[instrument(skip(self))]
    pub async fn advance_kitchen(
        &self,
        id: OrderId,
        from: KitchenStatus,
        to: KitchenStatus,
    ) -> Result<Order, RepositoryError> {
        self.ensure_write("advance_kitchen")?;
        self.repository.advance_kitchen(id, from, to).await
    }

    #[instrument(skip(self))]
    pub async fn set_order_status(&self, id: OrderId, from: OrderStatus, to: OrderStatus) -> Result<Order, RepositoryError> {
        self.ensure_write("set_order_status")?;
        self.repository.set_order_status(id, from, to).await
    }

    /// Accepts a customer self-service order.
    pub async fn validate_order(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.set_order_status(id, OrderStatus::PendingValidation, OrderStatus::InProgress)
            .await
    }

    pub async fn finalize_order(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.set_order_status(id, OrderStatus::InProgress, OrderStatus::Finalized)
            .await
    }

    #[instrument(skip(self, payment))]
    pub async fn mark_paid(&self, id: OrderId, payment: PaymentDetails) -> Result<Order, RepositoryError> {
        self.ensure_write("mark_paid")?;
        self.repository.mark_paid(id, payment).await
    }

    /// Refund path. Logged as an exception event by the repository.
    #[instrument(skip(self, reason))]
    pub async fn reverse_payment(&self, id: OrderId, reason: &str) -> Result<Order, RepositoryError> {
        self.ensure_write("reverse_payment")?;
        if reason.trim().is_empty() {
            return Err(RepositoryError::Validation("a reversal needs a reason".into()));
        }
        self.repository.reverse_payment(id, reason).await
    }

    #[instrument(skip(self, payment))]
    pub async fn settle_order(&self, id: OrderId, payment: PaymentDetails) -> Result<Order, RepositoryError> {
        self.ensure_write("settle_order")?;
        self.repository.settle_order(id, payment).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), RepositoryError> {
        self.ensure_write("delete_order")?;
        self.repository.delete_order(id).await
    }

    // --- Tables ---

    #[instrument(skip(self, params))]
    pub async fn create_table(&self, params: TableCreate) -> Result<TableView, RepositoryError> {
        self.ensure_write("create_table")?;
        self.repository.create_table(params).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_table(&self, id: TableId, update: TableUpdate) -> Result<TableView, RepositoryError> {
        self.ensure_write("update_table")?;
        self.repository.update_table(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn delete_table(&self, id: TableId) -> Result<(), RepositoryError> {
        self.ensure_write("delete_table")?;
        self.repository.delete_table(id).await
    }

    pub async fn order(&self, id: OrderId) -> Result<Order, RepositoryError> {
        fetch_order(&self.repository, id).await
    }

    /// One table joined with its order's kitchen summary.
    pub async fn table(&self, id: TableId) -> Result<TableView, RepositoryError> {
        self.repository
            .get_table(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Tables ordered by name; `limit` defaults to the configured page size.
    pub async fn tables(&self, page: usize, limit: Option<usize>) -> Result<Vec<TableView>, RepositoryError> {
        self.repository.list_tables(page, limit).await
    }

    #[instrument(skip(self))]
    pub async fn link_order_to_table(&self, table_id: TableId, order_id: OrderId) -> Result<TableView, RepositoryError> {
        self.ensure_write("link_order_to_table")?;
        self.repository.link_order_to_table(table_id, order_id).await
    }

    #[instrument(skip(self))]
    pub async fn unlink_table(&self, table_id: TableId) -> Result<TableView, RepositoryError> {
        self.ensure_write("unlink_table")?;
        self.repository.unlink_table(table_id).await
    }
}
