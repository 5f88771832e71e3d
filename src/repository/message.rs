//! Requests understood by the repository actor.
//!
//! One variant per unit of work. Every write answers with the freshly reloaded
//! aggregate as the store holds it after the commit.

use crate::error::RepositoryError;
use crate::model::{
    CustomerOrder, ItemDraft, ItemEdit, ItemStatus, KitchenStatus, NewOrder, Order, OrderFilter, OrderId,
    OrderItemId, OrderStatus, PaymentDetails, TableCreate, TableId, TableUpdate, TableView,
};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the repository.
pub type Response<T> = oneshot::Sender<Result<T, RepositoryError>>;

#[derive(Debug)]
pub enum RepositoryRequest {
    CreateOrder {
        params: NewOrder,
        respond_to: Response<Order>,
    },
    SubmitCustomerOrder {
        params: CustomerOrder,
        respond_to: Response<Order>,
    },
    GetOrder {
        id: OrderId,
        respond_to: Response<Option<Order>>,
    },
    ListOrders {
        filter: OrderFilter,
        respond_to: Response<Vec<Order>>,
    },
    AddItems {
        id: OrderId,
        items: Vec<ItemDraft>,
        respond_to: Response<Order>,
    },
    EditItem {
        id: OrderId,
        item_id: OrderItemId,
        edit: ItemEdit,
        respond_to: Response<Order>,
    },
    SetItemStatus {
        id: OrderId,
        item_id: OrderItemId,
        to: ItemStatus,
        respond_to: Response<Order>,
    },
    SendToKitchen {
        id: OrderId,
        respond_to: Response<Order>,
    },
    AdvanceKitchen {
        id: OrderId,
        from: KitchenStatus,
        to: KitchenStatus,
        respond_to: Response<Order>,
    },
    SetOrderStatus {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        respond_to: Response<Order>,
    },
    MarkPaid {
        id: OrderId,
        payment: PaymentDetails,
        respond_to: Response<Order>,
    },
    ReversePayment {
        id: OrderId,
        reason: String,
        respond_to: Response<Order>,
    },
    SettleOrder {
        id: OrderId,
        payment: PaymentDetails,
        respond_to: Response<Order>,
    },
    DeleteOrder {
        id: OrderId,
        respond_to: Response<()>,
    },
    CreateTable {
        params: TableCreate,
        respond_to: Response<TableView>,
    },
    UpdateTable {
        id: TableId,
        update: TableUpdate,
        respond_to: Response<TableView>,
    },
    DeleteTable {
        id: TableId,
        respond_to: Response<()>,
    },
    GetTable {
        id: TableId,
        respond_to: Response<Option<TableView>>,
    },
    ListTables {
        page: usize,
        /// Falls back to the configured page size.
        limit: Option<usize>,
        respond_to: Response<Vec<TableView>>,
    },
    LinkOrderToTable {
        table_id: TableId,
        order_id: OrderId,
        respond_to: Response<TableView>,
    },
    UnlinkTable {
        table_id: TableId,
        respond_to: Response<TableView>,
    },
}

impl RepositoryRequest {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RepositoryRequest::CreateOrder { .. } => "CreateOrder",
            RepositoryRequest::SubmitCustomerOrder { .. } => "SubmitCustomerOrder",
            RepositoryRequest::GetOrder { .. } => "GetOrder",
            RepositoryRequest::ListOrders { .. } => "ListOrders",
            RepositoryRequest::AddItems { .. } => "AddItems",
            RepositoryRequest::EditItem { .. } => "EditItem",
            RepositoryRequest::SetItemStatus { .. } => "SetItemStatus",
            RepositoryRequest::SendToKitchen { .. } => "SendToKitchen",
            RepositoryRequest::AdvanceKitchen { .. } => "AdvanceKitchen",
            RepositoryRequest::SetOrderStatus { .. } => "SetOrderStatus",
            RepositoryRequest::MarkPaid { .. } => "MarkPaid",
            RepositoryRequest::ReversePayment { .. } => "ReversePayment",
            RepositoryRequest::SettleOrder { .. } => "SettleOrder",
            RepositoryRequest::DeleteOrder { .. } => "DeleteOrder",
            RepositoryRequest::CreateTable { .. } => "CreateTable",
            RepositoryRequest::UpdateTable { .. } => "UpdateTable",
            RepositoryRequest::DeleteTable { .. } => "DeleteTable",
            RepositoryRequest::GetTable { .. } => "GetTable",
            RepositoryRequest::ListTables { .. } => "ListTables",
            RepositoryRequest::LinkOrderToTable { .. } => "LinkOrderToTable",
            RepositoryRequest::UnlinkTable { .. } => "UnlinkTable",
        }
    }
}
