use crate::error::RepositoryError;
use crate::model::{
    CustomerOrder, ItemDraft, ItemEdit, ItemStatus, KitchenStatus, NewOrder, Order, OrderFilter, OrderId,
    OrderItemId, OrderStatus, PaymentDetails, TableCreate, TableId, TableUpdate, TableView,
};
use crate::repository::message::{RepositoryRequest, Response};
use tokio::sync::{mpsc, oneshot};

/// A cloneable handle to the repository actor.
///
/// Each method is one round trip and one unit of work on the actor side.
#[derive(Clone)]
pub struct RepositoryClient {
    sender: mpsc::Sender<RepositoryRequest>,
}

impl RepositoryClient {
    pub fn new(sender: mpsc::Sender<RepositoryRequest>) -> Self {
        Self { sender }
    }

    async fn call<T>(&self, build: impl FnOnce(Response<T>) -> RepositoryRequest) -> Result<T, RepositoryError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| RepositoryError::Closed)?;
        response.await.map_err(|_| RepositoryError::Dropped)?
    }

    pub async fn create_order(&self, params: NewOrder) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::CreateOrder { params, respond_to })
            .await
    }

    pub async fn submit_customer_order(&self, params: CustomerOrder) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::SubmitCustomerOrder { params, respond_to })
            .await
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::GetOrder { id, respond_to }).await
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::ListOrders { filter, respond_to })
            .await
    }

    pub async fn add_items(&self, id: OrderId, items: Vec<ItemDraft>) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::AddItems { id, items, respond_to })
            .await
    }

    pub async fn edit_item(&self, id: OrderId, item_id: OrderItemId, edit: ItemEdit) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::EditItem {
            id,
            item_id,
            edit,
            respond_to,
        })
        .await
    }

    pub async fn set_item_status(
        &self,
        id: OrderId,
        item_id: OrderItemId,
        to: ItemStatus,
    ) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::SetItemStatus {
            id,
            item_id,
            to,
            respond_to,
        })
        .await
    }

    pub async fn send_to_kitchen(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::SendToKitchen { id, respond_to })
            .await
    }

    pub async fn advance_kitchen(
        &self,
        id: OrderId,
        from: KitchenStatus,
        to: KitchenStatus,
    ) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::AdvanceKitchen {
            id,
            from,
            to,
            respond_to,
        })
        .await
    }

    pub async fn set_order_status(&self, id: OrderId, from: OrderStatus, to: OrderStatus) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::SetOrderStatus {
            id,
            from,
            to,
            respond_to,
        })
        .await
    }

    pub async fn mark_paid(&self, id: OrderId, payment: PaymentDetails) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::MarkPaid {
            id,
            payment,
            respond_to,
        })
        .await
    }

    pub async fn reverse_payment(&self, id: OrderId, reason: impl Into<String>) -> Result<Order, RepositoryError> {
        let reason = reason.into();
        self.call(|respond_to| RepositoryRequest::ReversePayment {
            id,
            reason,
            respond_to,
        })
        .await
    }

    pub async fn settle_order(&self, id: OrderId, payment: PaymentDetails) -> Result<Order, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::SettleOrder {
            id,
            payment,
            respond_to,
        })
        .await
    }

    pub async fn delete_order(&self, id: OrderId) -> Result<(), RepositoryError> {
        self.call(|respond_to| RepositoryRequest::DeleteOrder { id, respond_to })
            .await
    }

    pub async fn create_table(&self, params: TableCreate) -> Result<TableView, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::CreateTable { params, respond_to })
            .await
    }

    pub async fn update_table(&self, id: TableId, update: TableUpdate) -> Result<TableView, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::UpdateTable {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete_table(&self, id: TableId) -> Result<(), RepositoryError> {
        self.call(|respond_to| RepositoryRequest::DeleteTable { id, respond_to })
            .await
    }

    pub async fn get_table(&self, id: TableId) -> Result<Option<TableView>, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::GetTable { id, respond_to }).await
    }

    pub async fn list_tables(&self, page: usize, limit: Option<usize>) -> Result<Vec<TableView>, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::ListTables {
            page,
            limit,
            respond_to,
        })
        .await
    }

    pub async fn link_order_to_table(&self, table_id: TableId, order_id: OrderId) -> Result<TableView, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::LinkOrderToTable {
            table_id,
            order_id,
            respond_to,
        })
        .await
    }

    pub async fn unlink_table(&self, table_id: TableId) -> Result<TableView, RepositoryError> {
        self.call(|respond_to| RepositoryRequest::UnlinkTable { table_id, respond_to })
            .await
    }
}
