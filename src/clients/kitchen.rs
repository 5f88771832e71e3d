use crate::clients::access::fetch_order;
use crate::error::{InvalidTransitionError, RepositoryError};
use crate::model::{KitchenStatus, Order, OrderFilter, OrderId, OrderStatus};
use crate::repository::RepositoryClient;
use tracing::instrument;

/// Kitchen display: reads the queue and moves kitchen status, nothing else.
#[derive(Clone)]
pub struct KitchenClient {
    repository: RepositoryClient,
}

impl KitchenClient {
    pub fn new(repository: RepositoryClient) -> Self {
        Self { repository }
    }

    /// Orders not yet delivered, oldest sent first.
    pub async fn queue(&self) -> Result<Vec<Order>, RepositoryError> {
        self.repository.list_orders(OrderFilter::KitchenQueue).await
    }

    /// Reads one order on the kitchen's board. Orders awaiting validation or
    /// already delivered are not the kitchen's to see.
    pub async fn order(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let order = fetch_order(&self.repository, id).await?;
        if order.status == OrderStatus::PendingValidation {
            return Err(RepositoryError::PermissionDenied(format!("{id} awaits validation")));
        }
        if order.kitchen_status == KitchenStatus::Delivered {
            return Err(RepositoryError::PermissionDenied(format!("{id} has left the kitchen")));
        }
        Ok(order)
    }

    /// Compare-and-set on the kitchen status. Fails with an invalid transition
    /// if someone else moved the order since `from` was read.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId, from: KitchenStatus, to: KitchenStatus) -> Result<Order, RepositoryError> {
        self.repository.advance_kitchen(id, from, to).await
    }

    /// Moves an order one step along the pipeline from the status it was read with.
    pub async fn advance_next(&self, order: &Order) -> Result<Order, RepositoryError> {
        let from = order.kitchen_status;
        let to = from
            .next()
            .ok_or_else(|| InvalidTransitionError::new("kitchen_status", from, from))?;
        self.advance(order.id, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderType;
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn test_advance_next_sends_read_status_as_from() {
        let mock = MockRepository::new();
        let mut order = Order::new(OrderId(4), OrderType::DineIn, OrderStatus::InProgress, Utc::now());
        order.kitchen_status = KitchenStatus::Received;

        let mut advanced = order.clone();
        advanced.kitchen_status = KitchenStatus::Ready;
        mock.expect_advance_kitchen(OrderId(4)).return_ok(advanced);

        let kitchen = KitchenClient::new(mock.client());
        let result = kitchen.advance_next(&order).await.unwrap();
        assert_eq!(result.kitchen_status, KitchenStatus::Ready);
        mock.verify();
    }

    #[tokio::test]
    async fn test_delivered_order_has_no_next_step() {
        let mock = MockRepository::new();
        let mut order = Order::new(OrderId(4), OrderType::Takeaway, OrderStatus::InProgress, Utc::now());
        order.kitchen_status = KitchenStatus::Delivered;

        let kitchen = KitchenClient::new(mock.client());
        let err = kitchen.advance_next(&order).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidTransition(_)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_order_outside_the_board_is_refused() {
        let mock = MockRepository::new();
        let mut delivered = Order::new(OrderId(5), OrderType::Takeaway, OrderStatus::InProgress, Utc::now());
        delivered.kitchen_status = KitchenStatus::Delivered;
        mock.expect_get_order(OrderId(5)).return_ok(Some(delivered));
        let pending = Order::new(OrderId(6), OrderType::Takeaway, OrderStatus::PendingValidation, Utc::now());
        mock.expect_get_order(OrderId(6)).return_ok(Some(pending));
        let mut cooking = Order::new(OrderId(7), OrderType::Takeaway, OrderStatus::InProgress, Utc::now());
        cooking.kitchen_status = KitchenStatus::Received;
        mock.expect_get_order(OrderId(7)).return_ok(Some(cooking.clone()));

        let kitchen = KitchenClient::new(mock.client());
        assert!(matches!(
            kitchen.order(OrderId(5)).await,
            Err(RepositoryError::PermissionDenied(_))
        ));
        assert!(matches!(
            kitchen.order(OrderId(6)).await,
            Err(RepositoryError::PermissionDenied(_))
        ));
        assert_eq!(kitchen.order(OrderId(7)).await.unwrap(), cooking);
        mock.verify();
    }
}
