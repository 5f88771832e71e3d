use crate::clients::access::fetch_order;
use crate::clients::cart::Cart;
use crate::error::RepositoryError;
use crate::model::{ClientInfo, CustomerOrder, Order, OrderId};
use crate::notify::NotificationClient;
use crate::repository::RepositoryClient;
use crate::tracker::TrackerHandle;
use tracing::{info, instrument};

/// Customer self-service surface: submit an order, then read it by id.
#[derive(Clone)]
pub struct CustomerClient {
    repository: RepositoryClient,
}

impl CustomerClient {
    pub fn new(repository: RepositoryClient) -> Self {
        Self { repository }
    }

    /// Places an order awaiting staff validation.
    #[instrument(skip(self, order))]
    pub async fn submit(&self, order: CustomerOrder) -> Result<Order, RepositoryError> {
        self.repository.submit_customer_order(order).await
    }

    /// Reads the customer's own order.
    pub async fn order(&self, id: OrderId) -> Result<Order, RepositoryError> {
        fetch_order(&self.repository, id).await
    }
}

/// Client-local state of one customer device: the cart and the order being
/// tracked.
pub struct CustomerSession {
    client: CustomerClient,
    notifications: NotificationClient,
    pub cart: Cart,
    tracker: Option<TrackerHandle>,
}

impl CustomerSession {
    pub fn new(client: CustomerClient, notifications: NotificationClient) -> Self {
        Self {
            client,
            notifications,
            cart: Cart::new(),
            tracker: None,
        }
    }

    /// Submits the cart and starts tracking the new order. The cart is emptied
    /// only once the order is accepted.
    pub async fn checkout(&mut self, client_info: ClientInfo, receipt_url: Option<String>) -> Result<OrderId, RepositoryError> {
        if self.cart.is_empty() {
            return Err(RepositoryError::Validation("the cart is empty".into()));
        }
        let order = self
            .client
            .submit(CustomerOrder {
                client_info,
                items: self.cart.to_drafts(),
                receipt_url,
            })
            .await?;
        info!(order_id = %order.id, "Checked out");

        self.cart.clear();
        self.track(order.id);
        Ok(order.id)
    }

    /// Starts following `order_id`, replacing any previous tracker.
    pub fn track(&mut self, order_id: OrderId) {
        self.tracker = Some(TrackerHandle::start(
            order_id,
            self.client.clone(),
            self.notifications.clone(),
        ));
    }

    pub fn tracker(&mut self) -> Option<&mut TrackerHandle> {
        self.tracker.as_mut()
    }

    /// Forgets the tracked order and the cart. Purely local; the order itself
    /// is untouched.
    pub fn start_new_order(&mut self) {
        self.tracker = None;
        self.cart.clear();
    }
}
