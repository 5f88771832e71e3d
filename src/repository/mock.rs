//! # Mock Repository
//!
//! Utilities for testing subscribers and clients without a real store.
//!
//! [`MockRepository`] answers requests from a queue of expectations. For full
//! control, [`create_mock_client`] hands back the raw request receiver and the
//! `expect_*` helpers pull typed requests off it.

use crate::error::RepositoryError;
use crate::model::{KitchenStatus, Order, OrderFilter, OrderId};
use crate::repository::{RepositoryClient, RepositoryRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

enum Expectation {
    GetOrder {
        id: OrderId,
        response: Result<Option<Order>, RepositoryError>,
    },
    ListOrders {
        response: Result<Vec<Order>, RepositoryError>,
    },
    AdvanceKitchen {
        id: OrderId,
        response: Result<Order, RepositoryError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock repository with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = MockRepository::new();
/// mock.expect_get_order(OrderId(1)).return_ok(None);
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockRepository {
    client: RepositoryClient,
    expectations: Expectations,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockRepository {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<RepositoryRequest>(100);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front();

                match (request, expectation) {
                    (
                        RepositoryRequest::GetOrder { id, respond_to },
                        Some(Expectation::GetOrder { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "GetOrder for unexpected order");
                        let _ = respond_to.send(response);
                    }
                    (RepositoryRequest::ListOrders { respond_to, .. }, Some(Expectation::ListOrders { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        RepositoryRequest::AdvanceKitchen { id, respond_to, .. },
                        Some(Expectation::AdvanceKitchen { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "AdvanceKitchen for unexpected order");
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {}", request.name());
                    }
                }
            }
        });

        Self {
            client: RepositoryClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> RepositoryClient {
        self.client.clone()
    }

    /// Expects a `get_order` call.
    pub fn expect_get_order(&self, id: OrderId) -> GetOrderExpectation {
        GetOrderExpectation {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `list_orders` call, whatever the filter.
    pub fn expect_list_orders(&self) -> ListOrdersExpectation {
        ListOrdersExpectation {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `advance_kitchen` call.
    pub fn expect_advance_kitchen(&self, id: OrderId) -> AdvanceKitchenExpectation {
        AdvanceKitchenExpectation {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Number of expectations not consumed yet.
    pub fn remaining(&self) -> usize {
        self.expectations.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn push(expectations: &Expectations, expectation: Expectation) {
    expectations
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_back(expectation);
}

/// Builder for `get_order` expectations.
pub struct GetOrderExpectation {
    id: OrderId,
    expectations: Expectations,
}

impl GetOrderExpectation {
    pub fn return_ok(self, order: Option<Order>) {
        push(&self.expectations, Expectation::GetOrder {
            id: self.id,
            response: Ok(order),
        });
    }

    pub fn return_err(self, error: RepositoryError) {
        push(&self.expectations, Expectation::GetOrder {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for `list_orders` expectations.
pub struct ListOrdersExpectation {
    expectations: Expectations,
}

impl ListOrdersExpectation {
    pub fn return_ok(self, orders: Vec<Order>) {
        push(&self.expectations, Expectation::ListOrders { response: Ok(orders) });
    }

    pub fn return_err(self, error: RepositoryError) {
        push(&self.expectations, Expectation::ListOrders { response: Err(error) });
    }
}

/// Builder for `advance_kitchen` expectations.
pub struct AdvanceKitchenExpectation {
    id: OrderId,
    expectations: Expectations,
}

impl AdvanceKitchenExpectation {
    pub fn return_ok(self, order: Order) {
        push(&self.expectations, Expectation::AdvanceKitchen {
            id: self.id,
            response: Ok(order),
        });
    }

    pub fn return_err(self, error: RepositoryError) {
        push(&self.expectations, Expectation::AdvanceKitchen {
            id: self.id,
            response: Err(error),
        });
    }
}

// =============================================================================
// LOW-LEVEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// Use this when a test needs to hold a response back, for example to
/// observe a subscriber while a read is still in flight.
pub fn create_mock_client(buffer_size: usize) -> (RepositoryClient, mpsc::Receiver<RepositoryRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (RepositoryClient::new(sender), receiver)
}

/// Returns the next request if it is a `GetOrder`.
pub async fn expect_get_order(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<(OrderId, Response<Option<Order>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::GetOrder { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is a `ListOrders`.
pub async fn expect_list_orders(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<(OrderFilter, Response<Vec<Order>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::ListOrders { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is an `AdvanceKitchen`.
pub async fn expect_advance_kitchen(
    receiver: &mut mpsc::Receiver<RepositoryRequest>,
) -> Option<(OrderId, KitchenStatus, KitchenStatus, Response<Order>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::AdvanceKitchen {
            id,
            from,
            to,
            respond_to,
        }) => Some((id, from, to, respond_to)),
        _ => None,
    }
}
