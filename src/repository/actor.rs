//! The repository actor: sole owner of the [`Store`].
//!
//! Requests are processed one at a time, so each request is atomic with
//! respect to every other and a status compare-and-set can never interleave
//! with a competing write. After a request commits, the resulting
//! [`StoreChange`](crate::repository::StoreChange) is published on the change
//! feed.

use crate::catalog::Catalog;
use crate::error::RepositoryError;
use crate::model::{ItemDraft, ProductSnapshot};
use crate::notify::LocalFeed;
use crate::repository::message::{RepositoryRequest, Response};
use crate::repository::store::{validate_drafts, Store};
use crate::repository::RepositoryClient;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Dependencies injected when the actor starts running.
#[derive(Clone)]
pub struct RepositoryContext {
    pub catalog: Arc<dyn Catalog>,
    pub feed: LocalFeed,
}

pub struct RepositoryActor {
    receiver: mpsc::Receiver<RepositoryRequest>,
    store: Store,
    default_page_size: usize,
}

impl RepositoryActor {
    pub fn new(buffer_size: usize, default_page_size: usize) -> (Self, RepositoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            receiver,
            store: Store::new(),
            default_page_size: default_page_size.max(1),
        };
        (actor, RepositoryClient::new(sender))
    }

    /// Runs the event loop until every client is dropped.
    pub async fn run(mut self, context: RepositoryContext) {
        info!("Repository started");

        while let Some(msg) = self.receiver.recv().await {
            let op = msg.name();
            debug!(op, "Request");
            self.handle(msg, &context).await;

            if let Some(change) = self.store.take_change() {
                debug!(op, revision = change.revision, entities = ?change.entities, "Commit");
                context.feed.publish(change);
            }
        }

        info!(
            orders = self.store.order_count(),
            tables = self.store.table_count(),
            "Shutdown"
        );
    }

    async fn handle(&mut self, msg: RepositoryRequest, context: &RepositoryContext) {
        let now = Utc::now();
        match msg {
            RepositoryRequest::CreateOrder { params, respond_to } => {
                let priced = take_snapshots(context.catalog.as_ref(), &params.items).await;
                let result = match priced {
                    Ok(snapshots) => self.store.create_order(
                        params.order_type,
                        params.table_id,
                        params.covers,
                        params.items,
                        snapshots,
                        now,
                    ),
                    Err(e) => Err(e),
                };
                if let Ok(order) = &result {
                    info!(order_id = %order.id, table_id = ?order.table_id, total = order.total(), "Order created");
                }
                reply_write("CreateOrder", respond_to, result);
            }
            RepositoryRequest::SubmitCustomerOrder { params, respond_to } => {
                let priced = take_snapshots(context.catalog.as_ref(), &params.items).await;
                let result = match priced {
                    Ok(snapshots) => self.store.submit_customer_order(
                        params.client_info,
                        params.receipt_url,
                        params.items,
                        snapshots,
                        now,
                    ),
                    Err(e) => Err(e),
                };
                if let Ok(order) = &result {
                    info!(order_id = %order.id, total = order.total(), "Customer order awaiting validation");
                }
                reply_write("SubmitCustomerOrder", respond_to, result);
            }
            RepositoryRequest::GetOrder { id, respond_to } => {
                let order = self.store.get_order(id);
                debug!(order_id = %id, found = order.is_some(), "Get");
                let _ = respond_to.send(Ok(order));
            }
            RepositoryRequest::ListOrders { filter, respond_to } => {
                let orders = self.store.list_orders(filter);
                debug!(?filter, count = orders.len(), "List");
                let _ = respond_to.send(Ok(orders));
            }
            RepositoryRequest::AddItems { id, items, respond_to } => {
                let priced = take_snapshots(context.catalog.as_ref(), &items).await;
                let result = match priced {
                    Ok(snapshots) => self.store.add_items(id, items, snapshots),
                    Err(e) => Err(e),
                };
                reply_write("AddItems", respond_to, result);
            }
            RepositoryRequest::EditItem {
                id,
                item_id,
                edit,
                respond_to,
            } => {
                let result = self.store.edit_item(id, item_id, edit);
                reply_write("EditItem", respond_to, result);
            }
            RepositoryRequest::SetItemStatus {
                id,
                item_id,
                to,
                respond_to,
            } => {
                let result = self.store.set_item_status(id, item_id, to, now);
                reply_write("SetItemStatus", respond_to, result);
            }
            RepositoryRequest::SendToKitchen { id, respond_to } => {
                let result = self.store.send_to_kitchen(id, now);
                reply_write("SendToKitchen", respond_to, result);
            }
            RepositoryRequest::AdvanceKitchen {
                id,
                from,
                to,
                respond_to,
            } => {
                let result = self.store.advance_kitchen(id, from, to, now);
                reply_write("AdvanceKitchen", respond_to, result);
            }
            RepositoryRequest::SetOrderStatus {
                id,
                from,
                to,
                respond_to,
            } => {
                let result = self.store.set_order_status(id, from, to, now);
                reply_write("SetOrderStatus", respond_to, result);
            }
            RepositoryRequest::MarkPaid { id, payment, respond_to } => {
                let result = self.store.mark_paid(id, payment);
                reply_write("MarkPaid", respond_to, result);
            }
            RepositoryRequest::ReversePayment { id, reason, respond_to } => {
                let result = self.store.reverse_payment(id);
                if result.is_ok() {
                    warn!(target: "floor_sync::exception", order_id = %id, %reason, "Payment reversed");
                }
                reply_write("ReversePayment", respond_to, result);
            }
            RepositoryRequest::SettleOrder { id, payment, respond_to } => {
                let result = self.store.settle_order(id, payment, now);
                reply_write("SettleOrder", respond_to, result);
            }
            RepositoryRequest::DeleteOrder { id, respond_to } => {
                let result = self.store.delete_order(id);
                reply_write("DeleteOrder", respond_to, result);
            }
            RepositoryRequest::CreateTable { params, respond_to } => {
                let result = self.store.create_table(params);
                reply_write("CreateTable", respond_to, result);
            }
            RepositoryRequest::UpdateTable { id, update, respond_to } => {
                let result = self.store.update_table(id, update);
                reply_write("UpdateTable", respond_to, result);
            }
            RepositoryRequest::DeleteTable { id, respond_to } => {
                let result = self.store.delete_table(id);
                reply_write("DeleteTable", respond_to, result);
            }
            RepositoryRequest::GetTable { id, respond_to } => {
                let table = self.store.get_table(id);
                debug!(table_id = %id, found = table.is_some(), "Get");
                let _ = respond_to.send(Ok(table));
            }
            RepositoryRequest::ListTables { page, limit, respond_to } => {
                let limit = limit.unwrap_or(self.default_page_size);
                let result = self.store.list_tables(page, limit);
                let _ = respond_to.send(result);
            }
            RepositoryRequest::LinkOrderToTable {
                table_id,
                order_id,
                respond_to,
            } => {
                let result = self.store.link_order_to_table(table_id, order_id);
                reply_write("LinkOrderToTable", respond_to, result);
            }
            RepositoryRequest::UnlinkTable { table_id, respond_to } => {
                let result = self.store.unlink_table(table_id);
                reply_write("UnlinkTable", respond_to, result);
            }
        }
    }
}

/// Takes catalog snapshots for new lines. Drafts are validated first so that
/// malformed input never reaches the catalog.
async fn take_snapshots(catalog: &dyn Catalog, drafts: &[ItemDraft]) -> Result<Vec<ProductSnapshot>, RepositoryError> {
    validate_drafts(drafts)?;
    let mut snapshots = Vec::with_capacity(drafts.len());
    for draft in drafts {
        snapshots.push(catalog.snapshot(&draft.product_ref).await?);
    }
    Ok(snapshots)
}

fn reply_write<T>(op: &'static str, respond_to: Response<T>, result: Result<T, RepositoryError>) {
    match &result {
        Ok(_) => info!(op, "Committed"),
        Err(e) => warn!(op, error = %e, "Rejected"),
    }
    let _ = respond_to.send(result);
}
