use crate::error::RepositoryError;
use crate::model::{Order, OrderId};
use crate::repository::RepositoryClient;
use tracing::instrument;

/// By-id read shared by the role clients, failing with `NotFound` if the order
/// does not exist.
#[instrument(skip(repository))]
pub(crate) async fn fetch_order(repository: &RepositoryClient, id: OrderId) -> Result<Order, RepositoryError> {
    tracing::debug!("Sending request");
    repository
        .get_order(id)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
}
