//! The persistence gateway for orders, items and tables.
//!
//! - [`store`]: the authoritative state and its units of work.
//! - [`actor`]: the task that owns the store and publishes commits.
//! - [`client`]: the cloneable request handle.
//! - [`mock`]: an expectation-driven stand-in for tests.

pub mod actor;
pub mod client;
pub mod message;
pub mod mock;
pub mod store;

pub use actor::{RepositoryActor, RepositoryContext};
pub use client::RepositoryClient;
pub use message::{RepositoryRequest, Response};
pub use store::{ChangedEntity, Store, StoreChange};

/// Creates a repository actor and its client.
pub fn new(buffer_size: usize, default_page_size: usize) -> (RepositoryActor, RepositoryClient) {
    RepositoryActor::new(buffer_size, default_page_size)
}
