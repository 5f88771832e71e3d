//! Role-specific wrappers around [`RepositoryClient`](crate::repository::RepositoryClient).
//!
//! - [`StaffClient`]: front of house, full read/write behind a capability flag.
//! - [`KitchenClient`]: the kitchen queue and kitchen status only.
//! - [`CustomerClient`]: self-service submission and tracking by id.

mod access;
pub mod cart;
pub mod customer;
pub mod kitchen;
pub mod staff;

pub use cart::{Cart, CartLine};
pub use customer::{CustomerClient, CustomerSession};
pub use kitchen::KitchenClient;
pub use staff::{Capabilities, StaffClient};
