//! Pure data structures shared by the repository, clients and subscribers.

pub mod order;
pub mod status;
pub mod table;

pub use order::*;
pub use status::*;
pub use table::*;
