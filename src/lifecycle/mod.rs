//! Runtime orchestration and lifecycle management.
//!
//! - [`FloorSystem`]: starts the actors, wires them together and shuts them down.
//! - [`SystemConfig`]: buffer sizes, paging and reconnect policy.
//! - [`setup_tracing`]: installs the log subscriber.

pub mod config;
pub mod floor_system;
pub mod tracing;

pub use config::*;
pub use floor_system::*;
pub use tracing::*;
