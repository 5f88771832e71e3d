//! # Floor Sync
//!
//! > **Order and table lifecycle for a restaurant floor.**
//!
//! Staff, kitchen and customers work against one store of orders and tables.
//! Every write goes through a single repository actor, and every commit is
//! announced to subscribers as a payload-free signal so that each screen can
//! re-read what it shows.
//!
//! ## Architecture Notes
//!
//! ### 1. One Writer
//! The [`repository`] actor owns the store and processes requests one at a
//! time. Status changes are compare-and-set: the caller names the value it
//! read, and the write is rejected if the store has moved on.
//!
//! ### 2. Derived Table Status
//! A table stores only which order it is linked to. Whether it is free,
//! awaiting food or served is computed at every read by [`table_status`].
//!
//! ### 3. Signals, Not Payloads
//! The [`notify`] hub fans commits out to subscriptions. Readers never trust a
//! signal for data; they reload. A reconnect or lag produces a `Resync`.
//!
//! ### 4. Late Binding
//! Dependencies (catalog, change feed) are injected when an actor starts
//! running, not when it is constructed. See [`lifecycle::FloorSystem`].
//!
//! ## Module Tour
//!
//! - [`model`]: orders, items, tables and their status enums.
//! - [`transition`]: the allowed moves of every status dimension.
//! - [`repository`]: the store, its actor, client and mock.
//! - [`notify`]: change feed, hub and subscriptions.
//! - [`clients`]: staff, kitchen and customer surfaces.
//! - [`tracker`] and [`counter`]: read-only subscribers built on the above.
//! - [`lifecycle`]: configuration, tracing and system orchestration.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod catalog;
pub mod clients;
pub mod counter;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod repository;
pub mod table_status;
pub mod tracker;
pub mod transition;
