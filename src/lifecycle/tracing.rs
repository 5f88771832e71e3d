//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter driven by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: repository and hub startup and shutdown.
//! - **Units of work**: every repository request at `debug`, commits at
//!   `info`, rejected writes at `warn` with the error.
//! - **Notification fabric**: subscribe/cancel at `debug`, transport drops,
//!   reconnects and lag at `warn`, exhausted reconnects at `error`.
//! - **Exceptions**: payment reversals are logged at `warn` under the
//!   `floor_sync::exception` target so they can be routed separately.
//! - **Repairs**: tables pointing at a missing order are logged at `warn`.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Commits and rejections
//! RUST_LOG=info cargo run
//!
//! # Every request and signal
//! RUST_LOG=debug cargo run
//!
//! # Only exception events
//! RUST_LOG=floor_sync::exception=warn cargo run
//! ```
//!
//! A typical `info` trace of a dine-in order:
//!
//! ```text
//! INFO Repository started
//! INFO Notification hub started
//! INFO Topic opened topic="orders_updated" generation=1
//! INFO Order created order_id=order_1 table_id=Some(TableId(1)) total=16000
//! INFO Committed op="CreateOrder"
//! INFO Committed op="AdvanceKitchen"
//! WARN Rejected op="AdvanceKitchen" error=invalid kitchen_status transition: ready -> ready
//! ```

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored, which lets every test call it.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add noise; events carry order_id/table_id fields instead
        .compact()
        .try_init();
}
