//! Kitchen order routing
//!
//! - **router**: ingest/reconcile register batches, status machine, diagnostics
//! - **filter**: screen category filtering
//!
//! # Status machine
//!
//! ```text
//! draft ──waiting──▶ waiting ──ready──▶ ready
//!   └──────────cancel──────┴──▶ cancel
//! ```

pub mod filter;
pub mod router;

pub use router::{OrderRouter, RouterError, RouterResult};

// Re-export shared types for convenience
pub use shared::models::{KitchenDetails, OrderSnapshot, OrderStatus, ReadyCheck};
