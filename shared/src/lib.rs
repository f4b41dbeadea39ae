//! Shared types for the kitchen display workspace
//!
//! Common types used by the kitchen server and its clients: domain models,
//! error codes, response structures and message bus payloads.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType, OrderNotification};
