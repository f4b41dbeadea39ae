//! Data models
//!
//! Shared between the kitchen server and screen clients (via API).
//! All IDs are `i64`.

pub mod catalog;
pub mod order;
pub mod screen;

// Re-exports
pub use catalog::*;
pub use order::*;
pub use screen::*;
