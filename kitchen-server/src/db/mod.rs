//! Embedded storage

pub mod storage;

pub use storage::{KitchenStorage, StorageError, StorageResult, StorageStats};
