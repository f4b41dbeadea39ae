//! 服务模块

pub mod catalog_service;
pub mod http_app;
pub mod message_bus;

pub use catalog_service::CatalogService;
pub use message_bus::{MessageBus, OrderNotifier};
