//! 厨房屏幕配置

pub mod registry;

pub use registry::{RegistryError, RegistryResult, ScreenRegistry};
