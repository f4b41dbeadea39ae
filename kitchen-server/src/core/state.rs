use dashmap::DashMap;
use shared::message::{BusMessage, SyncPayload};
use std::sync::Arc;

use crate::core::{Config, Result};
use crate::db::KitchenStorage;
use crate::orders::OrderRouter;
use crate::screens::ScreenRegistry;
use crate::services::{CatalogService, MessageBus};

/// 资源版本管理器
///
/// 每种资源类型维护独立的版本号，随 sync 信号递增，
/// 屏幕据此丢弃过期信号。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 递增指定资源的版本号并返回新值 (首次返回 1)
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 当前版本号, 未知资源返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | storage | redb 存储 |
/// | catalog | 主数据缓存 |
/// | screens | 厨房屏幕配置 |
/// | router | 订单路由 |
/// | message_bus | 通知广播 |
/// | resource_versions | 资源版本管理 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub storage: KitchenStorage,
    pub catalog: CatalogService,
    pub screens: ScreenRegistry,
    pub router: Arc<OrderRouter>,
    pub message_bus: MessageBus,
    pub resource_versions: Arc<ResourceVersions>,
}

impl ServerState {
    /// 用已打开的存储组装所有服务
    pub fn new(config: Config, storage: KitchenStorage) -> Self {
        let catalog = CatalogService::new(storage.clone());
        let screens = ScreenRegistry::new(storage.clone());
        let message_bus = MessageBus::with_capacity(config.notify_channel_capacity);
        let router = Arc::new(OrderRouter::new(
            storage.clone(),
            screens.clone(),
            catalog.clone(),
            Arc::new(message_bus.clone()),
        ));

        Self {
            config,
            storage,
            catalog,
            screens,
            router,
            message_bus,
            resource_versions: Arc::new(ResourceVersions::new()),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建 {work_dir}/database
    /// 2. 打开 redb
    /// 3. 预热主数据缓存
    pub fn initialize(config: &Config) -> Result<Self> {
        let db_path = config.database_path();
        if let Some(dir) = db_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let storage = KitchenStorage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Kitchen database opened");

        let state = Self::new(config.clone(), storage);
        state.catalog.warmup()?;
        Ok(state)
    }

    /// 广播配置同步信号
    ///
    /// - `resource`: 资源类型 (如 "kitchen_screen", "product")
    /// - `action`: 变更类型 ("created", "updated", "archived", ...)
    pub fn broadcast_sync(&self, resource: &str, action: &str, id: Option<String>) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            id,
            action: action.to_string(),
            version,
        };
        match BusMessage::sync(&payload) {
            Ok(msg) => {
                self.message_bus.publish(msg);
            }
            Err(e) => tracing::error!(resource, action, error = %e, "Failed to encode sync signal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("kitchen_screen"), 0);
        assert_eq!(versions.increment("kitchen_screen"), 1);
        assert_eq!(versions.increment("kitchen_screen"), 2);
        assert_eq!(versions.increment("product"), 1);
        assert_eq!(versions.get("kitchen_screen"), 2);
    }

    #[tokio::test]
    async fn test_broadcast_sync_carries_version() {
        let state = ServerState::new(
            Config::with_overrides("/tmp/unused", 0),
            KitchenStorage::open_in_memory().unwrap(),
        );
        let mut rx = state.message_bus.subscribe();

        state.broadcast_sync("kitchen_screen", "created", Some("1".to_string()));
        state.broadcast_sync("kitchen_screen", "archived", Some("1".to_string()));

        let first: SyncPayload = rx.recv().await.unwrap().parse_payload().unwrap();
        let second: SyncPayload = rx.recv().await.unwrap().parse_payload().unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(second.action, "archived");
    }
}
