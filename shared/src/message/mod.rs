//! 消息总线消息类型定义
//!
//! 这些类型在 kitchen-server 和厨房屏幕之间共享。
//! The core only decides *what* to publish; delivery to connected screens
//! belongs to whatever transport subscribes to the bus.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Topic fired on every kitchen order create or write
pub const ORDER_CREATED_TOPIC: &str = "order_created";

/// Topic fired when kitchen screen configuration changes
pub const SCREEN_SYNC_TOPIC: &str = "kitchen_screen_sync";

/// 消息总线事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 订单变更通知
    Notification = 1,
    /// 配置同步信号
    Sync = 4,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// "An order changed" payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNotification {
    pub model: String,
    pub message: String,
}

impl OrderNotification {
    pub fn order_created() -> Self {
        Self {
            model: "order".to_string(),
            message: ORDER_CREATED_TOPIC.to_string(),
        }
    }
}

/// Resource change signal (screens reload the resource)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub action: String,
    /// Monotonic per-resource version, lets screens drop stale signals
    #[serde(default)]
    pub version: u64,
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub topic: String,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            topic: topic.into(),
            payload,
        }
    }

    /// 创建通知消息
    pub fn notification<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            EventType::Notification,
            topic,
            serde_json::to_vec(payload)?,
        ))
    }

    /// 创建同步信号消息
    pub fn sync(payload: &SyncPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            EventType::Sync,
            SCREEN_SYNC_TOPIC,
            serde_json::to_vec(payload)?,
        ))
    }

    /// 解析载荷为指定类型
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
