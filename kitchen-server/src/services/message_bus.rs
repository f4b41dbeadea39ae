//! 消息总线 - 服务器到厨房屏幕的广播通道
//!
//! ```text
//! OrderRouter ──▶ OrderNotifier::notify ──▶ MessageBus::publish ──▶ subscribers
//! ScreenRegistry change ──▶ ServerState::broadcast_sync ─────────┘
//! ```
//!
//! Delivery is fire-and-forget: a publish with no subscriber is dropped.

use shared::message::{BusMessage, OrderNotification};
use tokio::sync::broadcast;

/// Default broadcast channel capacity
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Publishes "an order changed" notifications
///
/// The router only decides what to announce; the transport is injected.
pub trait OrderNotifier: Send + Sync {
    fn notify(&self, topic: &str, payload: &OrderNotification);
}

/// 消息总线
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl MessageBus {
    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 发布消息 (服务器 -> 所有订阅者)
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, msg: BusMessage) -> usize {
        let topic = msg.topic.clone();
        match self.tx.send(msg) {
            Ok(receivers) => {
                tracing::debug!(topic = %topic, receivers, "Bus message published");
                receivers
            }
            Err(_) => {
                tracing::debug!(topic = %topic, "Bus message dropped, no subscribers");
                0
            }
        }
    }

    /// 订阅服务器广播
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl OrderNotifier for MessageBus {
    fn notify(&self, topic: &str, payload: &OrderNotification) {
        match BusMessage::notification(topic, payload) {
            Ok(msg) => {
                self.publish(msg);
            }
            Err(e) => tracing::error!(topic, error = %e, "Failed to encode order notification"),
        }
    }
}
