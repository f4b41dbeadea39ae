//! API 路由模块
//!
//! - [`health`] - 健康检查
//! - [`kitchen`] - 屏幕内容 (按收银机)
//! - [`kitchen_orders`] - 订单状态、支付、检查
//! - [`kitchen_screens`] - 屏幕配置
//! - [`catalog`] - 主数据推送

pub mod catalog;
pub mod health;
pub mod kitchen;
pub mod kitchen_orders;
pub mod kitchen_screens;

use shared::models::OrderSnapshot;

/// 逐条解码订单批次, 无法解析的条目记录后跳过
pub(crate) fn decode_batch(entries: Vec<serde_json::Value>) -> Vec<OrderSnapshot> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<OrderSnapshot>(entry) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping undecodable order snapshot");
                    None
                }
            }
        })
        .collect()
}
