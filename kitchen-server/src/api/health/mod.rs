//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 存活检查 + 存储统计 |
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "storage": { "order_count": 12, "line_count": 40, "screen_count": 2 },
//!   "subscribers": 1
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::StorageStats;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: StorageStats,
    /// Connected notification subscribers
    subscribers: usize,
}

async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let storage = state.storage.get_stats()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage,
        subscribers: state.message_bus.subscriber_count(),
    }))
}
