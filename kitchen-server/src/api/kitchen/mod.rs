//! Kitchen screen feed
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/kitchen/{register_id} | GET | 当前屏幕内容 |
//! | /api/kitchen/{register_id} | POST | 提交订单批次并返回屏幕内容 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/kitchen/{register_id}",
        get(handler::details).post(handler::ingest),
    )
}
