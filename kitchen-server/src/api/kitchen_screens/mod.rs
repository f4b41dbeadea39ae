//! Kitchen Screens API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/kitchen-screens | GET | 列表 (`?include_inactive=true` 含已归档) |
//! | /api/kitchen-screens | POST | 创建 |
//! | /api/kitchen-screens/candidates | GET | 可绑定的收银机 |
//! | /api/kitchen-screens/{id} | GET/PUT/DELETE | 查询 / 更新 / 归档 |
//! | /api/kitchen-screens/{id}/restore | POST | 恢复 |
//! | /api/kitchen-screens/{id}/launch | GET | 打开屏幕所需信息 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen-screens", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Must be before /{id} to avoid path conflicts
        .route("/candidates", get(handler::candidates))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::archive),
        )
        .route("/{id}/restore", post(handler::restore))
        .route("/{id}/launch", get(handler::launch))
}
