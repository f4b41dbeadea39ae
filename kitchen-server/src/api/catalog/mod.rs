//! Catalog API 模块
//!
//! 收银端推送主数据 (整表替换)。
//! 单条查询未知 id 返回 404 (ProductNotFound / CategoryNotFound)。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/catalog", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/categories",
            get(handler::list_categories).put(handler::replace_categories),
        )
        .route("/categories/{id}", get(handler::get_category))
        .route(
            "/products",
            get(handler::list_products).put(handler::replace_products),
        )
        .route("/products/{id}", get(handler::get_product))
        .route(
            "/registers",
            get(handler::list_registers).put(handler::replace_registers),
        )
}
