//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Category, Product, Register};

/// GET /api/catalog/categories
pub async fn list_categories(State(state): State<ServerState>) -> Json<Vec<Category>> {
    Json(state.catalog.list_categories())
}

/// GET /api/catalog/categories/:id
pub async fn get_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    state.catalog.get_category(id).map(Json).ok_or_else(|| {
        AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {} not found", id))
            .with_detail("category_id", id)
    })
}

/// PUT /api/catalog/categories - 整表替换
pub async fn replace_categories(
    State(state): State<ServerState>,
    Json(payload): Json<Vec<Category>>,
) -> AppResult<Json<usize>> {
    let count = payload.len();
    state.catalog.replace_categories(payload)?;
    tracing::info!(count, "Catalog categories replaced");
    state.broadcast_sync("category", "replaced", None);
    Ok(Json(count))
}

/// GET /api/catalog/products
pub async fn list_products(State(state): State<ServerState>) -> Json<Vec<Product>> {
    Json(state.catalog.list_products())
}

/// GET /api/catalog/products/:id
pub async fn get_product(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    state.catalog.get_product(id).map(Json).ok_or_else(|| {
        AppError::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", id))
            .with_detail("product_id", id)
    })
}

/// PUT /api/catalog/products - 整表替换
pub async fn replace_products(
    State(state): State<ServerState>,
    Json(payload): Json<Vec<Product>>,
) -> AppResult<Json<usize>> {
    let count = payload.len();
    state.catalog.replace_products(payload)?;
    tracing::info!(count, "Catalog products replaced");
    state.broadcast_sync("product", "replaced", None);
    Ok(Json(count))
}

/// GET /api/catalog/registers
pub async fn list_registers(State(state): State<ServerState>) -> Json<Vec<Register>> {
    Json(state.catalog.list_registers())
}

/// PUT /api/catalog/registers - 整表替换
pub async fn replace_registers(
    State(state): State<ServerState>,
    Json(payload): Json<Vec<Register>>,
) -> AppResult<Json<usize>> {
    let count = payload.len();
    state.catalog.replace_registers(payload)?;
    tracing::info!(count, "Catalog registers replaced");
    state.broadcast_sync("register", "replaced", None);
    Ok(Json(count))
}
