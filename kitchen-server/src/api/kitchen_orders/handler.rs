//! Kitchen Orders API Handlers
//!
//! Transitions on unknown references answer `false`; endpoints that return
//! the order itself answer 404.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::api::decode_batch;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    KitchenOrder, OrderStatus, OrderUpdate, ProductDetail, ReadyCheck,
};

fn order_not_found(reference: &str) -> AppError {
    AppError::with_message(
        ErrorCode::OrderNotFound,
        format!("Kitchen order {} not found", reference),
    )
    .with_detail("reference", reference)
}

/// POST /api/kitchen-orders - 创建订单 (已存在的 reference 跳过)
pub async fn create(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<serde_json::Value>>,
) -> Json<Vec<KitchenOrder>> {
    Json(state.router.create_orders(&decode_batch(entries)))
}

/// GET /api/kitchen-orders/:reference
pub async fn get_by_reference(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<KitchenOrder>> {
    state
        .router
        .find_order(&reference)?
        .map(Json)
        .ok_or_else(|| order_not_found(&reference))
}

/// PATCH /api/kitchen-orders/:reference - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<KitchenOrder>> {
    state
        .router
        .update_order(&reference, payload)?
        .map(Json)
        .ok_or_else(|| order_not_found(&reference))
}

/// POST /api/kitchen-orders/:reference/waiting
pub async fn waiting(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.router.progress_to_waiting(&reference)?))
}

/// POST /api/kitchen-orders/:reference/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.router.progress_to_cancel(&reference)?))
}

/// POST /api/kitchen-orders/:reference/ready
pub async fn ready(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.router.progress_to_ready(&reference)?))
}

/// POST /api/kitchen-orders/:reference/paid - 收银完成
pub async fn paid(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<KitchenOrder>> {
    state
        .router
        .mark_paid(&reference)?
        .map(Json)
        .ok_or_else(|| order_not_found(&reference))
}

/// GET /api/kitchen-orders/:reference/check
///
/// `true`/`false`, or `{"category": "<name>"}` when the screen hides a
/// category used by the order.
pub async fn check(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<ReadyCheck>> {
    Ok(Json(state.router.check_ready_detailed(&reference)?))
}

/// GET /api/kitchen-orders/:reference/pending
pub async fn pending(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.router.check_pending(&reference)?))
}

/// GET /api/kitchen-orders/:reference/products
pub async fn products(
    State(state): State<ServerState>,
    Path(reference): Path<String>,
) -> AppResult<Json<Vec<ProductDetail>>> {
    Ok(Json(state.router.product_details(&reference)?))
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: i64,
    pub order_status: OrderStatus,
}

/// POST /api/kitchen-lines/:id/toggle - ready <-> waiting
pub async fn toggle(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ToggleResponse>> {
    let order_status = state.router.toggle_line(id)?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::OrderLineNotFound,
            format!("Kitchen order line {} not found", id),
        )
        .with_detail("line_id", id)
    })?;
    Ok(Json(ToggleResponse { id, order_status }))
}
