//! Kitchen Feed Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::decode_batch;
use crate::core::ServerState;
use shared::models::KitchenDetails;

/// GET /api/kitchen/:register_id - 屏幕当前内容
pub async fn details(
    State(state): State<ServerState>,
    Path(register_id): Path<i64>,
) -> Json<KitchenDetails> {
    Json(state.router.get_details(register_id))
}

/// POST /api/kitchen/:register_id - 对账订单批次
///
/// Never fails on bad entries: they are logged and skipped.
pub async fn ingest(
    State(state): State<ServerState>,
    Path(register_id): Path<i64>,
    Json(entries): Json<Vec<serde_json::Value>>,
) -> Json<KitchenDetails> {
    let batch = decode_batch(entries);
    tracing::debug!(register_id, count = batch.len(), "Kitchen batch received");
    Json(state.router.ingest(register_id, &batch))
}
