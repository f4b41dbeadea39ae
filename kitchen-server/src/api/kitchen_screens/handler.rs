//! Kitchen Screen API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{KitchenScreen, Register, ScreenCreate, ScreenLaunch, ScreenUpdate};

const RESOURCE: &str = "kitchen_screen";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/kitchen-screens
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<KitchenScreen>>> {
    Ok(Json(state.screens.list(query.include_inactive)?))
}

/// GET /api/kitchen-screens/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<KitchenScreen>> {
    Ok(Json(state.screens.get(id)?))
}

/// POST /api/kitchen-screens - 创建屏幕 (每台收银机最多一个)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ScreenCreate>,
) -> AppResult<Json<KitchenScreen>> {
    let screen = state.screens.register(payload)?;
    state.broadcast_sync(RESOURCE, "created", Some(screen.id.to_string()));
    Ok(Json(screen))
}

/// PUT /api/kitchen-screens/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScreenUpdate>,
) -> AppResult<Json<KitchenScreen>> {
    let screen = state.screens.update(id, payload)?;
    state.broadcast_sync(RESOURCE, "updated", Some(id.to_string()));
    Ok(Json(screen))
}

/// DELETE /api/kitchen-screens/:id - 归档 (软删除)
pub async fn archive(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<KitchenScreen>> {
    let screen = state.screens.archive(id)?;
    state.broadcast_sync(RESOURCE, "archived", Some(id.to_string()));
    Ok(Json(screen))
}

/// POST /api/kitchen-screens/:id/restore
pub async fn restore(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<KitchenScreen>> {
    let screen = state.screens.restore(id)?;
    state.broadcast_sync(RESOURCE, "restored", Some(id.to_string()));
    Ok(Json(screen))
}

/// GET /api/kitchen-screens/candidates - 尚未绑定屏幕的餐厅收银机
pub async fn candidates(State(state): State<ServerState>) -> AppResult<Json<Vec<Register>>> {
    Ok(Json(state.screens.candidate_registers(&state.catalog)?))
}

/// GET /api/kitchen-screens/:id/launch
pub async fn launch(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ScreenLaunch>> {
    Ok(Json(state.screens.launch_info(id, &state.catalog)?))
}
