//! Kitchen Orders API Module
//!
//! Status transitions, payment and register-side checks for kitchen orders.
//! Orders are addressed by their POS reference.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/kitchen-orders", order_routes())
        .nest("/api/kitchen-lines", line_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{reference}", get(handler::get_by_reference).patch(handler::update))
        .route("/{reference}/waiting", post(handler::waiting))
        .route("/{reference}/cancel", post(handler::cancel))
        .route("/{reference}/ready", post(handler::ready))
        .route("/{reference}/paid", post(handler::paid))
        .route("/{reference}/check", get(handler::check))
        .route("/{reference}/pending", get(handler::pending))
        .route("/{reference}/products", get(handler::products))
}

fn line_routes() -> Router<ServerState> {
    Router::new().route("/{id}/toggle", post(handler::toggle))
}
