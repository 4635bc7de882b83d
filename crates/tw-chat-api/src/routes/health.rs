//! Liveness and upstream reachability.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /: welcome message.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Traffic optimization assistant. POST /api/chat with {\"message\": ...} to get started.",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health: liveness plus optimizer reachability.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let apis = state.agent.gateway().health().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "apis": apis,
        "all_apis_healthy": apis.all_healthy(),
    }))
}
