//! Conversational endpoint.

use axum::Json;
use axum::extract::State;
use tw_protocol::{ChatRequest, ChatResponse};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/chat: run one conversational turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("message is required".into()))?;

    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let reply = state.agent.process_message(message, &session_id).await;

    Ok(Json(ChatResponse {
        response: reply.response,
        session_id: reply.session_id,
        optimizer_type: reply.optimizer_type,
        weights: reply.weights,
    }))
}
