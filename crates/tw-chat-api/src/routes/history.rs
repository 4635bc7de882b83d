//! Conversation history endpoint.

use axum::Json;
use axum::extract::{Path, State};
use tw_protocol::HistoryResponse;

use crate::state::AppState;

/// GET /api/history/{session_id}: recent turns, newest first.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    let history = state
        .agent
        .sessions()
        .history(&session_id, state.agent.history_limit())
        .await;
    Json(HistoryResponse {
        session_id,
        history,
    })
}
