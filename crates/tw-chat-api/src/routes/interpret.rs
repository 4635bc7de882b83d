//! Dry-run interpretation, no optimizer call.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tw_interpreter::ParameterMatch;
use tw_protocol::{OptimizerMode, WeightVector};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterpretRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InterpretResponse {
    pub weights: WeightVector,
    pub optimizer_type: OptimizerMode,
    pub matches: Vec<ParameterMatch>,
}

/// POST /api/interpret: show how a message would be read.
pub async fn interpret(
    State(state): State<AppState>,
    Json(req): Json<InterpretRequest>,
) -> ApiResult<Json<InterpretResponse>> {
    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("message is required".into()))?;

    let interpretation = state.agent.interpreter().interpret_detailed(&message);
    Ok(Json(InterpretResponse {
        weights: interpretation.weights,
        optimizer_type: interpretation.mode,
        matches: interpretation.matches,
    }))
}
