//! Explicit-weights endpoint, the path a tool call takes.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tw_interpreter::prepare_weights_value;
use tw_protocol::{OptimizerMode, ValidationWarning, WeightVector};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    /// Object of canonical weight keys; missing keys default to 0.1.
    #[serde(default)]
    pub weights: Value,
    #[serde(default)]
    pub optimizer_type: OptimizerMode,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    /// Formatted summary.
    pub response: String,
    pub optimizer_type: OptimizerMode,
    pub normalized_weights: WeightVector,
    pub validation_warnings: Vec<ValidationWarning>,
    /// Optimizer response as received, plus injected debug fields.
    pub raw: Value,
}

/// POST /api/optimize: validate, normalize and dispatch explicit weights.
pub async fn optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> ApiResult<Json<OptimizeResponse>> {
    let prepared = prepare_weights_value(&req.weights)?;
    let outcome = state.agent.optimize(prepared, req.optimizer_type).await?;

    Ok(Json(OptimizeResponse {
        response: outcome.summary,
        optimizer_type: outcome.mode,
        normalized_weights: outcome.prepared.normalized,
        validation_warnings: outcome.prepared.warnings,
        raw: outcome.response,
    }))
}
