use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::optimizer::OptimizerMode;
use crate::weights::WeightVector;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Reply to `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer_type: Option<OptimizerMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightVector>,
}

/// One stored user/assistant exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// UUIDv7, so ids sort by creation time.
    pub id: Uuid,
    pub session_id: String,
    pub user_message: String,
    pub agent_response: String,
    #[serde(default)]
    pub optimizer_type: Option<OptimizerMode>,
    /// Interpreted (pre-normalization) weights, when the turn was an optimization request.
    #[serde(default)]
    pub weights: Option<WeightVector>,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        session_id: impl Into<String>,
        user_message: impl Into<String>,
        agent_response: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id: session_id.into(),
            user_message: user_message.into(),
            agent_response: agent_response.into(),
            optimizer_type: None,
            weights: None,
            created_at: Utc::now(),
        }
    }
}

/// Reply to `GET /api/history/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub history: Vec<ConversationTurn>,
}
