//! One conversational turn, end to end.
//!
//! Optimization requests go interpret → validate → normalize → gateway →
//! format. Everything else is answered by the conversation engine. Either
//! way the turn is recorded in the session store.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tw_interpreter::{
    DEBUG_PAYLOAD_KEY, PhraseInterpreter, PreparedWeights, TrafficResult,
    VALIDATION_WARNINGS_KEY, format_results, prepare_vector,
};
use tw_protocol::{ConversationTurn, OptimizerMode, WeightVector};

use crate::assistant::{ConversationEngine, OFF_TOPIC_REPLY, is_optimization_request};
use crate::gateway::OptimizerGateway;
use crate::session::SessionStore;

/// What the shell sends back for one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub response: String,
    pub session_id: String,
    pub optimizer_type: Option<OptimizerMode>,
    /// Interpreted weights, for optimization turns.
    pub weights: Option<WeightVector>,
}

/// Result of one optimizer round trip.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub mode: OptimizerMode,
    pub prepared: PreparedWeights,
    /// Optimizer response with debug payload and warnings injected.
    pub response: Value,
    pub summary: String,
}

/// Orchestrates interpreter, gateway, conversation engine and session memory.
#[derive(Clone)]
pub struct TrafficAgent {
    interpreter: Arc<PhraseInterpreter>,
    gateway: Arc<dyn OptimizerGateway>,
    engine: Arc<dyn ConversationEngine>,
    sessions: Arc<dyn SessionStore>,
    history_limit: usize,
}

impl TrafficAgent {
    pub fn new(
        interpreter: Arc<PhraseInterpreter>,
        gateway: Arc<dyn OptimizerGateway>,
        engine: Arc<dyn ConversationEngine>,
        sessions: Arc<dyn SessionStore>,
        history_limit: usize,
    ) -> Self {
        Self {
            interpreter,
            gateway,
            engine,
            sessions,
            history_limit,
        }
    }

    pub fn interpreter(&self) -> &PhraseInterpreter {
        &self.interpreter
    }

    pub fn gateway(&self) -> &dyn OptimizerGateway {
        self.gateway.as_ref()
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Send prepared weights to the optimizer and format its answer.
    pub async fn optimize(
        &self,
        prepared: PreparedWeights,
        mode: OptimizerMode,
    ) -> TrafficResult<OptimizationOutcome> {
        let raw = self.gateway.optimize(mode, &prepared.normalized).await?;

        let mut response = match raw {
            Value::Object(map) => map,
            other => {
                tracing::debug!(response = %other, "optimizer response is not an object");
                Map::new()
            }
        };
        response.insert(DEBUG_PAYLOAD_KEY.into(), json!(prepared.normalized));
        response.insert(
            VALIDATION_WARNINGS_KEY.into(),
            json!(prepared.warning_messages()),
        );
        let response = Value::Object(response);

        let summary = format_results(&response, mode);
        Ok(OptimizationOutcome {
            mode,
            prepared,
            response,
            summary,
        })
    }

    /// Handle one user message for `session_id`.
    pub async fn process_message(&self, text: &str, session_id: &str) -> AgentReply {
        let reply = if is_optimization_request(text, &self.interpreter) {
            self.optimization_turn(text, session_id).await
        } else {
            self.conversation_turn(text, session_id).await
        };

        let mut turn = ConversationTurn::new(session_id, text, reply.response.clone());
        turn.optimizer_type = reply.optimizer_type;
        turn.weights = reply.weights;
        self.sessions.append(turn).await;

        reply
    }

    async fn optimization_turn(&self, text: &str, session_id: &str) -> AgentReply {
        let interpretation = self.interpreter.interpret_detailed(text);
        tracing::info!(
            session_id = %session_id,
            mode = %interpretation.mode,
            matches = interpretation.matches.len(),
            "optimization request"
        );

        let result = match prepare_vector(interpretation.weights) {
            Ok(prepared) => self.optimize(prepared, interpretation.mode).await,
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(outcome) => outcome.summary,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    kind = e.kind(),
                    error = %e,
                    "optimization turn failed"
                );
                e.apology()
            }
        };

        AgentReply {
            response,
            session_id: session_id.to_string(),
            optimizer_type: Some(interpretation.mode),
            weights: Some(interpretation.weights),
        }
    }

    async fn conversation_turn(&self, text: &str, session_id: &str) -> AgentReply {
        let history = self.sessions.history(session_id, self.history_limit).await;
        let response = match self.engine.reply(text, &history).await {
            Some(reply) => reply,
            None => {
                tracing::debug!(tier = self.engine.tier_name(), "no reply from engine");
                OFF_TOPIC_REPLY.to_string()
            }
        };

        AgentReply {
            response,
            session_id: session_id.to_string(),
            optimizer_type: None,
            weights: None,
        }
    }
}
