//! Shared application state for the Axum server.

use std::sync::Arc;

use tw_interpreter::PhraseInterpreter;

use crate::agent::TrafficAgent;
use crate::assistant::{ChatCompletionsEngine, ConversationEngine, RedirectEngine, TieredEngine};
use crate::config::ApiConfig;
use crate::gateway::{HttpOptimizerGateway, OptimizerGateway};
use crate::session::{InMemorySessionStore, SessionStore};

/// Shared application state, cheap to clone into every handler.
#[derive(Clone)]
pub struct AppState {
    pub agent: TrafficAgent,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: ApiConfig) -> anyhow::Result<Self> {
        let interpreter = Arc::new(PhraseInterpreter::new(config.interpreter)?);
        let gateway: Arc<dyn OptimizerGateway> =
            Arc::new(HttpOptimizerGateway::new(config.optimizer.clone())?);

        let engine: Arc<dyn ConversationEngine> = if config.llm.enabled {
            tracing::info!(
                base_url = %config.llm.base_url,
                model = %config.llm.model,
                "chat model tier enabled"
            );
            Arc::new(TieredEngine::new(
                Box::new(ChatCompletionsEngine::new(config.llm.clone())?),
                Box::new(RedirectEngine::new()),
            ))
        } else {
            tracing::info!("chat model tier disabled, off-topic turns are redirected");
            Arc::new(RedirectEngine::new())
        };

        let sessions = Arc::new(InMemorySessionStore::with_limits(
            config.history_limit,
            config.max_sessions,
        ));

        Ok(Self::with_parts(config, interpreter, gateway, engine, sessions))
    }

    /// Assemble state from explicit collaborators (tests swap in mocks here).
    pub fn with_parts(
        config: ApiConfig,
        interpreter: Arc<PhraseInterpreter>,
        gateway: Arc<dyn OptimizerGateway>,
        engine: Arc<dyn ConversationEngine>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let agent = TrafficAgent::new(
            interpreter,
            gateway,
            engine,
            sessions,
            config.history_limit,
        );
        Self {
            agent,
            config: Arc::new(config),
        }
    }
}
