//! Per-session conversation memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tw_protocol::ConversationTurn;

/// Storage for conversation turns, keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn append(&self, turn: ConversationTurn);

    /// Up to `limit` turns of a session, newest first. Unknown sessions are empty.
    async fn history(&self, session_id: &str, limit: usize) -> Vec<ConversationTurn>;
}

/// Turns kept per session by [`InMemorySessionStore::new`].
pub const DEFAULT_MAX_TURNS: usize = 10;
/// Sessions kept by [`InMemorySessionStore::new`].
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Process-local store, lost on restart.
///
/// Bounded on write: each session keeps its newest `max_turns` turns, and a
/// new session past `max_sessions` evicts the one with the oldest last turn.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<ConversationTurn>>>,
    max_turns: usize,
    max_sessions: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_TURNS, DEFAULT_MAX_SESSIONS)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits below one are raised to one.
    pub fn with_limits(max_turns: usize, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns: max_turns.max(1),
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, turn: ConversationTurn) {
        let mut sessions = self.sessions.write().await;

        if !sessions.contains_key(&turn.session_id) && sessions.len() >= self.max_sessions {
            let stalest = sessions
                .iter()
                .min_by_key(|(_, turns)| turns.last().map(|t| t.created_at))
                .map(|(id, _)| id.clone());
            if let Some(id) = stalest {
                tracing::debug!(session_id = %id, "evicting least recently active session");
                sessions.remove(&id);
            }
        }

        let turns = sessions.entry(turn.session_id.clone()).or_default();
        turns.push(turn);
        if turns.len() > self.max_turns {
            let excess = turns.len() - self.max_turns;
            turns.drain(..excess);
        }
    }

    async fn history(&self, session_id: &str, limit: usize) -> Vec<ConversationTurn> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|turns| turns.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}
