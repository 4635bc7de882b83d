//! Local fallback tier.

use async_trait::async_trait;
use tw_protocol::ConversationTurn;

use super::ConversationEngine;

/// Sentence used for anything outside traffic optimization.
pub const OFF_TOPIC_REPLY: &str = "I'm sorry, I specialize in traffic optimization. \
     Could you please provide traffic parameters to adjust?";

/// Always answers with [`OFF_TOPIC_REPLY`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RedirectEngine;

impl RedirectEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConversationEngine for RedirectEngine {
    async fn reply(&self, _text: &str, _history: &[ConversationTurn]) -> Option<String> {
        Some(OFF_TOPIC_REPLY.to_string())
    }

    fn tier_name(&self) -> &str {
        "redirect"
    }
}
