//! Tiered engine: chat model first, local redirect as fallback.

use async_trait::async_trait;
use tw_protocol::ConversationTurn;

use super::ConversationEngine;

/// Composite engine that tries the remote model first, then the local tier.
pub struct TieredEngine {
    primary: Box<dyn ConversationEngine>,
    fallback: Box<dyn ConversationEngine>,
}

impl TieredEngine {
    pub fn new(primary: Box<dyn ConversationEngine>, fallback: Box<dyn ConversationEngine>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl ConversationEngine for TieredEngine {
    async fn reply(&self, text: &str, history: &[ConversationTurn]) -> Option<String> {
        if let Some(reply) = self.primary.reply(text, history).await {
            return Some(reply);
        }

        tracing::debug!(
            primary = self.primary.tier_name(),
            fallback = self.fallback.tier_name(),
            "primary engine had no reply, falling back"
        );
        self.fallback.reply(text, history).await
    }

    fn tier_name(&self) -> &str {
        "tiered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock engine that always returns a fixed reply (or None).
    struct MockEngine {
        reply: Option<&'static str>,
        name: &'static str,
    }

    impl MockEngine {
        fn hit(name: &'static str, reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                name,
            }
        }

        fn miss(name: &'static str) -> Self {
            Self { reply: None, name }
        }
    }

    #[async_trait]
    impl ConversationEngine for MockEngine {
        async fn reply(&self, _text: &str, _history: &[ConversationTurn]) -> Option<String> {
            self.reply.map(String::from)
        }

        fn tier_name(&self) -> &str {
            self.name
        }
    }

    #[tokio::test]
    async fn primary_hit_skips_fallback() {
        let engine = TieredEngine::new(
            Box::new(MockEngine::hit("model", "from model")),
            Box::new(MockEngine::hit("redirect", "from redirect")),
        );

        assert_eq!(engine.reply("hi", &[]).await.as_deref(), Some("from model"));
    }

    #[tokio::test]
    async fn fallback_on_primary_miss() {
        let engine = TieredEngine::new(
            Box::new(MockEngine::miss("model")),
            Box::new(MockEngine::hit("redirect", "from redirect")),
        );

        assert_eq!(engine.reply("hi", &[]).await.as_deref(), Some("from redirect"));
    }

    #[tokio::test]
    async fn both_miss_returns_none() {
        let engine = TieredEngine::new(
            Box::new(MockEngine::miss("model")),
            Box::new(MockEngine::miss("redirect")),
        );

        assert!(engine.reply("hi", &[]).await.is_none());
    }
}
