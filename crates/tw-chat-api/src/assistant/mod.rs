//! Replies for turns that are not optimization requests.
//!
//! Two tiers:
//! - **Chat model** (remote): OpenAI-compatible chat completions, optional.
//! - **Redirect** (local): fixed sentence steering the user back on topic.

pub mod llm;
pub mod rules;
pub mod tiered;

use async_trait::async_trait;
use tw_interpreter::PhraseInterpreter;
use tw_protocol::ConversationTurn;

/// Narrow interface the language model hides behind.
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Reply to `text` given recent turns (newest first).
    /// Returns None if the engine has nothing to say.
    async fn reply(&self, text: &str, history: &[ConversationTurn]) -> Option<String>;

    /// Name of this tier (for logging).
    fn tier_name(&self) -> &str;
}

pub use llm::ChatCompletionsEngine;
pub use rules::{OFF_TOPIC_REPLY, RedirectEngine};
pub use tiered::TieredEngine;

/// Words that mark a turn as a request to run the optimizer.
const TRIGGER_WORDS: &[&str] = &[
    "optimize",
    "optimise",
    "priority",
    "weight",
    "optimizar",
    "prioridad",
    "peso",
];

/// Whether a turn should go through the optimizer rather than the chat tiers.
pub fn is_optimization_request(text: &str, interpreter: &PhraseInterpreter) -> bool {
    let lower = text.to_lowercase();
    let lexicon = interpreter.lexicon();

    TRIGGER_WORDS.iter().any(|w| lower.contains(w))
        || lexicon.parameters.iter().any(|(p, _)| lower.contains(p.as_str()))
        || lexicon.mentions_dynamic(&lower)
        || !interpreter.interpret_detailed(text).matches.is_empty()
}
