//! OpenAI-compatible chat completions tier for off-topic turns.
//!
//! Calls `{base_url}/v1/chat/completions` with a short system prompt and the
//! recent conversation. Any failure (transport, status, body) yields `None`
//! so the tiered engine can fall back to the local redirect.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tw_protocol::ConversationTurn;

use super::ConversationEngine;
use crate::config::LlmConfig;

const SYSTEM_PROMPT: &str = "You are a traffic optimization assistant. You help users set \
priorities for public transport, congestion, emissions and operational cost, in English or \
Spanish. Users can say things like 'very high priority for congestion' or 'emissions to 0.4', \
and can ask for the dynamic (real-time) optimizer. If the user asks about something unrelated, \
politely steer them back to traffic parameters. Keep answers short.";

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Completion response (only fields we need).
#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat endpoint.
pub struct ChatCompletionsEngine {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ChatCompletionsEngine {
    pub fn new(config: LlmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ConversationEngine for ChatCompletionsEngine {
    async fn reply(&self, text: &str, history: &[ConversationTurn]) -> Option<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut messages = vec![Message {
            role: "system",
            content: SYSTEM_PROMPT,
        }];
        // history is newest first
        for turn in history.iter().rev() {
            messages.push(Message {
                role: "user",
                content: &turn.user_message,
            });
            messages.push(Message {
                role: "assistant",
                content: &turn.agent_response,
            });
        }
        messages.push(Message {
            role: "user",
            content: text,
        });

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "chat model request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "chat model returned non-200");
            return None;
        }

        let completion: CompletionResponse = match response.json().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse chat model response body");
                return None;
            }
        };

        let content = completion
            .choices
            .into_iter()
            .next()?
            .message
            .content?
            .trim()
            .to_string();
        (!content.is_empty()).then_some(content)
    }

    fn tier_name(&self) -> &str {
        "chat-model"
    }
}
