//! E2E tests for non-optimization turns and the chat-model tier.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use helpers::TestHarness;
use tw_chat_api::assistant::OFF_TOPIC_REPLY;

/// Without a chat model, off-topic turns are redirected locally.
#[tokio::test]
async fn e2e_off_topic_is_redirected() {
    let h = TestHarness::new().await;
    let (status, body) = h.chat("What's the capital of France?", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], OFF_TOPIC_REPLY);
    assert!(body.get("optimizer_type").is_none());
    assert!(h.optimizer_requests().await.is_empty());
}

/// With a chat model, its reply is used and prior turns are sent along.
#[tokio::test]
async fn e2e_chat_model_reply() {
    let h = TestHarness::with_llm().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello! Which parameter should I prioritize?"}}]
        })))
        .mount(&h.llm)
        .await;

    let (_, first) = h.chat("good morning", Some("llm-1")).await;
    assert_eq!(first["response"], "Hello! Which parameter should I prioritize?");

    h.chat("how are you?", Some("llm-1")).await;
    let requests = h.llm.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let second: serde_json::Value = requests[1].body_json().unwrap();
    let messages = second["messages"].as_array().unwrap();
    // system, previous user, previous assistant, current user
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1]["content"], "good morning");
    assert_eq!(messages[3]["content"], "how are you?");
}

/// Chat model failure falls back to the redirect sentence.
#[tokio::test]
async fn e2e_chat_model_failure_falls_back() {
    let h = TestHarness::with_llm().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.llm)
        .await;

    let (status, body) = h.chat("tell me a joke", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], OFF_TOPIC_REPLY);
}

/// Interpret endpoint reports matches without calling anything upstream.
#[tokio::test]
async fn e2e_interpret_dry_run() {
    let h = TestHarness::with_llm().await;
    let (status, body) = h
        .post(
            "/api/interpret",
            json!({"message": "high priority to public transport and emissions to 0.2"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["optimizer_type"], "standard_optimizer");
    assert_eq!(body["weights"]["weight_PublicTransport"], 0.79);
    assert_eq!(body["weights"]["weight_Emissions"], 0.2);
    let patterns: Vec<&str> = body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["pattern"].as_str().unwrap())
        .collect();
    assert_eq!(patterns, vec!["qualitative_before", "numeric"]);
    assert!(h.optimizer_requests().await.is_empty());
    assert!(h.llm.received_requests().await.unwrap().is_empty());
}
