//! Shared test harness for E2E integration tests.
//!
//! Runs the real chat server stack against `wiremock` stand-ins for the two
//! optimizer services and the chat model.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tw_chat_api::config::ApiConfig;
use tw_chat_api::routes::build_router;
use tw_chat_api::state::AppState;

pub const STANDARD_PATH: &str = "/standard/api/optimize";
pub const DYNAMIC_PATH: &str = "/dynamic/api/optimize";

/// End-to-end harness: router + mock upstreams.
pub struct TestHarness {
    pub router: Router,
    /// Serves both optimizer services (distinct paths).
    pub optimizers: MockServer,
    /// Serves `/v1/chat/completions` when the chat model tier is enabled.
    pub llm: MockServer,
}

impl TestHarness {
    /// Harness with the chat model tier disabled.
    pub async fn new() -> Self {
        Self::build(false).await
    }

    /// Harness whose off-topic turns go to the mock chat model first.
    pub async fn with_llm() -> Self {
        Self::build(true).await
    }

    async fn build(llm_enabled: bool) -> Self {
        let optimizers = MockServer::start().await;
        let llm = MockServer::start().await;

        let mut config = ApiConfig::default();
        config.optimizer.standard_url = format!("{}{STANDARD_PATH}", optimizers.uri());
        config.optimizer.dynamic_url = format!("{}{DYNAMIC_PATH}", optimizers.uri());
        config.optimizer.timeout_secs = 2;
        config.optimizer.health_timeout_secs = 1;
        config.llm.enabled = llm_enabled;
        config.llm.base_url = llm.uri();
        config.llm.api_key = Some("sk-test".into());
        config.llm.timeout_secs = 2;

        let state = AppState::from_config(config).unwrap();
        Self {
            router: build_router(state),
            optimizers,
            llm,
        }
    }

    /// Standard optimizer answers with these KPI differences.
    pub async fn mock_standard(&self, differences: Value) {
        Mock::given(method("POST"))
            .and(path(STANDARD_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"KPIs": {"difference": differences}})),
            )
            .mount(&self.optimizers)
            .await;
    }

    /// Dynamic optimizer answers with this body.
    pub async fn mock_dynamic(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path(DYNAMIC_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.optimizers)
            .await;
    }

    /// Requests the optimizer mock server has seen.
    pub async fn optimizer_requests(&self) -> Vec<wiremock::Request> {
        self.optimizers.received_requests().await.unwrap_or_default()
    }

    /// POST /api/chat. Returns (HTTP status, response JSON body).
    pub async fn chat(&self, message: &str, session_id: Option<&str>) -> (StatusCode, Value) {
        let mut body = json!({"message": message});
        if let Some(id) = session_id {
            body["session_id"] = json!(id);
        }
        self.post("/api/chat", body).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}
