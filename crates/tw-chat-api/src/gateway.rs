//! HTTP client for the two external optimizer services.
//!
//! Both services take `{"data": {<weight key>: f64, ..}}` and answer with a
//! JSON object: `KPIs.difference` for the standard optimizer, named KPI
//! values (flat or under `data`) for the dynamic one.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tw_interpreter::{TrafficError, TrafficResult};
use tw_protocol::{OptimizerHealth, OptimizerMode, WeightVector};

use crate::config::OptimizerConfig;

/// Seam between the chat shell and the optimizer services.
#[async_trait]
pub trait OptimizerGateway: Send + Sync {
    /// Send normalized weights to the service for `mode`.
    async fn optimize(&self, mode: OptimizerMode, weights: &WeightVector) -> TrafficResult<Value>;

    /// Reachability of both services. Never fails; unreachable is `false`.
    async fn health(&self) -> OptimizerHealth;
}

#[derive(Serialize)]
struct OptimizeRequest<'a> {
    data: &'a WeightVector,
}

/// `reqwest`-backed gateway.
pub struct HttpOptimizerGateway {
    client: reqwest::Client,
    config: OptimizerConfig,
}

impl HttpOptimizerGateway {
    pub fn new(config: OptimizerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn url_for(&self, mode: OptimizerMode) -> &str {
        match mode {
            OptimizerMode::Standard => &self.config.standard_url,
            OptimizerMode::Dynamic => &self.config.dynamic_url,
        }
    }

    async fn is_healthy(&self, optimize_url: &str) -> bool {
        let url = health_url(optimize_url);
        let request = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.config.health_timeout_secs));
        match request.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "optimizer health check failed");
                false
            }
        }
    }
}

/// `.../api/optimize` → `.../health`; anything else gets `/health` appended.
pub fn health_url(optimize_url: &str) -> String {
    match optimize_url.strip_suffix("/api/optimize") {
        Some(base) => format!("{base}/health"),
        None => format!("{}/health", optimize_url.trim_end_matches('/')),
    }
}

#[async_trait]
impl OptimizerGateway for HttpOptimizerGateway {
    async fn optimize(&self, mode: OptimizerMode, weights: &WeightVector) -> TrafficResult<Value> {
        let url = self.url_for(mode);
        tracing::info!(mode = %mode, url = %url, "calling optimizer");

        let response = self
            .client
            .post(url)
            .json(&OptimizeRequest { data: weights })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(mode = %mode, error = %e, "optimizer request failed");
                TrafficError::Upstream(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(mode = %mode, status = %status, "optimizer returned non-success");
            return Err(TrafficError::Upstream(format!(
                "{} returned HTTP {status}",
                mode.display_name()
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::warn!(mode = %mode, error = %e, "optimizer response was not JSON");
            TrafficError::Upstream(format!("invalid response body: {e}"))
        })
    }

    async fn health(&self) -> OptimizerHealth {
        let (standard_optimizer, dynamic_optimizer) = tokio::join!(
            self.is_healthy(&self.config.standard_url),
            self.is_healthy(&self.config.dynamic_url),
        );
        OptimizerHealth {
            standard_optimizer,
            dynamic_optimizer,
        }
    }
}
