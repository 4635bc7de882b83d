//! Chat server configuration, loadable from TOML and overridden by environment.

use serde::Deserialize;
use tw_interpreter::InterpreterSettings;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Turns returned by the history endpoint.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Sessions held in memory before the least recently active is dropped.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub interpreter: InterpreterSettings,
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_history_limit() -> usize {
    10
}

fn default_max_sessions() -> usize {
    1000
}

/// Endpoints of the two external optimizer services.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_standard_url")]
    pub standard_url: String,
    #[serde(default = "default_dynamic_url")]
    pub dynamic_url: String,
    /// Per-request timeout for optimize calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

fn default_standard_url() -> String {
    "https://fastapi-traffic-agent-v2.onrender.com/api/optimize".into()
}
fn default_dynamic_url() -> String {
    "https://fastapi2-traffic-agent-v1.onrender.com/api/optimize".into()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_health_timeout_secs() -> u64 {
    5
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            standard_url: default_standard_url(),
            dynamic_url: default_dynamic_url(),
            timeout_secs: default_timeout_secs(),
            health_timeout_secs: default_health_timeout_secs(),
        }
    }
}

/// OpenAI-compatible chat model used for off-topic turns.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com".into()
}
fn default_llm_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.5
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

impl ApiConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (`std::env::var` in production).
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port.parse()?;
        }
        if let Some(url) = var("STANDARD_OPTIMIZER_URL") {
            self.optimizer.standard_url = url;
        }
        if let Some(url) = var("DYNAMIC_OPTIMIZER_URL") {
            self.optimizer.dynamic_url = url;
        }
        if let Some(timeout) = var("API_TIMEOUT") {
            self.optimizer.timeout_secs = timeout.parse()?;
        }
        if let Some(cutoff) = var("FUZZY_CUTOFF") {
            self.interpreter.fuzzy_cutoff = cutoff.parse()?;
        }
        if let Some(sampling) = var("PRIORITY_SAMPLING") {
            self.interpreter.sampling = sampling.parse()?;
        }
        if let Some(key) = var("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
            self.llm.enabled = true;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            history_limit: default_history_limit(),
            max_sessions: default_max_sessions(),
            optimizer: OptimizerConfig::default(),
            interpreter: InterpreterSettings::default(),
            llm: LlmConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tw_interpreter::SamplingStrategy;

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.max_sessions, 1000);
        assert_eq!(config.optimizer.timeout_secs, 15);
        assert!(config.optimizer.standard_url.ends_with("/api/optimize"));
        assert_eq!(config.interpreter.fuzzy_cutoff, 60.0);
        assert!(!config.llm.enabled);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml = r#"
port = 9000

[optimizer]
standard_url = "http://localhost:9001/api/optimize"

[interpreter]
fuzzy_cutoff = 70.0
sampling = "uniform"
multilingual = false
"#;
        let config: ApiConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.optimizer.standard_url, "http://localhost:9001/api/optimize");
        assert_eq!(config.optimizer.dynamic_url, default_dynamic_url());
        assert_eq!(config.interpreter.fuzzy_cutoff, 70.0);
        assert_eq!(config.interpreter.sampling, SamplingStrategy::Uniform);
        assert!(!config.interpreter.multilingual);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("DYNAMIC_OPTIMIZER_URL", "http://dyn/api/optimize"),
            ("FUZZY_CUTOFF", "75"),
            ("PRIORITY_SAMPLING", "random"),
            ("OPENAI_API_KEY", "sk-test"),
        ]
        .into_iter()
        .collect();

        let mut config = ApiConfig::default();
        config
            .apply_env(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.optimizer.dynamic_url, "http://dyn/api/optimize");
        assert_eq!(config.interpreter.fuzzy_cutoff, 75.0);
        assert_eq!(config.interpreter.sampling, SamplingStrategy::Uniform);
        assert!(config.llm.enabled);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let mut config = ApiConfig::default();
        assert!(config
            .apply_env(|k| (k == "PORT").then(|| "eighty".to_string()))
            .is_err());
    }
}
