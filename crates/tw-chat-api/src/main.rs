//! Traffic-priority chat server.
//!
//! Serves the chat, history, interpret and optimize endpoints on top of the
//! phrase interpreter and the two external optimizer services.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tw_chat_api::config::ApiConfig;
use tw_chat_api::routes;
use tw_chat_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tw-chat-api starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TW_CONFIG").ok());

    let mut config = match config_path {
        Some(path) => {
            tracing::info!(path = %path, "loading config file");
            ApiConfig::from_file(&path)?
        }
        None => {
            tracing::info!("no config file given, using defaults");
            ApiConfig::default()
        }
    };
    config.apply_env(|key| std::env::var(key).ok())?;

    tracing::info!(
        standard_url = %config.optimizer.standard_url,
        dynamic_url = %config.optimizer.dynamic_url,
        fuzzy_cutoff = config.interpreter.fuzzy_cutoff,
        multilingual = config.interpreter.multilingual,
        "config loaded"
    );

    // ── Serve ───────────────────────────────────────────────────
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config)?;
    let app = routes::build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
