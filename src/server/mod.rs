//! HTTP API over the persona store and the chat relay.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{ChatRequest, ChatResponse};
pub use routes::create_router;
pub use state::AppState;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::agent::PersonaStore;
use crate::config::AppConfig;
use crate::http::{HttpClient, HttpDebugConfig};
use crate::llm::{LlmError, OpenAiProvider};

/// Builds the shared state from configuration. A missing provider credential is
/// not fatal: the API runs and chat requests fail with a 500.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let store = PersonaStore::open(&config.database_url)
        .await
        .with_context(|| format!("Failed to open agent store {}", config.database_url))?;

    let http = HttpClient::new(Client::new(), HttpDebugConfig::from_flag(config.http_debug));
    let llm = match OpenAiProvider::new(
        http,
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_base_url.clone(),
    ) {
        Ok(provider) => Some(provider),
        Err(LlmError::MissingApiKey) => {
            warn!("OPENAI_API_KEY is not set; /api/chat will fail until it is configured");
            None
        }
        Err(err) => return Err(err).context("Failed to configure model provider"),
    };

    Ok(AppState::new(store, llm))
}

pub async fn serve(config: &AppConfig, bind: &str) -> Result<()> {
    let state = build_state(config).await?;
    let model = state.llm.as_ref().map(|p| p.model().to_string());
    let store = state.store.clone();
    let app = create_router(state);

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(
        addr = %listener.local_addr()?,
        model = model.as_deref().unwrap_or("<disabled>"),
        "selfagent API listening"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed");
    store.close().await;
    served
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
