use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::agent::{Persona, relay};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "agentConfig")]
    pub agent_config: Option<Persona>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// `GET /api/agent`
#[instrument(skip_all)]
pub async fn get_agent(State(state): State<AppState>) -> ApiResult<Json<Persona>> {
    state.store.get_or_create().await.map(Json).map_err(|err| {
        error!("failed to read persona: {err:#}");
        ApiError::Persistence
    })
}

/// `POST /api/agent`
#[instrument(skip_all)]
pub async fn save_agent(
    State(state): State<AppState>,
    Json(persona): Json<Persona>,
) -> ApiResult<Json<Persona>> {
    let saved = state.store.save(&persona).await.map_err(|err| {
        error!("failed to save persona: {err:#}");
        ApiError::Persistence
    })?;
    info!(name = %saved.name, role = %saved.role, "persona updated");
    Ok(Json(saved))
}

/// `POST /api/chat`
///
/// Uses the persona carried in the request, not the stored one.
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let Some(persona) = request.agent_config else {
        warn!("chat request without agentConfig");
        return Err(ApiError::AiProcessing);
    };
    let Some(provider) = &state.llm else {
        warn!("chat request rejected: missing OPENAI_API_KEY");
        return Err(ApiError::AiProcessing);
    };

    match relay::chat(provider, &persona, &request.message).await {
        Ok(reply) => Ok(Json(ChatResponse { reply })),
        Err(err) => {
            error!("chat relay failed: {err}");
            Err(ApiError::AiProcessing)
        }
    }
}
