//! Control surface for the single automation process.

use authmock_bot::{BotStatus, StopOutcome};
use authmock_core::validation::validate_username;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    handlers::extract::{AcceptsJson, JsonPayload},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BotRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub success: bool,
    pub pid: u32,
    pub already_running: bool,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub success: bool,
    /// Pid that was told to stop, if any.
    pub stopped: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: BotStatus,
}

/// POST /bot - Start the bot, or report the one already running.
#[axum::debug_handler]
pub async fn start_bot(
    State(state): State<AppState>,
    _: AcceptsJson,
    JsonPayload(body): JsonPayload<BotRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    validate_username(&body.username).map_err(ApiError::Validation)?;

    let outcome = state.bot.start(&body.username).await?;

    Ok(Json(StartResponse {
        success: true,
        pid: outcome.pid,
        already_running: outcome.already_running,
    }))
}

/// POST /bot/stop - Stop the bot if one is running.
#[axum::debug_handler]
pub async fn stop_bot(
    State(state): State<AppState>,
    _: AcceptsJson,
    JsonPayload(body): JsonPayload<BotRequest>,
) -> Result<Json<StopResponse>, ApiError> {
    validate_username(&body.username).map_err(ApiError::Validation)?;

    let stopped = match state.bot.stop(&body.username).await? {
        StopOutcome::Stopping { pid } => Some(pid),
        StopOutcome::NotRunning => None,
    };

    Ok(Json(StopResponse {
        success: true,
        stopped,
    }))
}

/// GET /bot - Current supervisor state.
#[axum::debug_handler]
pub async fn bot_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.bot.status().await?;

    Ok(Json(StatusResponse {
        success: true,
        status,
    }))
}
