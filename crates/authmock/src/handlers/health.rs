//! Health check endpoints.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

/// GET /healthz - Liveness plus a passive look at the bot supervisor.
///
/// Returns 503 when the supervisor task is gone.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let status = state
        .bot
        .status()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "bot": status,
    })))
}
