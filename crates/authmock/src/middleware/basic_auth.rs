//! HTTP Basic credential gate.

use authmock_core::basic_auth::parse_basic_authorization;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{error::ApiError, state::AppState};

/// Reject requests without the configured Basic credentials.
///
/// Passes everything through when no credentials are configured.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(gate) = &state.config.basic_auth else {
        return Ok(next.run(request).await);
    };

    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_authorization)
        .is_some_and(|credentials| gate.authorize(&credentials));

    if !authorized {
        tracing::debug!(path = %request.uri().path(), "Missing or wrong basic credentials");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
