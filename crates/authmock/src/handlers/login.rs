//! Mock login: any name and well-formed email get a signed token.

use authmock_core::{
    token::{encode_token, IdentityClaim},
    validation::validate_login,
};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::ApiError,
    handlers::extract::{AcceptsJson, JsonPayload},
    middleware::CsrfToken,
    state::AppState,
    templates,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    /// Relying application URL carrying the token.
    pub redirect: String,
}

/// GET /login - Render the login form.
pub async fn login_page(Extension(CsrfToken(token)): Extension<CsrfToken>) -> impl IntoResponse {
    Html(templates::login_page(&token))
}

/// POST /login - Validate the identity claim and issue a token.
#[axum::debug_handler]
pub async fn login_submit(
    State(state): State<AppState>,
    _: AcceptsJson,
    JsonPayload(body): JsonPayload<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_login(&body.name, &body.email).map_err(ApiError::Validation)?;

    let identity = IdentityClaim::new(body.name, body.email);
    let config = &state.config;
    let token = encode_token(&identity, &config.secret, Utc::now(), config.token_ttl)?;

    tracing::info!(email = %identity.email, "Authenticated");

    Ok(Json(LoginResponse {
        success: true,
        redirect: redirect_with_token(&config.app_url, &token).into(),
    }))
}

/// Append `jwt=<token>` to the app URL, keeping any existing query parameters.
pub fn redirect_with_token(app_url: &Url, token: &str) -> Url {
    let mut url = app_url.clone();
    url.query_pairs_mut().append_pair("jwt", token);
    url
}
