//! Session cookie and CSRF protection.
//!
//! The signed session cookie carries a per-browser CSRF secret. Safe requests
//! pass through untouched; every other request must present a token minted
//! for that secret, and the secret is rotated once it has been accepted so a
//! token cannot be replayed.

use authmock_core::csrf::{
    generate_secret, generate_token, verify_token, TOKEN_HEADERS, XSRF_COOKIE,
};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar, SignedCookieJar,
};

use crate::{config::ServerConfig, error::ApiError, state::AppState};

/// Token minted for the current response, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// First token found among the accepted headers.
fn presented_token(headers: &HeaderMap) -> Option<&str> {
    TOKEN_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok())
}

pub async fn session_csrf(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = SignedCookieJar::from_headers(request.headers(), state.cookie_key.clone());
    let config = &state.config;

    // A missing or tampered cookie yields nothing here, so a fresh secret is minted.
    let secret = jar
        .get(&config.session_cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(generate_secret);

    let secret = if is_safe(request.method()) {
        secret
    } else {
        let accepted = presented_token(request.headers())
            .is_some_and(|token| verify_token(&secret, token));

        if !accepted {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request without a valid CSRF token"
            );
            let response = ApiError::CsrfValidation.into_response();
            return with_session_cookies(config, jar, &secret, response);
        }

        generate_secret()
    };

    request
        .extensions_mut()
        .insert(CsrfToken(generate_token(&secret)));

    let response = next.run(request).await;
    with_session_cookies(config, jar, &secret, response)
}

/// Attach the session cookie and a freshly minted `XSRF-TOKEN` cookie.
fn with_session_cookies(
    config: &ServerConfig,
    jar: SignedCookieJar,
    secret: &str,
    response: Response,
) -> Response {
    let session = Cookie::build((config.session_cookie_name.clone(), secret.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax);

    // Scripts read this one to fill the request header, so it is not HttpOnly.
    let xsrf = Cookie::build((XSRF_COOKIE, generate_token(secret)))
        .path("/")
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax);

    (jar.add(session), CookieJar::new().add(xsrf), response).into_response()
}
