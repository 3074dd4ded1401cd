use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        bot::{bot_status, start_bot, stop_bot},
        contact::contact,
        health::healthz,
        login::{login_page, login_submit},
        root::index,
    },
    middleware::{require_basic_auth, session_csrf},
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// Requests pass the session/CSRF check first, then the credential gate,
/// then reach a handler.
pub fn create_app(state: AppState) -> Router {
    // Paths used by front-ends built against the older mock
    let legacy_routes = Router::new()
        .route("/auth/mock/", get(login_page))
        .route("/auth/api/v1/mock", post(login_submit))
        .route("/auth/api/v1/bot", post(start_bot))
        .route("/auth/api/v1/bot/stop", post(stop_bot))
        .route("/auth/contact", get(contact));

    Router::new()
        .route("/", get(index))
        .route("/login", get(login_page).post(login_submit))
        .route("/contact", get(contact))
        .route("/bot", get(bot_status).post(start_bot))
        .route("/bot/stop", post(stop_bot))
        .route("/healthz", get(healthz))
        .merge(legacy_routes)
        .layer(from_fn_with_state(state.clone(), require_basic_auth))
        .layer(from_fn_with_state(state.clone(), session_csrf))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
