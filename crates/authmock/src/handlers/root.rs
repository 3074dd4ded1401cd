use axum::{
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
};

/// GET / - Send browsers to the login form.
pub async fn index() -> impl IntoResponse {
    (StatusCode::FOUND, [(LOCATION, "/login")])
}
