use authmock_bot::BotError;
use authmock_core::{
    basic_auth::BASIC_CHALLENGE, contact::DirectoryError, token::TokenError,
    validation::FieldError,
};
use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every failure a handler or middleware can answer with.
///
/// This is the only place HTTP error shapes are built.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<FieldError>),

    #[error("CSRF token missing or invalid")]
    CsrfValidation,

    #[error("authorization required")]
    Unauthorized,

    #[error("client does not accept JSON")]
    NotAcceptable,

    #[error("bot process {pid} is still stopping")]
    BotBusy { pid: u32 },

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Server(#[from] anyhow::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_errors: Option<&'a [FieldError]>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::CsrfValidation => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::BotBusy { .. } => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error name reported in the `error` field.
    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::CsrfValidation => "CsrfValidationError",
            Self::Unauthorized => "Unauthorized",
            Self::NotAcceptable => "NotAcceptable",
            Self::BotBusy { .. } => "BotBusy",
            Self::Unavailable(_) => "ServiceUnavailable",
            Self::Server(_) => "ServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Server(err) => tracing::error!(error = ?err, "Request failed"),
            Self::Unavailable(reason) => tracing::error!(%reason, "Service unavailable"),
            Self::BotBusy { pid } => tracing::warn!(pid, "Bot start refused while stopping"),
            _ => tracing::debug!(error = %self, "Request rejected"),
        }

        let body = ErrorBody {
            success: false,
            error: self.kind(),
            validation_errors: match &self {
                Self::Validation(errors) => Some(errors.as_slice()),
                _ => None,
            },
        };

        let mut response = (self.status(), Json(body)).into_response();

        if matches!(self, Self::Unauthorized) {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }

        response
    }
}

impl From<BotError> for ApiError {
    fn from(err: BotError) -> Self {
        match err {
            BotError::StopInProgress { pid } => Self::BotBusy { pid },
            other => Self::Server(other.into()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Server(err.into())
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        Self::Server(err.into())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let err = ApiError::Validation(vec![
            FieldError::new("name", "Name is required", ""),
            FieldError::new("email", "Invalid email", "nope"),
        ]);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "ValidationError");
        assert_eq!(json["validationErrors"].as_array().unwrap().len(), 2);
        assert_eq!(json["validationErrors"][1]["param"], "email");
        assert_eq!(json["validationErrors"][1]["value"], "nope");
    }

    #[tokio::test]
    async fn server_error_hides_detail() {
        let err = ApiError::from(DirectoryError::Unavailable("db down".to_string()));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"success": false, "error": "ServerError"}));
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let response = ApiError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            BASIC_CHALLENGE
        );
    }

    #[tokio::test]
    async fn unavailable_is_503_without_detail() {
        let response = ApiError::Unavailable("supervisor gone".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "ServiceUnavailable"})
        );
    }

    #[test]
    fn stop_in_progress_maps_to_conflict() {
        let err = ApiError::from(BotError::StopInProgress { pid: 42 });
        assert!(matches!(err, ApiError::BotBusy { pid: 42 }));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err = ApiError::from(BotError::NotConfigured);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
