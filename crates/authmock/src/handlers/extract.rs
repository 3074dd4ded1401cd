//! Request extractors shared by the JSON endpoints.

use authmock_core::negotiation::accepts_json;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::ACCEPT, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Guard that rejects clients unwilling to take a JSON response with 406.
pub struct AcceptsJson;

impl<S> FromRequestParts<S> for AcceptsJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok());

        if accepts_json(accept) {
            Ok(Self)
        } else {
            Err(ApiError::NotAcceptable)
        }
    }
}

/// Lenient JSON body.
///
/// Anything that does not deserialize as `T` (wrong content, empty body,
/// wrong field types) becomes `T::default()`, so missing data surfaces as
/// field validation errors instead of a framework rejection.
pub struct JsonPayload<T>(pub T);

impl<T, S> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.unwrap_or_default();
        let value = serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "Request body is not the expected JSON");
            T::default()
        });
        Ok(Self(value))
    }
}
