use authmock_core::contact::Contact;
use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub contact: Contact,
}

/// GET /contact - Owner of the root group.
#[axum::debug_handler]
pub async fn contact(State(state): State<AppState>) -> Result<Json<ContactResponse>, ApiError> {
    let contact = state.directory.root_group_owner().await?;

    Ok(Json(ContactResponse {
        success: true,
        contact,
    }))
}
