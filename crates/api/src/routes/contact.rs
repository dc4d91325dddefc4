//! Public contact form endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use validator::Validate;

use persistence::repositories::ContactRepository;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,

    pub body: String,
}

/// POST /api/v1/contact
pub async fn submit_contact_message(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let body = req.body.trim();
    if body.is_empty() {
        return Err(ApiError::Validation("Message body cannot be empty".into()));
    }
    if body.len() > state.config.limits.max_contact_body_length {
        return Err(ApiError::Validation(format!(
            "Message body exceeds {} characters",
            state.config.limits.max_contact_body_length
        )));
    }

    let contacts = ContactRepository::new(state.pool.clone());
    let message = contacts
        .create(req.name.trim(), &req.email, req.subject.trim(), body)
        .await?;

    tracing::info!(message_id = %message.id, "Contact message received");

    Ok((StatusCode::CREATED, Json(message)))
}
