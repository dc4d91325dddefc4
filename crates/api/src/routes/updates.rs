//! Campaign progress update endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use persistence::repositories::{CampaignRepository, UpdateRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Deserialize)]
pub struct CreateUpdateRequest {
    pub title: String,
    pub body: String,
}

/// GET /api/v1/campaigns/:id/updates
pub async fn list_campaign_updates(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    if campaigns.find_by_id(campaign_id).await?.is_none() {
        return Err(ApiError::NotFound("Campaign not found".into()));
    }

    let updates = UpdateRepository::new(state.pool.clone());
    let rows = updates.list_by_campaign(campaign_id).await?;

    Ok(Json(rows))
}

/// POST /api/v1/campaigns/:id/updates
///
/// Only the campaign owner (or an admin) may post updates.
pub async fn create_update(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(req): Json<CreateUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = req.title.trim();
    if title.is_empty() || title.len() > 200 {
        return Err(ApiError::Validation(
            "Update title must be 1-200 characters".into(),
        ));
    }

    let body = req.body.trim();
    if body.is_empty() {
        return Err(ApiError::Validation("Update body cannot be empty".into()));
    }
    if body.len() > state.config.limits.max_update_body_length {
        return Err(ApiError::Validation(format!(
            "Update body exceeds {} characters",
            state.config.limits.max_update_body_length
        )));
    }

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .find_by_id(campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    if campaign.user_id != auth.user_id && !auth.role.can_moderate() {
        return Err(ApiError::Forbidden(
            "Only the campaign owner can post updates".into(),
        ));
    }

    let updates = UpdateRepository::new(state.pool.clone());
    let update = updates.create(campaign_id, title, body).await?;

    Ok((StatusCode::CREATED, Json(update)))
}
