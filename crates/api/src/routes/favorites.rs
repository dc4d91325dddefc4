//! Favorite endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use persistence::repositories::{CampaignRepository, FavoriteRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::campaigns::CampaignResponse;

/// PUT /api/v1/campaigns/:id/favorite
///
/// Idempotent; favoriting an already-favorited campaign is a no-op.
pub async fn add_favorite(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    if campaigns.find_by_id(campaign_id).await?.is_none() {
        return Err(ApiError::NotFound("Campaign not found".into()));
    }

    let favorites = FavoriteRepository::new(state.pool.clone());
    favorites.add(auth.user_id, campaign_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/campaigns/:id/favorite
pub async fn remove_favorite(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let favorites = FavoriteRepository::new(state.pool.clone());
    favorites.remove(auth.user_id, campaign_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/me/favorites
pub async fn list_my_favorites(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let favorites = FavoriteRepository::new(state.pool.clone());
    let rows = favorites.list_campaigns_for_user(auth.user_id).await?;

    let items: Vec<CampaignResponse> = rows.into_iter().map(CampaignResponse::from).collect();

    Ok(Json(items))
}
