//! Current-user endpoints: profile, creator upgrade, donation history.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::Donation;
use persistence::repositories::{DonationRepository, UpdateProfile, UserRepository};
use shared::validation::validate_media_url;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 1000, message = "Bio is too long"))]
    pub bio: Option<String>,

    #[validate(custom(function = "validate_media_url"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 200, message = "Address is too long"))]
    pub address_line: Option<String>,

    #[validate(length(max = 100, message = "City is too long"))]
    pub city: Option<String>,

    #[validate(length(max = 100, message = "Country is too long"))]
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationHistoryEntry {
    #[serde(flatten)]
    pub donation: Donation,
    pub campaign_title: String,
}

/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(user))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(req): Json<UpdateMeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let patch = UpdateProfile {
        display_name: req.display_name.map(|s| s.trim().to_string()),
        bio: req.bio,
        avatar_url: req.avatar_url,
        address_line: req.address_line,
        city: req.city,
        country: req.country,
    };

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .update_profile(auth.user_id, &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(user))
}

/// POST /api/v1/users/me/become-creator
///
/// Upgrades a donor to a creator. The new role lands in tokens on the
/// next refresh; the response carries the updated profile immediately.
pub async fn become_creator(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserRepository::new(state.pool.clone());

    let user = match users.promote_to_creator(auth.user_id).await? {
        Some(user) => user,
        None => {
            // Either the account vanished or the role is no longer donor.
            return match users.find_by_id(auth.user_id).await? {
                Some(_) => Err(ApiError::Conflict(
                    "Only donor accounts can become creators".into(),
                )),
                None => Err(ApiError::NotFound("User not found".into())),
            };
        }
    };

    tracing::info!(user_id = %user.id, "User promoted to creator");

    Ok(Json(user))
}

/// GET /api/v1/users/me/donations
pub async fn list_my_donations(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let donations = DonationRepository::new(state.pool.clone());
    let rows = donations.list_by_user(auth.user_id).await?;

    let items: Vec<DonationHistoryEntry> = rows
        .into_iter()
        .map(|row| DonationHistoryEntry {
            donation: row.donation,
            campaign_title: row.campaign_title,
        })
        .collect();

    Ok(Json(items))
}
