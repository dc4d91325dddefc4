//! Admin endpoints: moderation queue, featured flag, comment removal,
//! contact inbox, and platform statistics.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::{Campaign, CampaignStatus, ListCampaignsQuery};
use domain::services::{apply_action, CampaignAction};
use persistence::repositories::{
    CampaignRepository, CommentRepository, ContactRepository, DonationRepository, FeatureOutcome,
    UserRepository,
};
use shared::pagination::PageParams;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::campaigns::CampaignResponse;
use crate::routes::PagedResponse;

#[derive(Debug, Deserialize)]
pub struct SetFeaturedRequest {
    pub featured: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: i64,
    pub campaigns: CampaignStats,
    pub donations: DonationStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    pub count: i64,
    pub total_amount: Decimal,
}

/// GET /api/v1/admin/campaigns/pending
pub async fn list_pending_campaigns(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = params.normalize();
    let query = ListCampaignsQuery {
        status: Some(CampaignStatus::PendingReview),
        ..Default::default()
    };

    let campaigns = CampaignRepository::new(state.pool.clone());
    let (rows, total) = campaigns.list(&query, &page).await?;

    let items: Vec<CampaignResponse> = rows.into_iter().map(CampaignResponse::from).collect();

    Ok(Json(PagedResponse::new(items, page.meta(total))))
}

/// POST /api/v1/admin/campaigns/:id/approve
pub async fn approve_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign = moderate(&state, id, CampaignAction::Approve).await?;
    tracing::info!(campaign_id = %id, "Campaign approved");
    Ok(Json(campaign))
}

/// POST /api/v1/admin/campaigns/:id/reject
pub async fn reject_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign = moderate(&state, id, CampaignAction::Reject).await?;
    tracing::info!(campaign_id = %id, "Campaign rejected");
    Ok(Json(campaign))
}

/// Moderation decision with a compare-and-swap guard. When two admins
/// decide at once, only the first swap lands; the second gets a conflict.
async fn moderate(
    state: &AppState,
    id: Uuid,
    action: CampaignAction,
) -> Result<Campaign, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let mut campaign = campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    let target = apply_action(campaign.status, action)?;

    let swapped = campaigns.set_status(id, campaign.status, target).await?;
    if !swapped {
        return Err(ApiError::Conflict(
            "Campaign was moderated concurrently".into(),
        ));
    }

    campaign.status = target;
    Ok(campaign)
}

/// PUT /api/v1/admin/campaigns/:id/featured
pub async fn set_campaign_featured(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetFeaturedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());

    match campaigns.set_featured(id, req.featured).await? {
        FeatureOutcome::Updated => {
            tracing::info!(campaign_id = %id, featured = req.featured, "Featured flag updated");
            let campaign = campaigns
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;
            Ok(Json(campaign))
        }
        FeatureOutcome::NotFound => Err(ApiError::NotFound("Campaign not found".into())),
        FeatureOutcome::CapReached => Err(ApiError::Conflict(
            "Featured campaign limit reached".into(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetUserActiveRequest {
    pub active: bool,
}

/// PUT /api/v1/admin/users/:id/active
///
/// Deactivated accounts fail login and token refresh; existing access
/// tokens expire on their own.
pub async fn set_user_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetUserActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let updated = users.set_active(id, req.active).await?;

    if !updated {
        return Err(ApiError::NotFound("User not found".into()));
    }

    tracing::info!(user_id = %id, active = req.active, "User active flag changed");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = CommentRepository::new(state.pool.clone());
    let deleted = comments.delete(id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Comment not found".into()));
    }

    tracing::info!(comment_id = %id, "Comment removed by moderation");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/contact-messages
pub async fn list_contact_messages(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = params.normalize();
    let contacts = ContactRepository::new(state.pool.clone());
    let (rows, total) = contacts.list(&page).await?;

    Ok(Json(PagedResponse::new(rows, page.meta(total))))
}

/// GET /api/v1/admin/stats
pub async fn get_admin_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let campaigns = CampaignRepository::new(state.pool.clone());
    let donations = DonationRepository::new(state.pool.clone());

    let user_count = users.count().await?;
    let status_counts = campaigns.count_by_status().await?;
    let (donation_count, donation_total) = donations.totals().await?;

    let mut by_status = BTreeMap::new();
    let mut campaign_total = 0;
    for (status, count) in status_counts {
        campaign_total += count;
        by_status.insert(status, count);
    }

    Ok(Json(AdminStats {
        users: user_count,
        campaigns: CampaignStats {
            total: campaign_total,
            by_status,
        },
        donations: DonationStats {
            count: donation_count,
            total_amount: donation_total,
        },
    }))
}
