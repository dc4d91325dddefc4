//! Campaign endpoints: public listing and detail, creator CRUD, and the
//! submit/cancel lifecycle actions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::{Campaign, CampaignStatus, ListCampaignsQuery};
use domain::services::{apply_action, resolve_deadline, CampaignAction};
use persistence::repositories::{
    CampaignRepository, CampaignWithCreator, CategoryRepository, NewCampaign, UpdateCampaign,
};
use shared::pagination::PageParams;
use shared::validation::{validate_end_date, validate_goal_amount, validate_media_url};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_campaign_submitted;
use crate::routes::PagedResponse;

/// Query string for the public campaign listing. Filter fields and the
/// page window arrive together.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsParams {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: Option<CampaignStatus>,
    pub is_featured: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListCampaignsParams {
    fn split(self) -> (ListCampaignsQuery, PageParams) {
        (
            ListCampaignsQuery {
                search: self.search,
                category_id: self.category_id,
                status: self.status,
                is_featured: self.is_featured,
            },
            PageParams {
                page: self.page,
                limit: self.limit,
            },
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 500, message = "Short description must be 1-500 characters"))]
    pub short_description: String,

    #[validate(length(min = 1, max = 50000, message = "Description must be 1-50000 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_goal_amount"))]
    pub goal_amount: Decimal,

    #[validate(custom(function = "validate_end_date"))]
    pub end_date: DateTime<Utc>,

    #[validate(custom(function = "validate_media_url"))]
    pub featured_image: Option<String>,

    #[validate(custom(function = "validate_media_url"))]
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Short description must be 1-500 characters"))]
    pub short_description: Option<String>,

    #[validate(length(min = 1, max = 50000, message = "Description must be 1-50000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_goal_amount"))]
    pub goal_amount: Option<Decimal>,

    #[validate(custom(function = "validate_end_date"))]
    pub end_date: Option<DateTime<Utc>>,

    #[validate(custom(function = "validate_media_url"))]
    pub featured_image: Option<String>,

    #[validate(custom(function = "validate_media_url"))]
    pub video_url: Option<String>,
}

/// Campaign together with its creator's public display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub creator_name: String,
}

impl From<CampaignWithCreator> for CampaignResponse {
    fn from(row: CampaignWithCreator) -> Self {
        Self {
            campaign: row.campaign,
            creator_name: row.creator_name,
        }
    }
}

/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<ListCampaignsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (query, page_params) = params.split();
    let page = page_params.normalize();

    let campaigns = CampaignRepository::new(state.pool.clone());
    let (rows, total) = campaigns.list(&query, &page).await?;

    let items: Vec<CampaignResponse> = rows.into_iter().map(CampaignResponse::from).collect();

    Ok(Json(PagedResponse::new(items, page.meta(total))))
}

/// GET /api/v1/campaigns/:id
///
/// An active campaign whose deadline has passed is resolved lazily here:
/// the terminal status is computed from the totals and swapped in before
/// the response is built.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let mut row = campaigns
        .find_with_creator(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    if let Some(target) = resolve_deadline(&row.campaign, Utc::now()) {
        let swapped = campaigns
            .set_status(id, CampaignStatus::Active, target)
            .await?;
        if swapped {
            tracing::info!(campaign_id = %id, status = %target, "Campaign deadline resolved");
            row.campaign.status = target;
        }
    }

    Ok(Json(CampaignResponse::from(row)))
}

/// GET /api/v1/users/me/campaigns
pub async fn list_my_campaigns(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let rows = campaigns.list_by_creator(auth.user_id).await?;

    Ok(Json(rows))
}

/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !matches!(
        auth.role,
        domain::models::UserRole::Creator | domain::models::UserRole::Admin
    ) {
        return Err(ApiError::Forbidden(
            "Only creator accounts can start campaigns".into(),
        ));
    }

    req.validate()?;

    let categories = CategoryRepository::new(state.pool.clone());
    if categories.find_by_id(req.category_id).await?.is_none() {
        return Err(ApiError::Validation("Unknown category".into()));
    }

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .create(NewCampaign {
            user_id: auth.user_id,
            category_id: req.category_id,
            title: req.title.trim().to_string(),
            short_description: req.short_description.trim().to_string(),
            description: req.description,
            goal_amount: req.goal_amount,
            end_date: req.end_date,
            featured_image: req.featured_image,
            video_url: req.video_url,
        })
        .await?;

    tracing::info!(campaign_id = %campaign.id, user_id = %auth.user_id, "Campaign created");

    Ok((StatusCode::CREATED, Json(campaign)))
}

/// PUT /api/v1/campaigns/:id
///
/// Only drafts are editable; anything already submitted is immutable to
/// its owner until moderation finishes.
pub async fn update_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    require_owner(&campaign, &auth)?;

    if campaign.status != CampaignStatus::Draft {
        return Err(ApiError::Conflict(format!(
            "Campaign in status {} cannot be edited",
            campaign.status
        )));
    }

    if let Some(category_id) = req.category_id {
        let categories = CategoryRepository::new(state.pool.clone());
        if categories.find_by_id(category_id).await?.is_none() {
            return Err(ApiError::Validation("Unknown category".into()));
        }
    }

    let patch = UpdateCampaign {
        category_id: req.category_id,
        title: req.title.map(|s| s.trim().to_string()),
        short_description: req.short_description.map(|s| s.trim().to_string()),
        description: req.description,
        goal_amount: req.goal_amount,
        end_date: req.end_date,
        featured_image: req.featured_image,
        video_url: req.video_url,
    };

    let updated = campaigns
        .update_draft(id, CampaignStatus::Draft, &patch)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Campaign was submitted while the edit was in flight".into())
        })?;

    Ok(Json(updated))
}

/// POST /api/v1/campaigns/:id/submit
pub async fn submit_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign = transition(&state, &auth, id, CampaignAction::Submit).await?;
    record_campaign_submitted();
    tracing::info!(campaign_id = %id, "Campaign submitted for review");
    Ok(Json(campaign))
}

/// POST /api/v1/campaigns/:id/cancel
pub async fn cancel_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign = transition(&state, &auth, id, CampaignAction::Cancel).await?;
    tracing::info!(campaign_id = %id, "Campaign cancelled by owner");
    Ok(Json(campaign))
}

/// Owner-initiated lifecycle transition with a compare-and-swap guard so
/// two concurrent requests cannot both apply.
async fn transition(
    state: &AppState,
    auth: &UserAuth,
    id: Uuid,
    action: CampaignAction,
) -> Result<Campaign, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let mut campaign = campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    require_owner(&campaign, auth)?;

    let target = apply_action(campaign.status, action)?;

    let swapped = campaigns.set_status(id, campaign.status, target).await?;
    if !swapped {
        return Err(ApiError::Conflict(
            "Campaign status changed concurrently".into(),
        ));
    }

    campaign.status = target;
    Ok(campaign)
}

fn require_owner(campaign: &Campaign, auth: &UserAuth) -> Result<(), ApiError> {
    if campaign.user_id == auth.user_id || auth.role.can_moderate() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not own this campaign".into(),
        ))
    }
}
