//! Campaign Q&A endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::Comment;
use persistence::repositories::{CampaignRepository, CommentRepository, CommentWithAuthor};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub body: String,
    /// Set to answer an existing question; absent for a new question.
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(flatten)]
    pub comment: Comment,
    pub author_name: String,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(row: CommentWithAuthor) -> Self {
        Self {
            comment: row.comment,
            author_name: row.author_name,
        }
    }
}

/// GET /api/v1/campaigns/:id/comments
pub async fn list_campaign_comments(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    if campaigns.find_by_id(campaign_id).await?.is_none() {
        return Err(ApiError::NotFound("Campaign not found".into()));
    }

    let comments = CommentRepository::new(state.pool.clone());
    let rows = comments.list_by_campaign(campaign_id).await?;

    let items: Vec<CommentResponse> = rows.into_iter().map(CommentResponse::from).collect();

    Ok(Json(items))
}

/// POST /api/v1/campaigns/:id/comments
///
/// Threads are one level deep: a comment either starts a question or
/// answers one. Answering an answer is rejected.
pub async fn create_comment(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let body = req.body.trim();
    if body.is_empty() {
        return Err(ApiError::Validation("Comment body cannot be empty".into()));
    }
    if body.len() > state.config.limits.max_comment_length {
        return Err(ApiError::Validation(format!(
            "Comment body exceeds {} characters",
            state.config.limits.max_comment_length
        )));
    }

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .find_by_id(campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    let comments = CommentRepository::new(state.pool.clone());

    if let Some(parent_id) = req.parent_id {
        // Answers come from the campaign owner or a moderator.
        if campaign.user_id != auth.user_id && !auth.role.can_moderate() {
            return Err(ApiError::Forbidden(
                "Only the campaign owner can answer questions".into(),
            ));
        }

        let parent = comments
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Parent comment not found".into()))?;

        if parent.campaign_id != campaign_id {
            return Err(ApiError::Validation(
                "Parent comment belongs to a different campaign".into(),
            ));
        }
        if !parent.is_question() {
            return Err(ApiError::Validation(
                "Answers cannot be nested under other answers".into(),
            ));
        }
    }

    let comment = comments
        .create(campaign_id, auth.user_id, req.parent_id, body)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
