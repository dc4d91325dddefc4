//! Comment entity.

use chrono::{DateTime, Utc};
use domain::models::Comment;
use uuid::Uuid;

/// Database row for the `comments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentEntity> for Comment {
    fn from(e: CommentEntity) -> Self {
        Comment {
            id: e.id,
            campaign_id: e.campaign_id,
            user_id: e.user_id,
            parent_id: e.parent_id,
            body: e.body,
            created_at: e.created_at,
        }
    }
}

/// Comment row joined with the author's display name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthorEntity {
    #[sqlx(flatten)]
    pub comment: CommentEntity,
    pub author_name: String,
}
