//! Comment repository for database operations.
//!
//! Comments form a flat question/answer thread: top-level rows are
//! questions, rows with a `parent_id` are answers to that question.

use domain::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CommentEntity, CommentWithAuthorEntity};
use crate::metrics::QueryTimer;

const COMMENT_COLUMNS: &str = "co.id, co.campaign_id, co.user_id, co.parent_id, co.body, co.created_at";

/// Comment joined with the author's display name.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author_name: String,
}

/// Repository for comment database operations.
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a campaign's comments oldest first. Callers group answers
    /// under their question via `parent_id`.
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let timer = QueryTimer::new("list_comments_by_campaign");
        let entities = sqlx::query_as::<_, CommentWithAuthorEntity>(&format!(
            r#"
            SELECT {}, u.display_name AS author_name
            FROM comments co
            JOIN users u ON u.id = co.user_id
            WHERE co.campaign_id = $1
            ORDER BY co.created_at ASC
            "#,
            COMMENT_COLUMNS
        ))
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(entities?
            .into_iter()
            .map(|e| CommentWithAuthor {
                comment: e.comment.into(),
                author_name: e.author_name,
            })
            .collect())
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        let timer = QueryTimer::new("find_comment_by_id");
        let entity = sqlx::query_as::<_, CommentEntity>(&format!(
            "SELECT {} FROM comments co WHERE co.id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Comment::from))
    }

    /// Insert a comment. `parent_id` is `None` for a question and set for
    /// an answer; the caller validates the parent before inserting.
    pub async fn create(
        &self,
        campaign_id: Uuid,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        let timer = QueryTimer::new("create_comment");
        let entity = sqlx::query_as::<_, CommentEntity>(&format!(
            r#"
            INSERT INTO comments AS co (campaign_id, user_id, parent_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(campaign_id)
        .bind(user_id)
        .bind(parent_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    /// Delete a comment and any answers under it. Used by moderation.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_comment");
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 OR parent_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }
}
