//! Favorite repository for database operations.

use domain::models::Favorite;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CampaignWithCreatorEntity, FavoriteEntity};
use crate::metrics::QueryTimer;
use crate::repositories::CampaignWithCreator;

/// Repository for favorite database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a campaign to a user's favorites. Returns `None` when the pair
    /// already exists; favoriting twice is not an error for the caller to
    /// surface, just a no-op.
    pub async fn add(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<Option<Favorite>, sqlx::Error> {
        let timer = QueryTimer::new("add_favorite");
        let entity = sqlx::query_as::<_, FavoriteEntity>(
            r#"
            INSERT INTO favorites (user_id, campaign_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, campaign_id) DO NOTHING
            RETURNING id, user_id, campaign_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(campaign_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Favorite::from))
    }

    /// Remove a campaign from a user's favorites.
    pub async fn remove(&self, user_id: Uuid, campaign_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("remove_favorite");
        let result =
            sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND campaign_id = $2")
                .bind(user_id)
                .bind(campaign_id)
                .execute(&self.pool)
                .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }

    /// List the campaigns a user has favorited, most recently favorited
    /// first.
    pub async fn list_campaigns_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CampaignWithCreator>, sqlx::Error> {
        let timer = QueryTimer::new("list_favorite_campaigns");
        let entities = sqlx::query_as::<_, CampaignWithCreatorEntity>(
            r#"
            SELECT c.id, c.user_id, c.category_id, c.title, c.short_description,
                   c.description, c.goal_amount, c.current_amount, c.backers_count,
                   c.end_date, c.featured_image, c.video_url, c.status, c.is_featured,
                   c.created_at, c.updated_at, u.display_name AS creator_name
            FROM favorites f
            JOIN campaigns c ON c.id = f.campaign_id
            JOIN users u ON u.id = c.user_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        entities
            .into_iter()
            .map(|e| {
                Ok(CampaignWithCreator {
                    campaign: e.campaign.into_domain()?,
                    creator_name: e.creator_name,
                })
            })
            .collect()
    }
}
