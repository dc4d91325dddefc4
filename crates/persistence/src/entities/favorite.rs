//! Favorite entity.

use chrono::{DateTime, Utc};
use domain::models::Favorite;
use uuid::Uuid;

/// Database row for the `favorites` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub campaign_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteEntity> for Favorite {
    fn from(e: FavoriteEntity) -> Self {
        Favorite {
            id: e.id,
            user_id: e.user_id,
            campaign_id: e.campaign_id,
            created_at: e.created_at,
        }
    }
}
