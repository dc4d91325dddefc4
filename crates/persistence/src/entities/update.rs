//! Campaign update entity.

use chrono::{DateTime, Utc};
use domain::models::CampaignUpdate;
use uuid::Uuid;

/// Database row for the `campaign_updates` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignUpdateEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CampaignUpdateEntity> for CampaignUpdate {
    fn from(e: CampaignUpdateEntity) -> Self {
        CampaignUpdate {
            id: e.id,
            campaign_id: e.campaign_id,
            title: e.title,
            body: e.body,
            created_at: e.created_at,
        }
    }
}
