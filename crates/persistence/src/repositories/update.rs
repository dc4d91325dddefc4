//! Campaign update repository for database operations.

use domain::models::CampaignUpdate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CampaignUpdateEntity;
use crate::metrics::QueryTimer;

/// Repository for campaign progress updates.
#[derive(Clone)]
pub struct UpdateRepository {
    pool: PgPool,
}

impl UpdateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a campaign's updates, newest first.
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<CampaignUpdate>, sqlx::Error> {
        let timer = QueryTimer::new("list_campaign_updates");
        let entities = sqlx::query_as::<_, CampaignUpdateEntity>(
            r#"
            SELECT id, campaign_id, title, body, created_at
            FROM campaign_updates
            WHERE campaign_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(entities?.into_iter().map(CampaignUpdate::from).collect())
    }

    /// Post a new update on a campaign.
    pub async fn create(
        &self,
        campaign_id: Uuid,
        title: &str,
        body: &str,
    ) -> Result<CampaignUpdate, sqlx::Error> {
        let timer = QueryTimer::new("create_campaign_update");
        let entity = sqlx::query_as::<_, CampaignUpdateEntity>(
            r#"
            INSERT INTO campaign_updates (campaign_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING id, campaign_id, title, body, created_at
            "#,
        )
        .bind(campaign_id)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }
}
