//! Campaign entity.

use chrono::{DateTime, Utc};
use domain::models::Campaign;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::decode_enum;

/// Database row for the `campaigns` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub goal_amount: Decimal,
    pub current_amount: Decimal,
    pub backers_count: i32,
    pub end_date: DateTime<Utc>,
    pub featured_image: Option<String>,
    pub video_url: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignEntity {
    pub fn into_domain(self) -> Result<Campaign, sqlx::Error> {
        Ok(Campaign {
            id: self.id,
            user_id: self.user_id,
            category_id: self.category_id,
            title: self.title,
            short_description: self.short_description,
            description: self.description,
            goal_amount: self.goal_amount,
            current_amount: self.current_amount,
            backers_count: self.backers_count,
            end_date: self.end_date,
            featured_image: self.featured_image,
            video_url: self.video_url,
            status: decode_enum(&self.status)?,
            is_featured: self.is_featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Campaign row joined with the creator's display name, as returned by
/// listing queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignWithCreatorEntity {
    #[sqlx(flatten)]
    pub campaign: CampaignEntity,
    pub creator_name: String,
}
