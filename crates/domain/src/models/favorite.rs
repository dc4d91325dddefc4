//! User favorites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Join row marking a campaign as favorited by a user.
/// Unique per (user, campaign) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub campaign_id: Uuid,
    pub created_at: DateTime<Utc>,
}
