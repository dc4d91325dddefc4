//! Campaign Q&A comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Q&A entry on a campaign page.
///
/// A null `parent_id` marks a question; a non-null `parent_id` marks an
/// answer to that question. Nesting deeper than one level is not allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_question(&self) -> bool {
        self.parent_id.is_none()
    }
}
