//! Campaign categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A browsing category campaigns are filed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}
