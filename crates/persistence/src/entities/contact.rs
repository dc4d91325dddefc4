//! Contact message entity.

use chrono::{DateTime, Utc};
use domain::models::ContactMessage;
use uuid::Uuid;

/// Database row for the `contact_messages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactMessageEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessageEntity> for ContactMessage {
    fn from(e: ContactMessageEntity) -> Self {
        ContactMessage {
            id: e.id,
            name: e.name,
            email: e.email,
            subject: e.subject,
            body: e.body,
            created_at: e.created_at,
        }
    }
}
