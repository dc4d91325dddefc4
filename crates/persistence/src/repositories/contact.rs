//! Contact message repository for database operations.

use domain::models::ContactMessage;
use shared::pagination::Page;
use sqlx::PgPool;

use crate::entities::ContactMessageEntity;
use crate::metrics::QueryTimer;

/// Repository for contact form submissions.
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a contact form submission.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        body: &str,
    ) -> Result<ContactMessage, sqlx::Error> {
        let timer = QueryTimer::new("create_contact_message");
        let entity = sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            INSERT INTO contact_messages (name, email, subject, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, subject, body, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(subject)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    /// List submissions for admin review, newest first.
    pub async fn list(&self, page: &Page) -> Result<(Vec<ContactMessage>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_contact_messages");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;

        let entities = sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            SELECT id, name, email, subject, body, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((
            entities.into_iter().map(ContactMessage::from).collect(),
            total,
        ))
    }
}
