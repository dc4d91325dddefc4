//! Category repository for database operations.

use domain::models::Category;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CategoryEntity;
use crate::metrics::QueryTimer;

/// Repository for campaign categories.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories alphabetically.
    pub async fn list_all(&self) -> Result<Vec<Category>, sqlx::Error> {
        let timer = QueryTimer::new("list_categories");
        let entities = sqlx::query_as::<_, CategoryEntity>(
            "SELECT id, name, slug FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(entities?.into_iter().map(Category::from).collect())
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        let timer = QueryTimer::new("find_category_by_id");
        let entity = sqlx::query_as::<_, CategoryEntity>(
            "SELECT id, name, slug FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Category::from))
    }
}
