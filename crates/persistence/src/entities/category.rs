//! Category entity.

use domain::models::Category;
use uuid::Uuid;

/// Database row for the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<CategoryEntity> for Category {
    fn from(e: CategoryEntity) -> Self {
        Category {
            id: e.id,
            name: e.name,
            slug: e.slug,
        }
    }
}
