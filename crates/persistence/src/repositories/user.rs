//! User repository for database operations.

use domain::models::{User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, email, password_hash, display_name, bio, avatar_url, role, \
     address_line, city, country, is_active, created_at, updated_at";

/// Input for registering a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
}

/// Partial profile update.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
            && self.address_line.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        entity.map(UserEntity::into_domain).transpose()
    }

    /// Find a user by email. Emails are stored lowercased, so the lookup
    /// lowercases too.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE email = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        entity.map(UserEntity::into_domain).transpose()
    }

    /// Insert a new user with the donor role. A duplicate email surfaces
    /// as a unique-violation database error for the caller to map.
    pub async fn create(&self, input: NewUser) -> Result<User, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, password_hash, display_name, role)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.display_name)
        .bind(UserRole::Donor.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();

        entity?.into_domain()
    }

    /// Apply a partial profile update.
    pub async fn update_profile(
        &self,
        id: Uuid,
        patch: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let timer = QueryTimer::new("update_user_profile");

        let mut sets = Vec::new();
        let mut param_count = 0;

        // Keep the SET order and the bind order below in sync.
        for (present, column) in [
            (patch.display_name.is_some(), "display_name"),
            (patch.bio.is_some(), "bio"),
            (patch.avatar_url.is_some(), "avatar_url"),
            (patch.address_line.is_some(), "address_line"),
            (patch.city.is_some(), "city"),
            (patch.country.is_some(), "country"),
        ] {
            if present {
                param_count += 1;
                sets.push(format!("{} = ${}", column, param_count));
            }
        }
        sets.push("updated_at = NOW()".to_string());

        let update_query = format!(
            "UPDATE users SET {} WHERE id = ${} RETURNING {}",
            sets.join(", "),
            param_count + 1,
            USER_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, UserEntity>(&update_query);
        if let Some(ref display_name) = patch.display_name {
            builder = builder.bind(display_name);
        }
        if let Some(ref bio) = patch.bio {
            builder = builder.bind(bio);
        }
        if let Some(ref avatar_url) = patch.avatar_url {
            builder = builder.bind(avatar_url);
        }
        if let Some(ref address_line) = patch.address_line {
            builder = builder.bind(address_line);
        }
        if let Some(ref city) = patch.city {
            builder = builder.bind(city);
        }
        if let Some(ref country) = patch.country {
            builder = builder.bind(country);
        }

        let entity = builder.bind(id).fetch_optional(&self.pool).await;
        timer.record();

        entity?.map(UserEntity::into_domain).transpose()
    }

    /// Promote a donor to creator. Returns the updated user, or `None` if
    /// the user is missing or already holds a higher role.
    pub async fn promote_to_creator(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("promote_user_to_creator");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users SET role = $1, updated_at = NOW()
            WHERE id = $2 AND role = $3
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(UserRole::Creator.as_str())
        .bind(id)
        .bind(UserRole::Donor.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        entity?.map(UserEntity::into_domain).transpose()
    }

    /// Deactivate a user account. Inactive users fail authentication.
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_user_active");
        let result = sqlx::query(
            "UPDATE users SET is_active = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(active)
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }

    /// Total registered users, for the admin dashboard.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let count: Result<i64, _> = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        count
    }
}
