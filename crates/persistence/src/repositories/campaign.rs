//! Campaign repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::{Campaign, CampaignStatus, ListCampaignsQuery, FEATURED_CAMPAIGN_CAP};
use rust_decimal::Decimal;
use shared::pagination::Page;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CampaignEntity, CampaignWithCreatorEntity};
use crate::metrics::QueryTimer;

const CAMPAIGN_COLUMNS: &str =
    "c.id, c.user_id, c.category_id, c.title, c.short_description, c.description, \
     c.goal_amount, c.current_amount, c.backers_count, c.end_date, c.featured_image, \
     c.video_url, c.status, c.is_featured, c.created_at, c.updated_at";

/// Campaign joined with its creator's display name.
#[derive(Debug, Clone)]
pub struct CampaignWithCreator {
    pub campaign: Campaign,
    pub creator_name: String,
}

/// Input for inserting a new campaign. New campaigns always start as drafts
/// with a zero running total.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub goal_amount: Decimal,
    pub end_date: DateTime<Utc>,
    pub featured_image: Option<String>,
    pub video_url: Option<String>,
}

/// Partial update applied to a campaign that has not been submitted yet.
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaign {
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub goal_amount: Option<Decimal>,
    pub end_date: Option<DateTime<Utc>>,
    pub featured_image: Option<String>,
    pub video_url: Option<String>,
}

impl UpdateCampaign {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.title.is_none()
            && self.short_description.is_none()
            && self.description.is_none()
            && self.goal_amount.is_none()
            && self.end_date.is_none()
            && self.featured_image.is_none()
            && self.video_url.is_none()
    }
}

/// Result of toggling the featured flag on a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOutcome {
    Updated,
    NotFound,
    CapReached,
}

/// Escapes LIKE metacharacters in a search term and wraps it in wildcards,
/// so user input always matches as a literal substring.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Helper struct for building dynamic WHERE clauses from campaign filters.
/// Both the COUNT query and the page query are built from the same
/// conditions and bind the same parameters, so the reported total always
/// matches the filtered rows.
struct CampaignFilterBuilder {
    status: String,
    search_pattern: Option<String>,
    category_id: Option<Uuid>,
    is_featured: Option<bool>,
    conditions: Vec<String>,
    param_count: i32,
}

impl CampaignFilterBuilder {
    fn build(query: &ListCampaignsQuery) -> Self {
        let mut conditions = vec!["c.status = $1".to_string()];
        let mut param_count = 1;

        let search_pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        if search_pattern.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(c.title ILIKE ${n} OR c.short_description ILIKE ${n} OR c.description ILIKE ${n})",
                n = param_count
            ));
        }

        if query.category_id.is_some() {
            param_count += 1;
            conditions.push(format!("c.category_id = ${}", param_count));
        }

        if query.is_featured.is_some() {
            param_count += 1;
            conditions.push(format!("c.is_featured = ${}", param_count));
        }

        Self {
            status: query.effective_status().as_str().to_string(),
            search_pattern,
            category_id: query.category_id,
            is_featured: query.is_featured,
            conditions,
            param_count,
        }
    }

    fn where_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind campaign filter parameters to a SQLx builder, in the same
/// order `CampaignFilterBuilder::build` numbered them.
macro_rules! bind_campaign_filters {
    ($builder:expr, $filter:expr) => {{
        let mut b = $builder.bind(&$filter.status);
        if let Some(ref pattern) = $filter.search_pattern {
            b = b.bind(pattern);
        }
        if let Some(category_id) = $filter.category_id {
            b = b.bind(category_id);
        }
        if let Some(is_featured) = $filter.is_featured {
            b = b.bind(is_featured);
        }
        b
    }};
}

/// Repository for campaign database operations.
#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List campaigns matching the filters, newest first with featured
    /// campaigns pinned to the front. Returns the page of rows together
    /// with the total count over the same filters.
    pub async fn list(
        &self,
        query: &ListCampaignsQuery,
        page: &Page,
    ) -> Result<(Vec<CampaignWithCreator>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_campaigns");

        let filter = CampaignFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM campaigns c WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_campaign_filters!(count_builder, filter);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT {columns}, u.display_name AS creator_name
            FROM campaigns c
            JOIN users u ON u.id = c.user_id
            WHERE {where_clause}
            ORDER BY c.is_featured DESC, c.created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            param_count + 1,
            param_count + 2,
            columns = CAMPAIGN_COLUMNS,
            where_clause = where_clause,
        );

        let list_builder = sqlx::query_as::<_, CampaignWithCreatorEntity>(&list_query);
        let list_builder = bind_campaign_filters!(list_builder, filter);
        let entities = list_builder
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();

        let campaigns = entities
            .into_iter()
            .map(|e| {
                Ok(CampaignWithCreator {
                    campaign: e.campaign.into_domain()?,
                    creator_name: e.creator_name,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok((campaigns, total))
    }

    /// Find a campaign by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, sqlx::Error> {
        let timer = QueryTimer::new("find_campaign_by_id");
        let entity = sqlx::query_as::<_, CampaignEntity>(&format!(
            "SELECT {} FROM campaigns c WHERE c.id = $1",
            CAMPAIGN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        entity.map(CampaignEntity::into_domain).transpose()
    }

    /// Find a campaign by ID together with its creator's display name.
    pub async fn find_with_creator(
        &self,
        id: Uuid,
    ) -> Result<Option<CampaignWithCreator>, sqlx::Error> {
        let timer = QueryTimer::new("find_campaign_with_creator");
        let entity = sqlx::query_as::<_, CampaignWithCreatorEntity>(&format!(
            r#"
            SELECT {}, u.display_name AS creator_name
            FROM campaigns c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = $1
            "#,
            CAMPAIGN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        entity
            .map(|e| {
                Ok(CampaignWithCreator {
                    campaign: e.campaign.into_domain()?,
                    creator_name: e.creator_name,
                })
            })
            .transpose()
    }

    /// List every campaign owned by a creator, regardless of status.
    pub async fn list_by_creator(&self, user_id: Uuid) -> Result<Vec<Campaign>, sqlx::Error> {
        let timer = QueryTimer::new("list_campaigns_by_creator");
        let entities = sqlx::query_as::<_, CampaignEntity>(&format!(
            "SELECT {} FROM campaigns c WHERE c.user_id = $1 ORDER BY c.created_at DESC",
            CAMPAIGN_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        entities
            .into_iter()
            .map(CampaignEntity::into_domain)
            .collect()
    }

    /// Insert a new draft campaign.
    pub async fn create(&self, input: NewCampaign) -> Result<Campaign, sqlx::Error> {
        let timer = QueryTimer::new("create_campaign");
        let entity = sqlx::query_as::<_, CampaignEntity>(&format!(
            r#"
            INSERT INTO campaigns (
                user_id, category_id, title, short_description, description,
                goal_amount, end_date, featured_image, video_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        ))
        .bind(input.user_id)
        .bind(input.category_id)
        .bind(&input.title)
        .bind(&input.short_description)
        .bind(&input.description)
        .bind(input.goal_amount)
        .bind(input.end_date)
        .bind(&input.featured_image)
        .bind(&input.video_url)
        .bind(CampaignStatus::Draft.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();

        entity?.into_domain()
    }

    /// Apply a partial update to a campaign, guarded by its current status
    /// so an already-submitted campaign cannot be edited.
    pub async fn update_draft(
        &self,
        id: Uuid,
        expected_status: CampaignStatus,
        patch: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let timer = QueryTimer::new("update_campaign_draft");

        let mut sets = Vec::new();
        let mut param_count = 0;

        // Keep the SET order and the bind order below in sync.
        for (present, column) in [
            (patch.category_id.is_some(), "category_id"),
            (patch.title.is_some(), "title"),
            (patch.short_description.is_some(), "short_description"),
            (patch.description.is_some(), "description"),
            (patch.goal_amount.is_some(), "goal_amount"),
            (patch.end_date.is_some(), "end_date"),
            (patch.featured_image.is_some(), "featured_image"),
            (patch.video_url.is_some(), "video_url"),
        ] {
            if present {
                param_count += 1;
                sets.push(format!("{} = ${}", column, param_count));
            }
        }
        sets.push("updated_at = NOW()".to_string());

        let update_query = format!(
            "UPDATE campaigns c SET {} WHERE c.id = ${} AND c.status = ${} RETURNING {}",
            sets.join(", "),
            param_count + 1,
            param_count + 2,
            CAMPAIGN_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, CampaignEntity>(&update_query);
        if let Some(category_id) = patch.category_id {
            builder = builder.bind(category_id);
        }
        if let Some(ref title) = patch.title {
            builder = builder.bind(title);
        }
        if let Some(ref short_description) = patch.short_description {
            builder = builder.bind(short_description);
        }
        if let Some(ref description) = patch.description {
            builder = builder.bind(description);
        }
        if let Some(goal_amount) = patch.goal_amount {
            builder = builder.bind(goal_amount);
        }
        if let Some(end_date) = patch.end_date {
            builder = builder.bind(end_date);
        }
        if let Some(ref featured_image) = patch.featured_image {
            builder = builder.bind(featured_image);
        }
        if let Some(ref video_url) = patch.video_url {
            builder = builder.bind(video_url);
        }

        let entity = builder
            .bind(id)
            .bind(expected_status.as_str())
            .fetch_optional(&self.pool)
            .await;
        timer.record();

        entity?.map(CampaignEntity::into_domain).transpose()
    }

    /// Compare-and-swap status transition. Returns false when the campaign
    /// is missing or no longer in the expected status, so concurrent
    /// moderation decisions cannot double-apply.
    pub async fn set_status(
        &self,
        id: Uuid,
        from: CampaignStatus,
        to: CampaignStatus,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_campaign_status");
        let result = sqlx::query(
            "UPDATE campaigns SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
        )
        .bind(to.as_str())
        .bind(id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }

    /// Toggle the featured flag. Featuring takes an advisory lock so the
    /// cap check and the update are serialized across concurrent admins.
    pub async fn set_featured(
        &self,
        id: Uuid,
        featured: bool,
    ) -> Result<FeatureOutcome, sqlx::Error> {
        let timer = QueryTimer::new("set_campaign_featured");
        let mut tx = self.pool.begin().await?;

        if featured {
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext('campaigns.is_featured'))")
                .execute(&mut *tx)
                .await?;

            let featured_count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM campaigns WHERE is_featured = TRUE AND id <> $1",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if featured_count >= FEATURED_CAMPAIGN_CAP {
                tx.rollback().await?;
                timer.record();
                return Ok(FeatureOutcome::CapReached);
            }
        }

        let result = sqlx::query(
            "UPDATE campaigns SET is_featured = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(featured)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        if result.rows_affected() > 0 {
            Ok(FeatureOutcome::Updated)
        } else {
            Ok(FeatureOutcome::NotFound)
        }
    }

    /// Count campaigns per status, for the admin dashboard.
    pub async fn count_by_status(&self) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let timer = QueryTimer::new("count_campaigns_by_status");
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM campaigns GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        rows
    }
}
