//! Donation repository for database operations.
//!
//! Recording a donation and updating the campaign's running totals happen
//! in one transaction, so `current_amount` and `backers_count` can never
//! drift from the donation rows.

use domain::models::{CampaignStatus, Donation, PaymentStatus};
use rust_decimal::Decimal;
use shared::pagination::Page;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    decode_enum, DonationEntity, DonationWithCampaignEntity, DonationWithDonorEntity,
};
use crate::metrics::QueryTimer;

const DONATION_COLUMNS: &str =
    "d.id, d.campaign_id, d.user_id, d.amount, d.message, d.anonymous, \
     d.payment_status, d.created_at";

/// Input for recording a donation.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub message: Option<String>,
    pub anonymous: bool,
}

/// Donation joined with the donor's display name.
#[derive(Debug, Clone)]
pub struct DonationWithDonor {
    pub donation: Donation,
    pub donor_name: String,
}

/// Donation joined with the campaign title.
#[derive(Debug, Clone)]
pub struct DonationWithCampaign {
    pub donation: Donation,
    pub campaign_title: String,
}

/// Result of attempting to record a donation.
#[derive(Debug, Clone)]
pub enum DonationOutcome {
    Recorded(Donation),
    CampaignNotFound,
    /// The campaign exists but is not in a status that accepts donations.
    NotAccepting(CampaignStatus),
}

/// Repository for donation database operations.
#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a donation against an active campaign.
    ///
    /// The campaign row is locked for the duration of the transaction; the
    /// status check, the donation insert, and the totals update either all
    /// commit or all roll back.
    pub async fn record(&self, input: NewDonation) -> Result<DonationOutcome, sqlx::Error> {
        let timer = QueryTimer::new("record_donation");
        let mut tx = self.pool.begin().await?;

        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM campaigns WHERE id = $1 FOR UPDATE")
                .bind(input.campaign_id)
                .fetch_optional(&mut *tx)
                .await?;

        let status = match status {
            Some(raw) => decode_enum::<CampaignStatus>(&raw)?,
            None => {
                tx.rollback().await?;
                timer.record();
                return Ok(DonationOutcome::CampaignNotFound);
            }
        };

        if !status.accepts_donations() {
            tx.rollback().await?;
            timer.record();
            return Ok(DonationOutcome::NotAccepting(status));
        }

        let entity = sqlx::query_as::<_, DonationEntity>(&format!(
            r#"
            INSERT INTO donations AS d (campaign_id, user_id, amount, message, anonymous, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            DONATION_COLUMNS
        ))
        .bind(input.campaign_id)
        .bind(input.user_id)
        .bind(input.amount)
        .bind(&input.message)
        .bind(input.anonymous)
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE campaigns
            SET current_amount = current_amount + $1,
                backers_count = backers_count + 1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(input.amount)
        .bind(input.campaign_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(DonationOutcome::Recorded(entity.into_domain()?))
    }

    /// List donations for a campaign, newest first, with donor names.
    /// Anonymity is applied by the caller when shaping the response.
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
        page: &Page,
    ) -> Result<(Vec<DonationWithDonor>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_donations_by_campaign");

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE campaign_id = $1")
                .bind(campaign_id)
                .fetch_one(&self.pool)
                .await?;

        let entities = sqlx::query_as::<_, DonationWithDonorEntity>(&format!(
            r#"
            SELECT {}, u.display_name AS donor_name
            FROM donations d
            JOIN users u ON u.id = d.user_id
            WHERE d.campaign_id = $1
            ORDER BY d.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            DONATION_COLUMNS
        ))
        .bind(campaign_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        let donations = entities
            .into_iter()
            .map(|e| {
                Ok(DonationWithDonor {
                    donation: e.donation.into_domain()?,
                    donor_name: e.donor_name,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok((donations, total))
    }

    /// List a user's own donations, newest first, with campaign titles.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<DonationWithCampaign>, sqlx::Error> {
        let timer = QueryTimer::new("list_donations_by_user");
        let entities = sqlx::query_as::<_, DonationWithCampaignEntity>(&format!(
            r#"
            SELECT {}, c.title AS campaign_title
            FROM donations d
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE d.user_id = $1
            ORDER BY d.created_at DESC
            "#,
            DONATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        entities
            .into_iter()
            .map(|e| {
                Ok(DonationWithCampaign {
                    donation: e.donation.into_domain()?,
                    campaign_title: e.campaign_title,
                })
            })
            .collect()
    }

    /// Donation count and completed total across the platform, for the
    /// admin dashboard.
    pub async fn totals(&self) -> Result<(i64, Decimal), sqlx::Error> {
        let timer = QueryTimer::new("donation_totals");
        let row: Result<(i64, Decimal), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount), 0)
            FROM donations
            WHERE payment_status = $1
            "#,
        )
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        row
    }
}
