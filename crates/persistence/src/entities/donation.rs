//! Donation entity.

use chrono::{DateTime, Utc};
use domain::models::Donation;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::decode_enum;

/// Database row for the `donations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub message: Option<String>,
    pub anonymous: bool,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

impl DonationEntity {
    pub fn into_domain(self) -> Result<Donation, sqlx::Error> {
        Ok(Donation {
            id: self.id,
            campaign_id: self.campaign_id,
            user_id: self.user_id,
            amount: self.amount,
            message: self.message,
            anonymous: self.anonymous,
            payment_status: decode_enum(&self.payment_status)?,
            created_at: self.created_at,
        })
    }
}

/// Donation row joined with the donor's display name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationWithDonorEntity {
    #[sqlx(flatten)]
    pub donation: DonationEntity,
    pub donor_name: String,
}

/// Donation row joined with the campaign title, for donor history views.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationWithCampaignEntity {
    #[sqlx(flatten)]
    pub donation: DonationEntity,
    pub campaign_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::PaymentStatus;

    #[test]
    fn test_into_domain_parses_payment_status() {
        let entity = DonationEntity {
            id: Uuid::new_v4(),
            campaign_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: Decimal::from(25),
            message: Some("Good luck!".to_string()),
            anonymous: false,
            payment_status: "completed".to_string(),
            created_at: Utc::now(),
        };
        let donation = entity.into_domain().unwrap();
        assert_eq!(donation.payment_status, PaymentStatus::Completed);
    }
}
