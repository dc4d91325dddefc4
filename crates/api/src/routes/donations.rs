//! Donation endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use persistence::repositories::{
    CampaignRepository, DonationOutcome, DonationRepository, DonationWithDonor, NewDonation,
};
use shared::pagination::PageParams;
use shared::validation::validate_donation_amount;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_donation_recorded;
use crate::routes::PagedResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    #[validate(custom(function = "validate_donation_amount"))]
    pub amount: Decimal,

    #[validate(length(max = 500, message = "Message is too long"))]
    pub message: Option<String>,

    #[serde(default)]
    pub anonymous: bool,
}

/// Public view of a donation on a campaign page. The donor's name is
/// masked when the donation was made anonymously.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: Uuid,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub anonymous: bool,
    pub donor_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<DonationWithDonor> for DonationResponse {
    fn from(row: DonationWithDonor) -> Self {
        let donor_name = if row.donation.anonymous {
            "Anonymous".to_string()
        } else {
            row.donor_name
        };
        Self {
            id: row.donation.id,
            amount: row.donation.amount,
            message: row.donation.message,
            anonymous: row.donation.anonymous,
            donor_name,
            created_at: row.donation.created_at,
        }
    }
}

/// GET /api/v1/campaigns/:id/donations
pub async fn list_campaign_donations(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    if campaigns.find_by_id(campaign_id).await?.is_none() {
        return Err(ApiError::NotFound("Campaign not found".into()));
    }

    let page = params.normalize();
    let donations = DonationRepository::new(state.pool.clone());
    let (rows, total) = donations.list_by_campaign(campaign_id, &page).await?;

    let items: Vec<DonationResponse> = rows.into_iter().map(DonationResponse::from).collect();

    Ok(Json(PagedResponse::new(items, page.meta(total))))
}

/// POST /api/v1/campaigns/:id/donations
pub async fn create_donation(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(req): Json<CreateDonationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let donations = DonationRepository::new(state.pool.clone());
    let outcome = donations
        .record(NewDonation {
            campaign_id,
            user_id: auth.user_id,
            amount: req.amount,
            message: req.message,
            anonymous: req.anonymous,
        })
        .await?;

    match outcome {
        DonationOutcome::Recorded(donation) => {
            record_donation_recorded();
            tracing::info!(
                donation_id = %donation.id,
                campaign_id = %campaign_id,
                "Donation recorded"
            );
            Ok((StatusCode::CREATED, Json(donation)))
        }
        DonationOutcome::CampaignNotFound => {
            Err(ApiError::NotFound("Campaign not found".into()))
        }
        DonationOutcome::NotAccepting(status) => Err(ApiError::Conflict(format!(
            "Campaign in status {} does not accept donations",
            status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{Donation, PaymentStatus};

    fn donation(anonymous: bool) -> DonationWithDonor {
        DonationWithDonor {
            donation: Donation {
                id: Uuid::new_v4(),
                campaign_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                amount: Decimal::from(50),
                message: Some("Good luck!".to_string()),
                anonymous,
                payment_status: PaymentStatus::Completed,
                created_at: Utc::now(),
            },
            donor_name: "Ada Lovelace".to_string(),
        }
    }

    #[test]
    fn test_anonymous_donation_masks_donor_name() {
        let response = DonationResponse::from(donation(true));
        assert_eq!(response.donor_name, "Anonymous");
        assert!(response.anonymous);
    }

    #[test]
    fn test_named_donation_keeps_donor_name() {
        let response = DonationResponse::from(donation(false));
        assert_eq!(response.donor_name, "Ada Lovelace");
    }

    #[test]
    fn test_donation_response_hides_donor_id() {
        let json = serde_json::to_string(&DonationResponse::from(donation(true))).unwrap();
        assert!(!json.contains("userId"));
    }

    #[test]
    fn test_create_request_rejects_zero_amount() {
        let req = CreateDonationRequest {
            amount: Decimal::ZERO,
            message: None,
            anonymous: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_accepts_valid_amount() {
        let req = CreateDonationRequest {
            amount: Decimal::from(25),
            message: Some("Keep going".to_string()),
            anonymous: true,
        };
        assert!(req.validate().is_ok());
    }
}
