//! Campaign domain model and lifecycle status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of simultaneously featured campaigns, enforced at the
/// data layer when the featured flag is set.
pub const FEATURED_CAMPAIGN_CAP: i64 = 3;

/// Campaign lifecycle status.
///
/// This enum is the single source of truth for status values; the database
/// stores the `as_str` form and every layer parses back through `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Being edited by its owner; not visible publicly.
    Draft,
    /// Submitted for moderation, awaiting an admin decision.
    PendingReview,
    /// Approved and accepting donations.
    Active,
    /// Rejected by moderation.
    Rejected,
    /// Reached its goal by the deadline.
    Successful,
    /// Missed its goal by the deadline.
    Failed,
    /// Withdrawn by its owner.
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::PendingReview => "pending_review",
            CampaignStatus::Active => "active",
            CampaignStatus::Rejected => "rejected",
            CampaignStatus::Successful => "successful",
            CampaignStatus::Failed => "failed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// The full lifecycle:
    /// draft -> pending_review -> active -> successful | failed
    /// pending_review -> rejected
    /// draft | pending_review | active -> cancelled
    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, next),
            (Draft, PendingReview)
                | (PendingReview, Active)
                | (PendingReview, Rejected)
                | (Active, Successful)
                | (Active, Failed)
                | (Draft, Cancelled)
                | (PendingReview, Cancelled)
                | (Active, Cancelled)
        )
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CampaignStatus::Rejected
                | CampaignStatus::Successful
                | CampaignStatus::Failed
                | CampaignStatus::Cancelled
        )
    }

    /// Whether the campaign may accept donations in this state.
    pub fn accepts_donations(&self) -> bool {
        matches!(self, CampaignStatus::Active)
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "pending_review" => Ok(CampaignStatus::PendingReview),
            "active" => Ok(CampaignStatus::Active),
            "rejected" => Ok(CampaignStatus::Rejected),
            "successful" => Ok(CampaignStatus::Successful),
            "failed" => Ok(CampaignStatus::Failed),
            "cancelled" => Ok(CampaignStatus::Cancelled),
            _ => Err(format!("Invalid campaign status: {}", s)),
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fundraising campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub goal_amount: Decimal,
    pub current_amount: Decimal,
    pub backers_count: i32,
    pub end_date: DateTime<Utc>,
    pub featured_image: Option<String>,
    pub video_url: Option<String>,
    pub status: CampaignStatus,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Whether the campaign's deadline has passed.
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_date
    }

    /// Whether the campaign has reached its funding goal.
    pub fn goal_reached(&self) -> bool {
        self.current_amount >= self.goal_amount
    }
}

/// Filter inputs for the campaign listing endpoint.
///
/// Both the count query and the page query are derived from this one
/// struct so the two can never disagree about the filter predicate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsQuery {
    /// Case-insensitive substring match against title, description and
    /// short description.
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    /// Defaults to `active` when absent.
    pub status: Option<CampaignStatus>,
    pub is_featured: Option<bool>,
}

impl ListCampaignsQuery {
    /// The status filter actually applied; public listings default to
    /// showing active campaigns.
    pub fn effective_status(&self) -> CampaignStatus {
        self.status.unwrap_or(CampaignStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            CampaignStatus::Draft,
            CampaignStatus::PendingReview,
            CampaignStatus::Active,
            CampaignStatus::Rejected,
            CampaignStatus::Successful,
            CampaignStatus::Failed,
            CampaignStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<CampaignStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!("approved".parse::<CampaignStatus>().is_err());
        assert!("pending".parse::<CampaignStatus>().is_err());
        assert!("ACTIVE".parse::<CampaignStatus>().is_err());
        assert!("".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&CampaignStatus::PendingReview).unwrap();
        assert_eq!(json, "\"pending_review\"");
        let parsed: CampaignStatus = serde_json::from_str("\"successful\"").unwrap();
        assert_eq!(parsed, CampaignStatus::Successful);
    }

    #[test]
    fn test_happy_path_transitions() {
        use CampaignStatus::*;
        assert!(Draft.can_transition_to(PendingReview));
        assert!(PendingReview.can_transition_to(Active));
        assert!(Active.can_transition_to(Successful));
        assert!(Active.can_transition_to(Failed));
        assert!(PendingReview.can_transition_to(Rejected));
    }

    #[test]
    fn test_cancellation_transitions() {
        use CampaignStatus::*;
        assert!(Draft.can_transition_to(Cancelled));
        assert!(PendingReview.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Cancelled));
        assert!(!Successful.can_transition_to(Cancelled));
        assert!(!Rejected.can_transition_to(Cancelled));
    }

    #[test]
    fn test_illegal_transitions() {
        use CampaignStatus::*;
        assert!(!Draft.can_transition_to(Active));
        assert!(!Active.can_transition_to(Draft));
        assert!(!Rejected.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(PendingReview));
        assert!(!Successful.can_transition_to(Failed));
    }

    #[test]
    fn test_terminal_states() {
        use CampaignStatus::*;
        for s in [Rejected, Successful, Failed, Cancelled] {
            assert!(s.is_terminal());
        }
        for s in [Draft, PendingReview, Active] {
            assert!(!s.is_terminal());
        }
    }

    #[test]
    fn test_only_active_accepts_donations() {
        use CampaignStatus::*;
        assert!(Active.accepts_donations());
        for s in [Draft, PendingReview, Rejected, Successful, Failed, Cancelled] {
            assert!(!s.accepts_donations());
        }
    }

    #[test]
    fn test_effective_status_defaults_to_active() {
        let query = ListCampaignsQuery::default();
        assert_eq!(query.effective_status(), CampaignStatus::Active);

        let query = ListCampaignsQuery {
            status: Some(CampaignStatus::Draft),
            ..Default::default()
        };
        assert_eq!(query.effective_status(), CampaignStatus::Draft);
    }

    #[test]
    fn test_goal_reached() {
        let mut campaign = sample_campaign();
        campaign.goal_amount = Decimal::from(100);
        campaign.current_amount = Decimal::from(99);
        assert!(!campaign.goal_reached());

        campaign.current_amount = Decimal::from(100);
        assert!(campaign.goal_reached());
    }

    fn sample_campaign() -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: "Clean water for Kivu".to_string(),
            short_description: "Wells for three villages".to_string(),
            description: "Longer body".to_string(),
            goal_amount: Decimal::from(5000),
            current_amount: Decimal::ZERO,
            backers_count: 0,
            end_date: Utc::now() + chrono::Duration::days(30),
            featured_image: None,
            video_url: None,
            status: CampaignStatus::Active,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
