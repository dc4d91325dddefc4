//! Campaign lifecycle rules.
//!
//! All status changes funnel through this module so the transition table
//! lives in exactly one place. Route handlers translate user intent into a
//! [`CampaignAction`] and let [`apply_action`] decide whether the move is
//! legal for the campaign's current status.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Campaign, CampaignStatus};

/// User- or admin-initiated lifecycle actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignAction {
    /// Owner submits a draft for moderation.
    Submit,
    /// Admin approves a pending campaign.
    Approve,
    /// Admin rejects a pending campaign.
    Reject,
    /// Owner withdraws the campaign.
    Cancel,
}

impl CampaignAction {
    /// The status this action attempts to move the campaign into.
    pub fn target_status(&self) -> CampaignStatus {
        match self {
            CampaignAction::Submit => CampaignStatus::PendingReview,
            CampaignAction::Approve => CampaignStatus::Active,
            CampaignAction::Reject => CampaignStatus::Rejected,
            CampaignAction::Cancel => CampaignStatus::Cancelled,
        }
    }
}

/// Error type for lifecycle violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Cannot move campaign from {from} to {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },
}

/// Validates an action against the current status and returns the new status.
pub fn apply_action(
    current: CampaignStatus,
    action: CampaignAction,
) -> Result<CampaignStatus, LifecycleError> {
    let target = action.target_status();
    if current.can_transition_to(target) {
        Ok(target)
    } else {
        Err(LifecycleError::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

/// Deadline resolution for an active campaign.
///
/// Returns the terminal status the campaign should move into once its
/// deadline has passed, or `None` if it is not yet due (or not active).
pub fn resolve_deadline(campaign: &Campaign, now: DateTime<Utc>) -> Option<CampaignStatus> {
    if campaign.status != CampaignStatus::Active || !campaign.is_past_deadline(now) {
        return None;
    }

    if campaign.goal_reached() {
        Some(CampaignStatus::Successful)
    } else {
        Some(CampaignStatus::Failed)
    }
}
