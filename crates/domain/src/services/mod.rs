//! Business logic services.

pub mod lifecycle;

pub use lifecycle::{apply_action, resolve_deadline, CampaignAction, LifecycleError};
