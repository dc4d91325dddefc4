//! Domain layer for the FundHub backend.
//!
//! This crate contains:
//! - Domain models (Campaign, User, Donation, Comment, Favorite)
//! - The single source of truth for status and role enumerations
//! - Campaign lifecycle rules

pub mod models;
pub mod services;
