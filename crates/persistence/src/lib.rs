//! Persistence layer for the FundHub backend.
//!
//! This crate contains:
//! - Database connection pool management
//! - Entity definitions (database row mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
