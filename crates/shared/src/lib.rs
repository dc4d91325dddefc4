//! Shared utilities and common types for the FundHub backend.
//!
//! This crate provides functionality used across all other crates:
//! - JWT token generation and validation
//! - Password hashing with Argon2id
//! - Offset-based pagination helpers
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
