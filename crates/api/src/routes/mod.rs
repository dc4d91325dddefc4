//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod campaigns;
pub mod categories;
pub mod comments;
pub mod contact;
pub mod donations;
pub mod favorites;
pub mod health;
pub mod updates;
pub mod users;

use serde::Serialize;
use shared::pagination::PageMeta;

/// Envelope for paginated listing responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(items: Vec<T>, pagination: PageMeta) -> Self {
        Self { items, pagination }
    }
}
