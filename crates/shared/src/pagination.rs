//! Offset-based pagination helpers.

use serde::{Deserialize, Serialize};

/// Default page size for listing endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Maximum page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Raw pagination query parameters as sent by clients.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Requested page size.
    pub limit: Option<u32>,
}

impl PageParams {
    /// Normalizes client-supplied parameters into a usable page request.
    ///
    /// Pages below 1 are clamped to 1; the limit is clamped to
    /// `1..=MAX_PAGE_SIZE` and defaults to `DEFAULT_PAGE_SIZE`.
    pub fn normalize(self) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Page { page, limit }
    }
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Row offset for the SQL `OFFSET` clause.
    pub fn offset(&self) -> i64 {
        ((self.page - 1) as i64) * (self.limit as i64)
    }

    /// Row count for the SQL `LIMIT` clause.
    pub fn limit(&self) -> i64 {
        self.limit as i64
    }

    /// Builds the response metadata for a result set of `total` rows.
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta::new(total, self.page, self.limit)
    }
}

/// Pagination summary returned alongside each page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl PageMeta {
    /// Computes metadata with `total_pages = ceil(total / limit)`.
    pub fn new(total: i64, page: u32, limit: u32) -> Self {
        let total = total.max(0);
        let limit = limit.max(1);
        let total_pages = (total + limit as i64 - 1) / limit as i64;
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}
