//! Page-number pagination types for list endpoints.
//!
//! Listing collections are paginated with `?page=&limit=` query parameters
//! and respond with a `meta` block describing the full result set.
//!
//! # Usage
//!
//! ```rust,ignore
//! // In a route handler
//! let page = query.page_request().normalize();
//!
//! // In a model
//! let items = Listing::find_page(&filters, &page, pool).await?;
//! let total = Listing::count(&filters, pool).await?;
//!
//! // Build the response meta
//! let meta = PageMeta::new(total, &page);
//! ```

use serde::{Deserialize, Serialize};

/// Default page size when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 9;

/// Upper bound on client-requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 48;

// ============================================================================
// Page request
// ============================================================================

/// Raw pagination parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRequest {
    /// Requested page, 1-based.
    pub page: Option<i64>,
    /// Requested page size.
    pub limit: Option<i64>,
}

impl PageRequest {
    /// Apply defaults and bounds: page >= 1 (default 1), limit clamped to
    /// 1..=MAX_PAGE_SIZE (default DEFAULT_PAGE_SIZE).
    pub fn normalize(&self) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Page { page, limit }
    }
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// Current page, 1-based.
    pub page: i64,
    /// Page size, 1..=MAX_PAGE_SIZE.
    pub limit: i64,
}

impl Page {
    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

// ============================================================================
// Page metadata
// ============================================================================

/// Result-set metadata returned alongside a page of items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total items matching the query across all pages.
    pub total_items: i64,
    /// Total pages (ceiling of total_items / limit, minimum 1).
    pub total_pages: i64,
    /// The page these items came from.
    pub current_page: i64,
    /// Whether a following page exists.
    pub has_next_page: bool,
    /// Whether a preceding page exists.
    pub has_prev_page: bool,
}

impl PageMeta {
    /// Build metadata for `total_items` results viewed through `page`.
    pub fn new(total_items: i64, page: &Page) -> Self {
        let total_pages = (total_items + page.limit - 1) / page.limit;
        let total_pages = total_pages.max(1);

        PageMeta {
            total_items,
            total_pages,
            current_page: page.page,
            has_next_page: page.page < total_pages,
            has_prev_page: page.page > 1,
        }
    }
}
