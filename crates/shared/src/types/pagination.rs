//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default page size when the caller does not supply `limit`.
pub const DEFAULT_LIMIT: u64 = 20;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Largest row offset a page may start at; stores use signed 64-bit offsets.
pub const MAX_OFFSET: u64 = u64::MAX >> 1;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a page request from raw query-string values.
    ///
    /// Absent values fall back to the defaults. Present values must be
    /// positive integers, `limit` may not exceed [`MAX_LIMIT`] and the page
    /// may not start past [`MAX_OFFSET`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for non-numeric, zero or oversized values.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> AppResult<Self> {
        let defaults = Self::default();
        let page = parse_positive("page", page)?.unwrap_or(defaults.page);
        let limit = parse_positive("limit", limit)?.unwrap_or(defaults.limit);

        if limit > MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must not exceed {MAX_LIMIT}"
            )));
        }

        let within_range = (page - 1)
            .checked_mul(limit)
            .is_some_and(|offset| offset <= MAX_OFFSET);
        if !within_range {
            return Err(AppError::Validation("page is out of range".to_string()));
        }

        Ok(Self { page, limit })
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Index one past the last item of this page.
    #[must_use]
    pub fn end_index(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }
}

fn parse_positive(name: &str, raw: Option<&str>) -> AppResult<Option<u64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(AppError::Validation(format!(
            "{name} must be a positive integer"
        ))),
    }
}

/// Points at a neighbouring page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

/// One page of results with navigation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in the current page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Next page, present only if items exist past this page.
    pub next: Option<PageCursor>,
    /// Previous page, present whenever this is not the first page.
    pub previous: Option<PageCursor>,
}

impl<T> Page<T> {
    /// Creates a page from the slice fetched for `request` and the total count.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(request.limit);

        let next = (request.end_index() < total).then(|| PageCursor {
            page: request.page + 1,
            limit: request.limit,
        });
        let previous = (request.page > 1).then(|| PageCursor {
            page: request.page - 1,
            limit: request.limit,
        });

        Self {
            items,
            total,
            total_pages,
            next,
            previous,
        }
    }

    /// Maps the items, keeping the navigation metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
            next: self.next,
            previous: self.previous,
        }
    }
}
