use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Largest offset a SQL backend accepts as a signed 64-bit integer.
pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// Raw query string of the list endpoint: `?page=&limit=&q=`.
///
/// `page` and `limit` are kept as text and parsed leniently: anything that is
/// not an integer falls back to the default instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Full-text search term.
    pub q: Option<String>,
}

impl ListQuery {
    /// The search term, if one was supplied and is not blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Effective page window: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Clamp requested values into the allowed window.
    #[must_use]
    pub fn clamped(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1).unsigned_abs(),
            limit: limit.clamp(1, MAX_LIMIT).unsigned_abs(),
        }
    }

    #[must_use]
    pub fn from_query(query: &ListQuery) -> Self {
        let page = parse_or(query.page.as_deref(), DEFAULT_PAGE);
        let limit = parse_or(query.limit.as_deref(), DEFAULT_LIMIT);
        Self::clamped(page, limit)
    }

    /// Rows skipped before this page, `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_OFFSET)
    }

    #[must_use]
    pub fn meta(&self, total: u64) -> PaginationMeta {
        PaginationMeta {
            page: self.page,
            limit: self.limit,
            total,
            pages: total_pages(total, self.limit),
        }
    }
}

/// Integers outside the `i64` range saturate; anything else that is not an
/// integer yields `default`.
fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    let Some(value) = raw else {
        return default;
    };
    match value.trim().parse::<i64>() {
        Ok(parsed) => parsed,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => default,
        },
    }
}

/// `ceil(total / limit)`. `limit` is at least 1 after clamping.
#[must_use]
pub fn total_pages(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}
