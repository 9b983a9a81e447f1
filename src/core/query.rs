//! List query parameters: pagination and date range
//!
//! Both halves are deliberately lenient. Values that do not parse are
//! replaced by their defaults (pagination) or dropped (dates) instead of
//! failing the request.
//!
//! # Example
//! ```text
//! GET /sermons                              -> every document, newest first
//! GET /sermons?page=2&limit=5               -> {items, total, page, pages, limit}
//! GET /devotions?from=2024-03-04&to=2024-03-10
//! GET /gallery?page=abc&limit=-1            -> same as page=1&limit=12
//! ```

use crate::core::dates::{end_of_day, parse_calendar_date, start_of_day};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page number when pagination is active
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size when pagination is active
pub const DEFAULT_LIMIT: u64 = 12;

/// Raw list query, exactly as received.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl ListParams {
    /// Build params from raw query pairs, keeping the first value of a repeated key.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut params.from,
                "to" => &mut params.to,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Pagination settings, or `None` for the unpaginated mode.
    ///
    /// Pagination is active as soon as `page` or `limit` is present and non-empty.
    pub fn pagination(&self) -> Option<Pagination> {
        let page = non_empty(self.page.as_deref());
        let limit = non_empty(self.limit.as_deref());
        if page.is_none() && limit.is_none() {
            return None;
        }

        Some(Pagination {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        })
    }

    /// The date range described by `from`/`to`; malformed bounds are ignored.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            from: non_empty(self.from.as_deref())
                .and_then(parse_calendar_date)
                .map(start_of_day),
            to: non_empty(self.to.as_deref())
                .and_then(parse_calendar_date)
                .map(end_of_day),
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

/// Parse the leading integer of a string and keep it only if positive.
///
/// Mirrors lenient integer parsing: leading whitespace and a sign are
/// accepted, parsing stops at the first non-digit (`"3abc"` is 3), and
/// values too large for `u64` saturate.
pub fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let s = raw?.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return None;
    }

    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    (value > 0).then_some(value)
}

/// Resolved pagination settings; both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Number of documents before this page
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Page count for `total` documents, never less than 1
    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit).max(1)
    }
}

/// Inclusive range on a document's semantic date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// True when neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether a document with this semantic date is inside the range.
    ///
    /// Undated documents only match an unbounded range.
    pub fn contains(&self, date: Option<DateTime<Utc>>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// What a backend is asked to return, always newest-created first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub range: DateRange,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindQuery {
    pub fn all(range: DateRange) -> Self {
        Self {
            range,
            skip: 0,
            limit: None,
        }
    }

    pub fn page(range: DateRange, pagination: Pagination) -> Self {
        Self {
            range,
            skip: pagination.skip(),
            limit: Some(pagination.limit),
        }
    }
}

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            pages: pagination.pages(total),
            limit: pagination.limit,
        }
    }

    /// Treat a plain list as page 1 of 1.
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            total,
            page: 1,
            pages: 1,
            limit: total.max(1),
        }
    }
}

/// Body of a list response: a bare array or a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    All(Vec<T>),
    Paged(Page<T>),
}

impl<T> ListResponse<T> {
    /// Normalize either shape into a page.
    pub fn into_page(self) -> Page<T> {
        match self {
            ListResponse::All(items) => Page::single(items),
            ListResponse::Paged(page) => page,
        }
    }

    /// The documents in this response.
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::All(items) => items,
            ListResponse::Paged(page) => page.items,
        }
    }
}
