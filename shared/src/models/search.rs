//! Search request and response models.
//!
//! `SearchRequest` is the body of `POST /search`; `SearchResponse` is what the
//! backend sends back.

use crate::models::log::{LogLevel, LogRecord};
use crate::query::normalize_query;
use crate::time::TimeRange;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Query sent when the user typed nothing.
pub const MATCH_ALL: &str = "*";

/// Page size used until the user picks another one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Field results are ordered by unless told otherwise.
pub const DEFAULT_SORT_FIELD: &str = "timestamp";

/// Structured filters combined with the free-text query.
///
/// Absent filters are omitted from the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Only records of this level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,

    /// Only records from this service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Only records from this environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
}

impl Filters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level filter.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the service filter. Blank names clear it.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = non_blank(service.into());
        self
    }

    /// Sets the environment filter. Blank names clear it.
    #[must_use]
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = non_blank(env.into());
        self
    }

    /// Returns `true` when no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.level.is_none() && self.service.is_none() && self.env.is_none()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Errors detected before a search request is dispatched.
#[derive(Debug, Error)]
pub enum SearchRequestError {
    /// The absolute time range ends before it starts.
    #[error("start_time must not be after end_time")]
    InvertedTimeRange,

    /// Paging parameters are out of range.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Body of `POST /search`.
///
/// The time range is flattened into the body, so a relative request carries
/// `time_range_type` and `relative_time_key` while an absolute one carries
/// `time_range_type`, `start_time` and `end_time`.
///
/// # Example
///
/// ```
/// use shared::models::SearchRequest;
/// use shared::time::{RelativeKey, TimeRange};
///
/// let request = SearchRequest::new(TimeRange::relative(RelativeKey::OneHour))
///     .with_query("error or warn");
///
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["query"], "error OR warn");
/// assert_eq!(json["time_range_type"], "relative");
/// assert_eq!(json["relative_time_key"], "1h");
/// assert!(json.get("start_time").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    /// Normalized Lucene-style query.
    pub query: String,

    /// Structured filters.
    #[serde(default)]
    pub filters: Filters,

    /// Relative key or absolute bounds.
    #[serde(flatten)]
    pub time_range: TimeRange,

    /// 1-based page number.
    #[validate(range(min = 1, message = "page must be >= 1"))]
    pub page: u32,

    /// Number of hits per page.
    #[validate(range(min = 1, max = 1000, message = "page_size must be between 1 and 1000"))]
    pub page_size: u32,

    /// Field to sort by.
    pub sort_by: String,

    /// Sort descending when `true`.
    pub sort_desc: bool,
}

impl SearchRequest {
    /// Creates a match-all request for the first page, newest first.
    #[must_use]
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            query: MATCH_ALL.to_string(),
            filters: Filters::default(),
            time_range,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            sort_desc: true,
        }
    }

    /// Sets the query text, normalizing boolean operators on the way in.
    #[must_use]
    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = normalize_query(raw);
        self
    }

    /// Sets the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Sets page and page size.
    #[must_use]
    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_desc: bool) -> Self {
        self.sort_by = sort_by.into();
        self.sort_desc = sort_desc;
        self
    }

    /// Checks the request the same way the backend will.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `page` is zero
    /// - `page_size` is zero or above [`MAX_PAGE_SIZE`]
    /// - the absolute time range is inverted
    pub fn validate_request(&self) -> Result<(), SearchRequestError> {
        self.validate()?;
        if !self.time_range.is_ordered() {
            return Err(SearchRequestError::InvertedTimeRange);
        }
        Ok(())
    }
}

/// Body returned by `POST /search`.
///
/// Missing numeric fields decode as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hits on the requested page, in backend order.
    #[serde(default)]
    pub hits: Vec<LogRecord>,

    /// Total number of matching records across all pages.
    #[serde(default)]
    pub total: u64,

    /// Time the backend spent executing the query.
    #[serde(default)]
    pub took_ms: u64,

    /// Page the hits belong to.
    #[serde(default)]
    pub page: u32,

    /// Page size the backend applied.
    #[serde(default)]
    pub page_size: u32,
}

impl SearchResponse {
    /// Number of pages needed to show `total` hits at the response's page size.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}
