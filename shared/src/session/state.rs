//! Session state and its reducers.

use crate::models::{
    Filters, SearchRequest, DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD, MATCH_ALL, MAX_PAGE_SIZE,
};
use crate::query::normalize_query;
use crate::time::TimeRange;

/// A user action that changes what is being searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The search bar was submitted. `query` is the raw text as typed.
    Submit {
        /// Raw query text.
        query: String,
        /// Time range selected in the picker.
        time_range: TimeRange,
    },
    /// One or more filters changed; carries the complete new filter set.
    FiltersChanged(Filters),
    /// All filters were cleared.
    FiltersReset,
    /// The user moved to another page or changed the page size.
    PageChanged {
        /// Requested page, 1-based.
        page: u32,
        /// Requested page size.
        page_size: u32,
    },
}

/// Everything needed to build the next search request.
///
/// Values are never mutated in place; [`SessionState::apply`] returns a new
/// state. Invariants: `query` is already normalized, `page >= 1` and
/// `1 <= page_size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    query: String,
    filters: Filters,
    time_range: TimeRange,
    page: u32,
    page_size: u32,
    sort_by: String,
    sort_desc: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            query: MATCH_ALL.to_string(),
            filters: Filters::default(),
            time_range: TimeRange::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            sort_desc: true,
        }
    }
}

impl SessionState {
    /// Starts a session on `time_range` with everything else at defaults.
    #[must_use]
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            time_range,
            ..Self::default()
        }
    }

    /// Returns the state with a different sort order. Resets to page 1.
    #[must_use]
    pub fn with_sort(&self, sort_by: impl Into<String>, sort_desc: bool) -> Self {
        Self {
            sort_by: sort_by.into(),
            sort_desc,
            page: 1,
            ..self.clone()
        }
    }

    /// Returns the state with a different page size, keeping the page.
    #[must_use]
    pub fn with_page_size(&self, page_size: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            ..self.clone()
        }
    }

    /// Reduces `event` into the next state.
    ///
    /// Query, filter and time-range changes go back to page 1; pagination
    /// keeps everything else as it was.
    #[must_use]
    pub fn apply(&self, event: SearchEvent) -> Self {
        match event {
            SearchEvent::Submit { query, time_range } => Self {
                query: normalize_query(&query),
                time_range,
                page: 1,
                ..self.clone()
            },
            SearchEvent::FiltersChanged(filters) => Self {
                filters,
                page: 1,
                ..self.clone()
            },
            SearchEvent::FiltersReset => Self {
                filters: Filters::default(),
                page: 1,
                ..self.clone()
            },
            SearchEvent::PageChanged { page, page_size } => Self {
                page: page.max(1),
                page_size: page_size.clamp(1, MAX_PAGE_SIZE),
                ..self.clone()
            },
        }
    }

    /// Normalized query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Active filters.
    #[must_use]
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Selected time range.
    #[must_use]
    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    /// Current page, 1-based.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// Builds the request body for `state`.
#[must_use]
pub fn build_search_request(state: &SessionState) -> SearchRequest {
    SearchRequest {
        query: state.query.clone(),
        filters: state.filters.clone(),
        time_range: state.time_range,
        page: state.page,
        page_size: state.page_size,
        sort_by: state.sort_by.clone(),
        sort_desc: state.sort_desc,
    }
}
