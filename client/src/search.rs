//! Search orchestration.
//!
//! [`SearchController`] owns the session state, turns user events into
//! requests, and decides which responses reach the displayed
//! [`SearchView`]. Every dispatched search takes a fresh sequence number;
//! when a newer search is dispatched the older task is aborted, and any
//! response that still arrives for it is discarded.

use crate::api::SearchApi;
use crate::error::{ClientError, Notification};
use shared::models::{LogRecord, SearchRequest, SearchResponse, DEFAULT_PAGE_SIZE};
use shared::session::{
    build_search_request, RequestSequence, SearchEvent, SequenceNumber, SessionState,
};
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};

/// Result of a search task: the sequence number it was dispatched with and
/// what the backend returned.
pub type SearchOutcome = (SequenceNumber, Result<SearchResponse, ClientError>);

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    /// Hits of the displayed page.
    pub hits: Vec<LogRecord>,
    /// Total matches across all pages.
    pub total: u64,
    /// Backend query time in milliseconds.
    pub took_ms: u64,
    /// Displayed page, 1-based.
    pub page: u32,
    /// Displayed page size.
    pub page_size: u32,
    /// A search is in flight.
    pub loading: bool,
    /// Message from the last search, if it failed.
    pub notification: Option<Notification>,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            took_ms: 0,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            loading: false,
            notification: None,
        }
    }
}

impl SearchView {
    /// Number of pages at the current page size.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// `true` if a later page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// `true` if an earlier page exists.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// First non-empty trace id on the page; analysis is only offered when
    /// there is one.
    #[must_use]
    pub fn analysis_target(&self) -> Option<&str> {
        first_trace_id(&self.hits)
    }

    fn show(&mut self, response: SearchResponse) {
        self.hits = response.hits;
        self.total = response.total;
        self.took_ms = response.took_ms;
        self.page = if response.page == 0 { 1 } else { response.page };
        self.page_size = if response.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            response.page_size
        };
        self.notification = None;
    }

    fn clear(&mut self, notification: Notification) {
        self.hits.clear();
        self.total = 0;
        self.took_ms = 0;
        self.notification = Some(notification);
    }
}

/// First record on `hits` that carries a non-empty trace id.
#[must_use]
pub fn first_trace_id(hits: &[LogRecord]) -> Option<&str> {
    hits.iter().find_map(LogRecord::trace_id)
}

/// A search that has been accepted and numbered but not yet answered.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    /// Sequence number the response must match.
    pub seq: SequenceNumber,
    /// Body to send.
    pub request: SearchRequest,
}

/// What [`SearchController::complete`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response was shown.
    Applied,
    /// The search failed; results were cleared and a notification set.
    Failed,
    /// A newer search had been dispatched; the response was dropped.
    Stale,
}

/// Drives searches for one session.
pub struct SearchController {
    api: Arc<dyn SearchApi>,
    state: SessionState,
    sequence: RequestSequence,
    in_flight: Option<AbortHandle>,
    view: SearchView,
}

impl SearchController {
    /// Creates a controller with a default session.
    #[must_use]
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self::with_state(api, SessionState::default())
    }

    /// Creates a controller starting from `state`.
    #[must_use]
    pub fn with_state(api: Arc<dyn SearchApi>, state: SessionState) -> Self {
        let view = SearchView {
            page: state.page(),
            page_size: state.page_size(),
            ..SearchView::default()
        };
        Self {
            api,
            state,
            sequence: RequestSequence::new(),
            in_flight: None,
            view,
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// What is currently displayed.
    #[must_use]
    pub fn view(&self) -> &SearchView {
        &self.view
    }

    /// Event for the page after the displayed one, if there is one.
    #[must_use]
    pub fn next_page(&self) -> Option<SearchEvent> {
        self.view.has_next_page().then(|| SearchEvent::PageChanged {
            page: self.view.page + 1,
            page_size: self.state.page_size(),
        })
    }

    /// Event for the page before the displayed one, if there is one.
    #[must_use]
    pub fn previous_page(&self) -> Option<SearchEvent> {
        self.view.has_previous_page().then(|| SearchEvent::PageChanged {
            page: self.view.page - 1,
            page_size: self.state.page_size(),
        })
    }

    /// Reduces `event` into the session and numbers the resulting request.
    ///
    /// Returns `None` when the request fails validation; the session is left
    /// unchanged and a notification is shown instead.
    pub fn begin(&mut self, event: SearchEvent) -> Option<PendingSearch> {
        let next = self.state.apply(event);
        let request = build_search_request(&next);

        if let Err(e) = request.validate_request() {
            let error = ClientError::from(e);
            tracing::warn!(error = %error, "Search rejected before dispatch");
            self.view.notification = Some(Notification::from_error("Search", &error));
            return None;
        }

        self.state = next;
        let seq = self.sequence.advance();
        self.view.loading = true;

        tracing::debug!(
            %seq,
            query = %request.query,
            time_range = ?request.time_range,
            page = request.page,
            page_size = request.page_size,
            "Dispatching search"
        );

        Some(PendingSearch { seq, request })
    }

    /// Applies the outcome of the search numbered `seq`, unless it has been
    /// superseded.
    pub fn complete(
        &mut self,
        seq: SequenceNumber,
        result: Result<SearchResponse, ClientError>,
    ) -> Completion {
        if !self.sequence.is_latest(seq) {
            tracing::debug!(%seq, latest = ?self.sequence.latest(), "Dropping stale search response");
            return Completion::Stale;
        }

        self.view.loading = false;
        self.in_flight = None;

        match result {
            Ok(response) => {
                tracing::debug!(
                    %seq,
                    total = response.total,
                    hits = response.hits.len(),
                    took_ms = response.took_ms,
                    "Search completed"
                );
                self.view.show(response);
                Completion::Applied
            }
            Err(e) => {
                tracing::warn!(%seq, error = %e, "Search failed");
                self.view.clear(Notification::from_error("Search", &e));
                Completion::Failed
            }
        }
    }

    /// Runs a search to completion on the current task. A spawned search
    /// still in flight is aborted.
    pub async fn search(&mut self, event: SearchEvent) -> Completion {
        let Some(pending) = self.begin(event) else {
            return Completion::Failed;
        };
        self.cancel_in_flight(pending.seq);
        let result = self.api.search(&pending.request).await;
        self.complete(pending.seq, result)
    }

    /// Dispatches a search on a spawned task and returns its handle.
    ///
    /// A search still in flight from an earlier call is aborted. Feed the
    /// handle's output back through [`SearchController::complete`].
    pub fn spawn(&mut self, event: SearchEvent) -> Option<JoinHandle<SearchOutcome>> {
        let pending = self.begin(event)?;
        self.cancel_in_flight(pending.seq);

        let api = Arc::clone(&self.api);
        let handle = tokio::spawn(async move {
            let result = api.search(&pending.request).await;
            (pending.seq, result)
        });
        self.in_flight = Some(handle.abort_handle());
        Some(handle)
    }

    fn cancel_in_flight(&mut self, seq: SequenceNumber) {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(%seq, "Cancelling superseded search");
            previous.abort();
        }
    }
}
