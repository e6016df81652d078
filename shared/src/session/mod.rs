//! Search session state.
//!
//! The session is an immutable value: every user action is a [`SearchEvent`]
//! reduced into a new [`SessionState`], and the request sent to the backend is
//! derived from that state by [`build_search_request`]. Dispatched requests
//! are numbered by a [`RequestSequence`] so that only the newest response is
//! ever shown.
//!
//! # Example
//!
//! ```
//! use shared::models::Filters;
//! use shared::session::{build_search_request, SearchEvent, SessionState};
//!
//! let state = SessionState::default()
//!     .apply(SearchEvent::PageChanged { page: 4, page_size: 20 })
//!     .apply(SearchEvent::FiltersChanged(Filters::new().with_env("prod")));
//!
//! // Changing filters goes back to the first page.
//! assert_eq!(build_search_request(&state).page, 1);
//! ```

mod sequence;
mod state;

pub use sequence::{RequestSequence, SequenceNumber};
pub use state::{build_search_request, SearchEvent, SessionState};
