//! Logscope Shared Library
//!
//! This crate contains the data contract spoken with the log search backend
//! together with the pure logic that shapes requests before they are sent.
//! Nothing in here performs IO.
//!
//! # Modules
//!
//! - [`models`] - Log records, search requests/responses and auxiliary payloads
//! - [`query`] - Free-text query normalization
//! - [`time`] - Relative presets, absolute shortcuts and custom time ranges
//! - [`session`] - Immutable session state, reducers and request sequencing
//!
//! # Example
//!
//! ```
//! use shared::session::{build_search_request, SearchEvent, SessionState};
//! use shared::time::{RelativeKey, TimeRange};
//!
//! let state = SessionState::default().apply(SearchEvent::Submit {
//!     query: "login and abc123".to_string(),
//!     time_range: TimeRange::relative(RelativeKey::FifteenMinutes),
//! });
//!
//! let request = build_search_request(&state);
//! assert_eq!(request.query, "login AND abc123");
//! assert_eq!(request.page, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod query;
pub mod session;
pub mod time;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
