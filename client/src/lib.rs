//! Logscope Client
//!
//! This crate talks to the log search backend over HTTP/JSON and orchestrates
//! searches on behalf of a front end.
//!
//! # Architecture
//!
//! - [`SearchApi`] / [`HttpSearchApi`] - the backend endpoints (`/search`,
//!   `/fields`, `/services`, `/ai/analyze`, and `/health` on the origin)
//! - [`SearchController`] - session state, request sequencing and the
//!   displayed result set
//! - [`AnalysisController`] - AI analysis of a trace, independent of search
//! - [`ClientConfig`] - environment-driven configuration
//!
//! # Example
//!
//! ```no_run
//! use client::{ClientConfig, HttpSearchApi, SearchController};
//! use shared::session::SearchEvent;
//! use shared::time::{RelativeKey, TimeRange};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = HttpSearchApi::new(ClientConfig::from_env()?)?;
//!     let mut controller = SearchController::new(Arc::new(api));
//!
//!     controller
//!         .search(SearchEvent::Submit {
//!             query: "login and abc123".to_string(),
//!             time_range: TimeRange::relative(RelativeKey::FifteenMinutes),
//!         })
//!         .await;
//!
//!     println!("{} hits in {}ms", controller.view().total, controller.view().took_ms);
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod analysis;
mod api;
mod config;
mod error;
mod search;

pub use analysis::{AnalysisController, AnalysisView, NO_ERROR_LOGS};
pub use api::{HttpSearchApi, SearchApi};
pub use config::{ClientConfig, DEFAULT_API_BASE, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, Notification, NotificationLevel};
pub use search::{
    first_trace_id, Completion, PendingSearch, SearchController, SearchOutcome, SearchView,
};
