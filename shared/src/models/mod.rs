//! Data models for the Logscope search contract.
//!
//! These types mirror the JSON bodies exchanged with the search backend.

pub mod analysis;
pub mod log;
pub mod search;

pub use analysis::{
    AnalyzeRequest, AnalyzeResponse, ErrorResponse, FieldsResponse, HealthResponse,
    ServicesResponse,
};
pub use log::{LogLevel, LogRecord};
pub use search::{
    Filters, SearchRequest, SearchRequestError, SearchResponse, DEFAULT_PAGE_SIZE,
    DEFAULT_SORT_FIELD, MATCH_ALL, MAX_PAGE_SIZE,
};
