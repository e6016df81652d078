//! Free-text query handling.
//!
//! Queries use Lucene-like syntax and are executed by the backend. The only
//! client-side step is normalizing boolean operators.
//!
//! # Supported Syntax
//!
//! ```text
//! ERROR                          term search
//! "database error"               phrase
//! ERROR AND timeout              both
//! ERROR or WARN                  either (lowercase operators are accepted)
//! NOT DEBUG                      exclusion
//! level:ERROR service:api        field search
//! ```
//!
//! # Example
//!
//! ```
//! use shared::query::normalize_query;
//!
//! assert_eq!(normalize_query("level:ERROR and not timeout"), "level:ERROR AND NOT timeout");
//! ```

mod normalize;

pub use normalize::normalize_query;
