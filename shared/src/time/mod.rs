//! Time-range model for searches.
//!
//! A search covers either a *relative* window, identified only by a preset key
//! such as `15m` and resolved by the backend at query time, or an *absolute*
//! window with fully resolved bounds.
//!
//! # Example
//!
//! ```
//! use shared::time::{AbsolutePreset, RelativeKey, TimeRange};
//! use chrono::{TimeZone, Utc};
//!
//! let relative = TimeRange::relative("1h".parse::<RelativeKey>().unwrap());
//! assert_eq!(relative.label(), "last 1 hour");
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap();
//! let yesterday = AbsolutePreset::Yesterday.resolve(&now);
//! assert_eq!(yesterday.bounds().unwrap().0.to_rfc3339(), "2024-03-13T00:00:00+00:00");
//! ```

mod preset;
mod range;

pub use preset::{AbsolutePreset, RelativeKey, UnknownPreset};
pub use range::{TimeRange, TimeRangeError};
