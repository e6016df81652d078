//! The `TimeRange` tagged union.

use super::preset::RelativeKey;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building an absolute time range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    /// The selection does not consist of exactly two bounds.
    #[error("Incomplete time range: expected 2 bounds, got {0}")]
    Incomplete(usize),

    /// The end bound lies before the start bound.
    #[error("Incomplete time range: end {end} is before start {start}")]
    Reversed {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
}

/// Time window of a search.
///
/// Serialized flat into the search body, tagged by `time_range_type`:
///
/// ```json
/// {"time_range_type": "relative", "relative_time_key": "15m"}
/// {"time_range_type": "absolute", "start_time": "2024-01-15T00:00:00.000Z", "end_time": "..."}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "time_range_type", rename_all = "lowercase")]
pub enum TimeRange {
    /// Window ending at query execution time; resolved by the backend.
    Relative {
        /// Preset key.
        #[serde(rename = "relative_time_key")]
        key: RelativeKey,
    },
    /// Fixed window, start inclusive and end exclusive.
    Absolute {
        /// First instant covered.
        #[serde(rename = "start_time", with = "rfc3339_millis")]
        start: DateTime<Utc>,
        /// Instant the window stops at.
        #[serde(rename = "end_time", with = "rfc3339_millis")]
        end: DateTime<Utc>,
    },
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::relative(RelativeKey::FifteenMinutes)
    }
}

impl TimeRange {
    /// Relative window for `key`.
    #[must_use]
    pub fn relative(key: RelativeKey) -> Self {
        Self::Relative { key }
    }

    /// Absolute window from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeRangeError::Reversed`] if `end` is before `start`.
    pub fn absolute(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if end < start {
            return Err(TimeRangeError::Reversed { start, end });
        }
        Ok(Self::Absolute { start, end })
    }

    /// Absolute window from a custom selection of bounds.
    ///
    /// A selection is only complete with exactly two bounds in order; anything
    /// else is reported so the caller can hold back the search.
    ///
    /// # Errors
    ///
    /// Returns [`TimeRangeError::Incomplete`] for the wrong number of bounds and
    /// [`TimeRangeError::Reversed`] when they are out of order.
    pub fn from_bounds<Tz: TimeZone>(bounds: &[DateTime<Tz>]) -> Result<Self, TimeRangeError> {
        match bounds {
            [start, end] => Self::absolute(start.with_timezone(&Utc), end.with_timezone(&Utc)),
            other => Err(TimeRangeError::Incomplete(other.len())),
        }
    }

    /// Preset key for relative windows.
    #[must_use]
    pub fn relative_key(&self) -> Option<RelativeKey> {
        match self {
            Self::Relative { key } => Some(*key),
            Self::Absolute { .. } => None,
        }
    }

    /// Resolved bounds for absolute windows.
    #[must_use]
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Self::Relative { .. } => None,
            Self::Absolute { start, end } => Some((*start, *end)),
        }
    }

    /// `true` unless this is an absolute window whose end precedes its start.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.bounds().is_none_or(|(start, end)| start <= end)
    }

    /// Window to show the user. Relative windows are previewed against `now`.
    #[must_use]
    pub fn display_window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        match self {
            Self::Relative { key } => key.preview_window(now),
            Self::Absolute { start, end } => (*start, *end),
        }
    }

    /// Label using `tz` for absolute bounds.
    ///
    /// Relative windows read `last 15 minutes`; absolute ones read
    /// `2024-01-15 08:00 ~ 2024-01-15 09:00`.
    #[must_use]
    pub fn describe_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match self {
            Self::Relative { key } => format!("last {}", key.label()),
            Self::Absolute { start, end } => format!(
                "{} ~ {}",
                start.with_timezone(tz).format("%Y-%m-%d %H:%M"),
                end.with_timezone(tz).format("%Y-%m-%d %H:%M")
            ),
        }
    }

    /// Label in the local time zone.
    #[must_use]
    pub fn label(&self) -> String {
        self.describe_in(&Local)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-15T00:00:00.000Z`.
mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
