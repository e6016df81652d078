//! Relative presets and absolute shortcuts.

use super::range::TimeRange;
use chrono::{
    DateTime, Datelike, Days, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string names no known preset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown time preset: '{0}'")]
pub struct UnknownPreset(pub String);

/// Relative window keys shared with the backend.
///
/// Only the key is transmitted; the backend turns it into bounds at query
/// execution time, so repeating a search with the same key always looks back
/// from the moment that search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeKey {
    /// Last minute.
    #[serde(rename = "1m")]
    OneMinute,
    /// Last 5 minutes.
    #[serde(rename = "5m")]
    FiveMinutes,
    /// Last 15 minutes.
    #[serde(rename = "15m")]
    FifteenMinutes,
    /// Last hour.
    #[serde(rename = "1h")]
    OneHour,
    /// Last 4 hours.
    #[serde(rename = "4h")]
    FourHours,
    /// Last day.
    #[serde(rename = "1d")]
    OneDay,
    /// Last 7 days.
    #[serde(rename = "7d")]
    SevenDays,
    /// Last 30 days.
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl RelativeKey {
    /// All presets, shortest first.
    pub const ALL: [RelativeKey; 8] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
        Self::SevenDays,
        Self::ThirtyDays,
    ];

    /// Wire key, e.g. `"15m"`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
        }
    }

    /// Human readable label, e.g. `"15 minutes"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OneMinute => "1 minute",
            Self::FiveMinutes => "5 minutes",
            Self::FifteenMinutes => "15 minutes",
            Self::OneHour => "1 hour",
            Self::FourHours => "4 hours",
            Self::OneDay => "1 day",
            Self::SevenDays => "7 days",
            Self::ThirtyDays => "30 days",
        }
    }

    /// Length of the window in minutes.
    #[must_use]
    pub fn minutes(self) -> i64 {
        match self {
            Self::OneMinute => 1,
            Self::FiveMinutes => 5,
            Self::FifteenMinutes => 15,
            Self::OneHour => 60,
            Self::FourHours => 240,
            Self::OneDay => 1_440,
            Self::SevenDays => 10_080,
            Self::ThirtyDays => 43_200,
        }
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(self) -> TimeDelta {
        TimeDelta::minutes(self.minutes())
    }

    /// Window the preset would cover if resolved at `now`.
    ///
    /// For display only; the backend computes the real window itself.
    #[must_use]
    pub fn preview_window(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - self.duration(), now)
    }
}

impl std::fmt::Display for RelativeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RelativeKey {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Calendar shortcuts resolved on the client into absolute bounds.
///
/// Calendar boundaries are taken in the time zone of the `now` passed to
/// [`AbsolutePreset::resolve`]; weeks start on Sunday. Closed periods end at
/// the last millisecond of their final day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbsolutePreset {
    /// Start of today until now.
    Today,
    /// The whole previous day.
    Yesterday,
    /// Start of this week until now.
    ThisWeek,
    /// The whole previous week.
    LastWeek,
    /// Start of this month until now.
    ThisMonth,
    /// The whole previous month.
    LastMonth,
}

impl AbsolutePreset {
    /// All shortcuts in the order they are offered.
    pub const ALL: [AbsolutePreset; 6] = [
        Self::Today,
        Self::Yesterday,
        Self::ThisWeek,
        Self::LastWeek,
        Self::ThisMonth,
        Self::LastMonth,
    ];

    /// Short key, e.g. `"lastweek"`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "week",
            Self::LastWeek => "lastweek",
            Self::ThisMonth => "month",
            Self::LastMonth => "lastmonth",
        }
    }

    /// Human readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This week",
            Self::LastWeek => "Last week",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
        }
    }

    /// Resolves the shortcut against `now`, using `now`'s time zone for
    /// calendar boundaries.
    #[must_use]
    pub fn resolve<Tz: TimeZone>(self, now: &DateTime<Tz>) -> TimeRange {
        let tz = now.timezone();
        let today = now.date_naive();
        let now_utc = now.with_timezone(&Utc);

        let (start, end) = match self {
            Self::Today => (start_of_day(&tz, today), now_utc),
            Self::Yesterday => {
                let day = today - Days::new(1);
                (start_of_day(&tz, day), end_of_day(&tz, day))
            }
            Self::ThisWeek => (start_of_day(&tz, start_of_week(today)), now_utc),
            Self::LastWeek => {
                let this_week = start_of_week(today);
                (
                    start_of_day(&tz, this_week - Days::new(7)),
                    end_of_day(&tz, this_week - Days::new(1)),
                )
            }
            Self::ThisMonth => (start_of_day(&tz, start_of_month(today)), now_utc),
            Self::LastMonth => {
                let last_day = start_of_month(today) - Days::new(1);
                (
                    start_of_day(&tz, start_of_month(last_day)),
                    end_of_day(&tz, last_day),
                )
            }
        };

        TimeRange::Absolute { start, end }
    }

    /// Resolves the shortcut against the current local time.
    #[must_use]
    pub fn resolve_now(self) -> TimeRange {
        self.resolve(&Local::now())
    }
}

impl std::fmt::Display for AbsolutePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AbsolutePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    local_to_utc(tz, date.and_time(NaiveTime::MIN))
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let last_milli = date.and_time(NaiveTime::MIN) + TimeDelta::days(1) - TimeDelta::milliseconds(1);
    local_to_utc(tz, last_milli)
}

/// Maps a wall-clock time to an instant. Ambiguous times take the earlier
/// instant; times inside a DST gap move forward by the gap.
fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .map_or_else(|| naive.and_utc(), |t| t.with_timezone(&Utc)),
    }
}
