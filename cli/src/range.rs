//! Time-range selection from command-line tokens.
//!
//! A single token names a relative preset (`15m`, `7d`) or a calendar
//! shortcut (`yesterday`, `lastweek`). Two tokens are the bounds of a custom
//! window, each RFC 3339 (`2024-01-15T08:00:00Z`) or a local
//! `YYYY-MM-DDTHH:MM[:SS]`.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use shared::time::{AbsolutePreset, RelativeKey, TimeRange};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Resolves `tokens` into a time range. Calendar shortcuts and naive bounds
/// are taken in the time zone of `now`.
///
/// # Errors
///
/// Fails for unknown presets, unparsable bounds, or a custom selection that
/// is incomplete or reversed.
pub fn parse_selection<Tz: TimeZone>(tokens: &[&str], now: &DateTime<Tz>) -> Result<TimeRange> {
    if let [token] = tokens {
        if let Ok(key) = token.parse::<RelativeKey>() {
            return Ok(TimeRange::relative(key));
        }
        if let Ok(preset) = token.parse::<AbsolutePreset>() {
            return Ok(preset.resolve(now));
        }
        if parse_instant(token, &now.timezone()).is_err() {
            bail!("Unknown time range '{token}'. Expected one of: {}", known_keys());
        }
    }

    let bounds = tokens
        .iter()
        .map(|token| parse_instant(token, &now.timezone()))
        .collect::<Result<Vec<_>>>()?;

    Ok(TimeRange::from_bounds(&bounds)?)
}

/// Keys accepted as a single token, comma separated.
#[must_use]
pub fn known_keys() -> String {
    RelativeKey::ALL
        .iter()
        .map(|key| key.key())
        .chain(AbsolutePreset::ALL.iter().map(|preset| preset.key()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_instant<Tz: TimeZone>(token: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(token) {
        return Ok(instant.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Invalid time '{token}': expected RFC 3339 or YYYY-MM-DDTHH:MM"))
}
