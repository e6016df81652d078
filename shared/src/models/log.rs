//! Log record model.
//!
//! Defines `LogRecord`, a single hit returned by the search backend, and the
//! `LogLevel` values offered by the level filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Log severity level as understood by the backend's level filter.
///
/// Levels travel uppercase on the wire (`"ERROR"`, `"WARN"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Error conditions.
    Error,
    /// Warning conditions.
    Warn,
    /// Informational messages.
    Info,
    /// Debug information.
    Debug,
}

impl LogLevel {
    /// All levels in the order the filter panel offers them.
    pub const ALL: [LogLevel; 4] = [Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// Returns the wire representation of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known log level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown log level: '{0}'. Expected one of ERROR, WARN, INFO, DEBUG")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLogLevel(s.to_string()))
    }
}

/// A single log record (a "hit") returned by a search.
///
/// Only `timestamp`, `level` and `message` are always present; everything else
/// depends on what the producing service attached.
///
/// # Example
///
/// ```
/// use shared::models::LogRecord;
///
/// let record: LogRecord = serde_json::from_str(r#"{
///     "timestamp": "2024-01-15T10:30:00Z",
///     "level": "ERROR",
///     "message": "payment declined",
///     "service": "payment-service",
///     "trace_id": "abc123"
/// }"#).unwrap();
///
/// assert_eq!(record.trace_id(), Some("abc123"));
/// assert!(record.host.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Severity as reported by the backend. Kept as a string because producers
    /// are free to emit levels outside [`LogLevel`].
    pub level: String,

    /// The log message content.
    pub message: String,

    /// Name of the service that produced the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Host the record was emitted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Deployment environment (`prod`, `staging`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    /// Correlation id of the distributed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,

    /// Span id within the trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,

    /// Stack trace attached to error records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,

    /// Free-form labels. Producers attach any JSON value, not only strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, Value>>,
}

impl LogRecord {
    /// Creates a record with the mandatory fields and nothing else.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        level: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level: level.into(),
            message: message.into(),
            service: None,
            host: None,
            env: None,
            trace_id: None,
            span_id: None,
            stack_trace: None,
            labels: None,
        }
    }

    /// Sets the producing service.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the environment.
    #[must_use]
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets the span ID.
    #[must_use]
    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }

    /// Sets the stack trace.
    #[must_use]
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Adds a label, creating the label map on first use.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Returns the trace id if the record carries a non-empty one.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Parses the record's level into a known [`LogLevel`], if it is one.
    #[must_use]
    pub fn known_level(&self) -> Option<LogLevel> {
        self.level.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_log_record_new() {
        let record = LogRecord::new(ts(), "INFO", "Server started");

        assert_eq!(record.level, "INFO");
        assert_eq!(record.message, "Server started");
        assert!(record.service.is_none());
        assert!(record.trace_id.is_none());
        assert!(record.labels.is_none());
    }

    #[test]
    fn test_log_record_builders() {
        let record = LogRecord::new(ts(), "ERROR", "boom")
            .with_service("api-gateway")
            .with_host("node-1")
            .with_env("prod")
            .with_trace_id("trace-1")
            .with_span_id("span-1")
            .with_stack_trace("at main")
            .with_label("region", "eu")
            .with_label("zone", "a");

        assert_eq!(record.service.as_deref(), Some("api-gateway"));
        assert_eq!(record.host.as_deref(), Some("node-1"));
        assert_eq!(record.env.as_deref(), Some("prod"));
        assert_eq!(record.span_id.as_deref(), Some("span-1"));
        assert_eq!(record.stack_trace.as_deref(), Some("at main"));
        assert_eq!(record.labels.as_ref().map(BTreeMap::len), Some(2));
    }

    #[test]
    fn test_trace_id_ignores_blank() {
        let blank = LogRecord::new(ts(), "ERROR", "x").with_trace_id("   ");
        assert_eq!(blank.trace_id(), None);

        let empty = LogRecord::new(ts(), "ERROR", "x").with_trace_id("");
        assert_eq!(empty.trace_id(), None);

        let present = LogRecord::new(ts(), "ERROR", "x").with_trace_id("abc");
        assert_eq!(present.trace_id(), Some("abc"));
    }

    #[test]
    fn test_log_record_deserialization_minimal() {
        let json = r#"{
            "timestamp": "2024-01-15T10:30:00Z",
            "level": "WARN",
            "message": "High memory usage"
        }"#;

        let record: LogRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.timestamp, ts());
        assert_eq!(record.known_level(), Some(LogLevel::Warn));
        assert!(record.service.is_none());
        assert!(record.stack_trace.is_none());
    }

    #[test]
    fn test_log_record_deserialization_full() {
        let json = r#"{
            "timestamp": "2024-01-15T10:30:00Z",
            "level": "ERROR",
            "message": "Database connection failed",
            "service": "order-service",
            "host": "db-1",
            "env": "staging",
            "trace_id": "abc123",
            "span_id": "def456",
            "stack_trace": "java.lang.RuntimeException\\n\\tat Foo.bar",
            "labels": {"team": "orders"}
        }"#;

        let record: LogRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.service.as_deref(), Some("order-service"));
        assert_eq!(record.trace_id(), Some("abc123"));
        assert_eq!(record.span_id.as_deref(), Some("def456"));
        assert_eq!(
            record.labels.unwrap().get("team").and_then(Value::as_str),
            Some("orders")
        );
    }

    #[test]
    fn test_non_string_labels_are_kept() {
        let json = r#"{
            "timestamp": "2024-01-15T10:30:00Z",
            "level": "INFO",
            "message": "listening",
            "labels": {"port": 8080, "canary": true, "region": "eu"}
        }"#;

        let record: LogRecord = serde_json::from_str(json).unwrap();
        let labels = record.labels.unwrap();

        assert_eq!(labels.get("port").and_then(Value::as_u64), Some(8080));
        assert_eq!(labels.get("canary").and_then(Value::as_bool), Some(true));
        assert_eq!(labels.get("region").and_then(Value::as_str), Some("eu"));
    }

    #[test]
    fn test_log_record_serialization_skips_absent_fields() {
        let record = LogRecord::new(ts(), "INFO", "hello");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["level"], "INFO");
        assert!(json.get("service").is_none());
        assert!(json.get("labels").is_none());
    }

    #[test]
    fn test_unknown_level_is_kept_verbatim() {
        let record = LogRecord::new(ts(), "FATAL", "disk on fire");
        assert_eq!(record.known_level(), None);
        assert_eq!(record.level, "FATAL");
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("Warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" INFO ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_serialization() {
        assert_eq!(
            serde_json::to_string(&LogLevel::Error).unwrap(),
            "\"ERROR\""
        );
        let level: LogLevel = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(LogLevel::Info.to_string(), "INFO");
        assert_eq!(LogLevel::Debug.to_string(), "DEBUG");
    }
}
