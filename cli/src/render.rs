//! Plain-text rendering of search results and analysis reports.

use chrono::TimeZone;
use client::{AnalysisView, SearchView};
use shared::models::LogRecord;
use shared::session::SessionState;
use std::fmt::{Display, Write};

/// Shown in place of cards when a search matched nothing.
pub const NO_DATA: &str = "No data";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const CARD_RULE: &str = "----------------------------------------";

/// Total hits and query time, e.g. `42 hits` / `7ms`. Only shown when
/// something matched.
#[must_use]
pub fn stat_cards(view: &SearchView) -> Option<String> {
    (view.total > 0).then(|| {
        format!(
            "Total hits  {}\nQuery time  {}ms",
            view.total, view.took_ms
        )
    })
}

/// One record, one field per line. Absent or blank optional fields are
/// skipped.
#[must_use]
pub fn log_card<Tz: TimeZone>(record: &LogRecord, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut card = String::new();
    let time = record.timestamp.with_timezone(tz).format(TIME_FORMAT).to_string();

    let fields = [
        ("level", Some(record.level.as_str())),
        ("time", Some(time.as_str())),
        ("service", non_blank(record.service.as_deref())),
        ("host", non_blank(record.host.as_deref())),
        ("env", non_blank(record.env.as_deref())),
        ("trace_id", record.trace_id()),
        ("span_id", non_blank(record.span_id.as_deref())),
        ("message", Some(record.message.as_str())),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(card, "{name:<10} {value}");
        }
    }

    if let Some(stack_trace) = &record.stack_trace {
        let _ = writeln!(card, "stack_trace:");
        for line in expand_escapes(stack_trace).lines() {
            let _ = writeln!(card, "  {line}");
        }
    }

    if let Some(labels) = &record.labels {
        let json = serde_json::to_string_pretty(labels).unwrap_or_default();
        let _ = writeln!(card, "labels:");
        for line in json.lines() {
            let _ = writeln!(card, "  {line}");
        }
    }

    card
}

/// Cards for every hit, or [`NO_DATA`].
#[must_use]
pub fn log_cards<Tz: TimeZone>(hits: &[LogRecord], tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    if hits.is_empty() {
        return format!("{NO_DATA}\n");
    }

    hits.iter()
        .map(|record| log_card(record, tz))
        .collect::<Vec<_>>()
        .join(&format!("{CARD_RULE}\n"))
}

/// `page X of Y (N records)`, when anything matched.
#[must_use]
pub fn pagination_footer(view: &SearchView) -> Option<String> {
    (view.total > 0).then(|| {
        format!(
            "page {} of {} ({} records)",
            view.page,
            view.total_pages(),
            view.total
        )
    })
}

/// Full rendition of a search view: notification, stats, cards, footer.
#[must_use]
pub fn search_results<Tz: TimeZone>(view: &SearchView, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();

    if let Some(notification) = &view.notification {
        let _ = writeln!(out, "{notification}");
        return out;
    }
    if let Some(stats) = stat_cards(view) {
        let _ = writeln!(out, "{stats}\n");
    }
    out.push_str(&log_cards(&view.hits, tz));
    if let Some(footer) = pagination_footer(view) {
        let _ = writeln!(out, "\n{footer}");
    }
    if let Some(trace_id) = view.analysis_target() {
        let _ = writeln!(out, "analysis available for trace {trace_id}");
    }

    out
}

/// One-line summary of what the session searches for.
#[must_use]
pub fn session_summary<Tz: TimeZone>(state: &SessionState, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut summary = format!(
        "[{}] query: {}",
        state.time_range().describe_in(tz),
        state.query()
    );

    let filters = state.filters();
    if let Some(level) = filters.level {
        let _ = write!(summary, " level={level}");
    }
    if let Some(service) = &filters.service {
        let _ = write!(summary, " service={service}");
    }
    if let Some(env) = &filters.env {
        let _ = write!(summary, " env={env}");
    }

    summary
}

/// Analysis report, or the reason there is none.
#[must_use]
pub fn analysis(view: &AnalysisView) -> String {
    if let Some(notification) = &view.notification {
        return notification.to_string();
    }

    match (view.trace_id.as_deref(), view.report()) {
        (Some(trace_id), Some(report)) => format!("AI analysis for trace {trace_id}\n\n{report}"),
        (None, Some(report)) => report.to_string(),
        (_, None) => String::new(),
    }
}

/// Titled list of names, one per line.
#[must_use]
pub fn listing(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!("{title}: {NO_DATA}");
    }

    let mut out = format!("{title}:");
    for item in items {
        let _ = write!(out, "\n  {item}");
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Turns literal `\n` and `\t` sequences into real line breaks and tabs.
fn expand_escapes(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use client::{Notification, NO_ERROR_LOGS};
    use shared::models::{Filters, LogLevel};
    use shared::session::SearchEvent;
    use shared::time::{RelativeKey, TimeRange};

    fn record() -> LogRecord {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
            + chrono::TimeDelta::milliseconds(123);
        LogRecord::new(ts, "ERROR", "login failed for user 42")
            .with_service("user-service")
            .with_host("node-1")
            .with_env("prod")
            .with_trace_id("abc123")
    }

    fn view(hits: Vec<LogRecord>, total: u64) -> SearchView {
        SearchView {
            hits,
            total,
            took_ms: 7,
            ..SearchView::default()
        }
    }

    #[test]
    fn test_stat_cards() {
        let stats = stat_cards(&view(vec![record()], 42)).unwrap();
        assert!(stats.contains("42"));
        assert!(stats.contains("7ms"));

        assert!(stat_cards(&view(Vec::new(), 0)).is_none());
    }

    #[test]
    fn test_log_card_fields() {
        let card = log_card(&record(), &Utc);
        let lines: Vec<&str> = card.lines().collect();

        assert_eq!(lines[0], "level      ERROR");
        assert_eq!(lines[1], "time       2024-01-15 10:30:00.123");
        assert_eq!(lines[2], "service    user-service");
        assert_eq!(lines[3], "host       node-1");
        assert_eq!(lines[4], "env        prod");
        assert_eq!(lines[5], "trace_id   abc123");
        assert_eq!(lines[6], "message    login failed for user 42");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_log_card_time_is_local_to_time_zone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let card = log_card(&record(), &tz);
        assert!(card.contains("2024-01-15 19:30:00.123"));
    }

    #[test]
    fn test_log_card_optional_sections() {
        let record = record()
            .with_span_id("span-7")
            .with_stack_trace("java.lang.NullPointerException\\n\\tat Login.check(Login.java:42)")
            .with_label("region", "eu-west-1");

        let card = log_card(&record, &Utc);

        assert!(card.contains("span_id    span-7\n"));
        assert!(card.contains("stack_trace:\n  java.lang.NullPointerException\n  \tat Login.check"));
        assert!(card.contains("labels:\n  {\n    \"region\": \"eu-west-1\"\n  }"));
    }

    #[test]
    fn test_log_card_non_string_labels() {
        let record = record().with_label("port", 8080).with_label("canary", true);

        let card = log_card(&record, &Utc);

        assert!(card.contains("\"canary\": true"));
        assert!(card.contains("\"port\": 8080"));
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let card = log_card(&LogRecord::new(ts, "INFO", "started"), &Utc);

        assert_eq!(card.lines().count(), 3);
        assert!(!card.contains("span_id"));
        assert!(!card.contains("service"));
    }

    #[test]
    fn test_blank_fields_are_skipped() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let record = LogRecord::new(ts, "WARN", "slow query")
            .with_service("  ")
            .with_host("")
            .with_trace_id("   ")
            .with_span_id("");

        let card = log_card(&record, &Utc);

        assert_eq!(card.lines().count(), 3);
        assert!(!card.contains("trace_id"));
        assert!(!card.contains("service"));
        assert!(!card.contains("host"));
    }

    #[test]
    fn test_no_data() {
        let out = search_results(&view(Vec::new(), 0), &Utc);
        assert_eq!(out, "No data\n");
    }

    #[test]
    fn test_search_results() {
        let out = search_results(&view(vec![record(), record()], 42), &Utc);

        assert!(out.starts_with("Total hits  42\nQuery time  7ms\n"));
        assert_eq!(out.matches("level      ERROR").count(), 2);
        assert!(out.contains(CARD_RULE));
        assert!(out.contains("page 1 of 1 (42 records)"));
        assert!(out.contains("analysis available for trace abc123"));
    }

    #[test]
    fn test_search_results_with_notification() {
        let mut view = view(Vec::new(), 0);
        view.notification = Some(Notification::error("Search failed: timed out"));

        assert_eq!(search_results(&view, &Utc), "error: Search failed: timed out\n");
    }

    #[test]
    fn test_pagination_footer() {
        let view = SearchView {
            total: 120,
            page: 2,
            page_size: 50,
            ..SearchView::default()
        };
        assert_eq!(pagination_footer(&view).unwrap(), "page 2 of 3 (120 records)");
    }

    #[test]
    fn test_session_summary() {
        let state = SessionState::new(TimeRange::relative(RelativeKey::OneHour))
            .apply(SearchEvent::Submit {
                query: "error or timeout".to_string(),
                time_range: TimeRange::relative(RelativeKey::OneHour),
            })
            .apply(SearchEvent::FiltersChanged(
                Filters::new().with_level(LogLevel::Warn).with_env("prod"),
            ));

        assert_eq!(
            session_summary(&state, &Utc),
            "[last 1 hour] query: error OR timeout level=WARN env=prod"
        );
    }

    #[test]
    fn test_analysis_report() {
        let view = AnalysisView {
            trace_id: Some("abc123".to_string()),
            analysis: Some("Database pool exhausted.".to_string()),
            ..AnalysisView::default()
        };
        assert_eq!(
            analysis(&view),
            "AI analysis for trace abc123\n\nDatabase pool exhausted."
        );

        let empty = AnalysisView {
            trace_id: Some("abc123".to_string()),
            analysis: Some(String::new()),
            ..AnalysisView::default()
        };
        assert!(analysis(&empty).ends_with(NO_ERROR_LOGS));
    }

    #[test]
    fn test_listing() {
        let services = vec!["api-gateway".to_string(), "user-service".to_string()];
        assert_eq!(
            listing("services", &services),
            "services:\n  api-gateway\n  user-service"
        );
        assert_eq!(listing("fields", &[]), "fields: No data");
    }
}
