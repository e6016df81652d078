//! Integration tests for search dispatch and orchestration.
//!
//! Tests cover:
//! - The JSON body sent for relative and absolute time ranges
//! - Decoding of the search response
//! - Error bodies and undecodable responses
//! - Session behaviour across pagination and filter events

use chrono::{TimeZone, Utc};
use client::{ClientError, Completion, NotificationLevel, SearchApi, SearchController};
use serde_json::json;
use shared::models::{Filters, LogLevel, SearchRequest};
use shared::session::SearchEvent;
use shared::time::{AbsolutePreset, RelativeKey, TimeRange};
use std::sync::Arc;

use super::common::{spawn_backend, QUERY_GARBAGE, QUERY_REJECTED};

#[tokio::test]
async fn test_relative_search_body() {
    let backend = spawn_backend().await;
    let api = backend.api();

    let request = SearchRequest::new(TimeRange::relative(RelativeKey::OneHour))
        .with_query("error or warn");
    let response = api.search(&request).await.unwrap();

    assert_eq!(response.total, 42);
    assert_eq!(response.took_ms, 7);

    let sent = backend.received.searches();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        json!({
            "query": "error OR warn",
            "filters": {},
            "time_range_type": "relative",
            "relative_time_key": "1h",
            "page": 1,
            "page_size": 50,
            "sort_by": "timestamp",
            "sort_desc": true
        })
    );
}

#[tokio::test]
async fn test_absolute_search_body() {
    let backend = spawn_backend().await;
    let api = backend.api();

    let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
    let request = SearchRequest::new(AbsolutePreset::Yesterday.resolve(&now)).with_filters(
        Filters::new()
            .with_level(LogLevel::Error)
            .with_service("user-service"),
    );
    api.search(&request).await.unwrap();

    let sent = &backend.received.searches()[0];
    assert_eq!(sent["time_range_type"], "absolute");
    assert_eq!(sent["start_time"], "2024-03-13T00:00:00.000Z");
    assert_eq!(sent["end_time"], "2024-03-13T23:59:59.999Z");
    assert!(sent.get("relative_time_key").is_none());
    assert_eq!(sent["filters"], json!({"level": "ERROR", "service": "user-service"}));
}

#[tokio::test]
async fn test_search_response_records() {
    let backend = spawn_backend().await;
    let api = backend.api();

    let response = api
        .search(&SearchRequest::new(TimeRange::default()))
        .await
        .unwrap();

    assert_eq!(response.hits.len(), 2);
    let first = &response.hits[0];
    assert_eq!(first.level, "ERROR");
    assert_eq!(first.trace_id(), Some("abc123"));
    assert_eq!(first.host.as_deref(), Some("node-1"));
    assert_eq!(
        first.labels.as_ref().unwrap().get("region").and_then(|v| v.as_str()),
        Some("eu-west-1")
    );

    let second = &response.hits[1];
    assert!(second.service.is_none());
    assert!(second.trace_id().is_none());
    let labels = second.labels.as_ref().unwrap();
    assert_eq!(labels["port"], json!(8080));
    assert_eq!(labels["canary"], json!(true));
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let backend = spawn_backend().await;
    let api = backend.api();

    let request = SearchRequest::new(TimeRange::default()).with_query(QUERY_REJECTED);
    let err = api.search(&request).await.unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "invalid query syntax");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let backend = spawn_backend().await;
    let api = backend.api();

    let request = SearchRequest::new(TimeRange::default()).with_query(QUERY_GARBAGE);
    let err = api.search(&request).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_controller_end_to_end() {
    let backend = spawn_backend().await;
    let mut controller = SearchController::new(Arc::new(backend.api()));

    let completion = controller
        .search(SearchEvent::Submit {
            query: "login and abc123".to_string(),
            time_range: TimeRange::relative(RelativeKey::FifteenMinutes),
        })
        .await;

    assert_eq!(completion, Completion::Applied);
    let sent = &backend.received.searches()[0];
    assert_eq!(sent["query"], "login AND abc123");
    assert_eq!(sent["relative_time_key"], "15m");

    let view = controller.view();
    assert_eq!(view.total, 42);
    assert_eq!(view.took_ms, 7);
    assert_eq!(view.hits.len(), 2);
    assert_eq!(view.analysis_target(), Some("abc123"));
}

#[tokio::test]
async fn test_controller_session_across_events() {
    let backend = spawn_backend().await;
    let mut controller = SearchController::new(Arc::new(backend.api()));

    controller
        .search(SearchEvent::Submit {
            query: "timeout".to_string(),
            time_range: TimeRange::relative(RelativeKey::FourHours),
        })
        .await;
    controller
        .search(SearchEvent::FiltersChanged(Filters::new().with_env("prod")))
        .await;
    controller
        .search(SearchEvent::PageChanged {
            page: 2,
            page_size: 20,
        })
        .await;
    controller.search(SearchEvent::FiltersReset).await;

    let sent = backend.received.searches();
    assert_eq!(sent.len(), 4);

    assert_eq!(sent[1]["page"], 1);
    assert_eq!(sent[1]["filters"], json!({"env": "prod"}));

    assert_eq!(sent[2]["page"], 2);
    assert_eq!(sent[2]["page_size"], 20);
    assert_eq!(sent[2]["query"], "timeout");
    assert_eq!(sent[2]["filters"], json!({"env": "prod"}));
    assert_eq!(sent[2]["relative_time_key"], "4h");

    assert_eq!(sent[3]["page"], 1);
    assert_eq!(sent[3]["page_size"], 20);
    assert_eq!(sent[3]["filters"], json!({}));
}

#[tokio::test]
async fn test_controller_failure_clears_view() {
    let backend = spawn_backend().await;
    let mut controller = SearchController::new(Arc::new(backend.api()));

    controller
        .search(SearchEvent::Submit {
            query: "error".to_string(),
            time_range: TimeRange::default(),
        })
        .await;
    assert_eq!(controller.view().total, 42);

    let completion = controller
        .search(SearchEvent::Submit {
            query: QUERY_REJECTED.to_string(),
            time_range: TimeRange::default(),
        })
        .await;

    assert_eq!(completion, Completion::Failed);
    let view = controller.view();
    assert!(view.hits.is_empty());
    assert_eq!(view.total, 0);
    let notification = view.notification.as_ref().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert!(notification.message.contains("invalid query syntax"));
}

#[tokio::test]
async fn test_controller_unreachable_backend_keeps_session_usable() {
    let config = client::ClientConfig::new(
        "http://127.0.0.1:9",
        "/api/v1",
        std::time::Duration::from_secs(2),
    )
    .unwrap();
    let api = client::HttpSearchApi::new(config).unwrap();
    let mut controller = SearchController::new(Arc::new(api));

    let completion = controller
        .search(SearchEvent::Submit {
            query: "anything".to_string(),
            time_range: TimeRange::default(),
        })
        .await;

    assert_eq!(completion, Completion::Failed);
    assert!(controller.view().notification.is_some());
    assert!(!controller.view().loading);
    assert_eq!(controller.state().query(), "anything");
}
