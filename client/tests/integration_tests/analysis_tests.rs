//! Integration tests for the AI analysis trigger.

use client::{AnalysisController, SearchController, NO_ERROR_LOGS};
use serde_json::json;
use shared::session::SearchEvent;
use shared::time::TimeRange;
use std::sync::Arc;

use super::common::{spawn_backend, TRACE_WITHOUT_ERRORS};

#[tokio::test]
async fn test_analyze_trace_from_search_results() {
    let backend = spawn_backend().await;
    let api = Arc::new(backend.api());
    let mut search = SearchController::new(api.clone());
    let mut analysis = AnalysisController::new(api);

    search
        .search(SearchEvent::Submit {
            query: "login".to_string(),
            time_range: TimeRange::default(),
        })
        .await;
    let view = analysis.analyze_page(&search.view().hits).await;

    assert_eq!(view.trace_id.as_deref(), Some("abc123"));
    assert_eq!(
        view.report(),
        Some("Trace abc123: credential store timed out.")
    );
    assert_eq!(
        backend.received.analyses(),
        vec![json!({"trace_id": "abc123"})]
    );

    // Analysis state is independent of the search view.
    assert!(search.view().notification.is_none());
    assert_eq!(search.view().total, 42);
}

#[tokio::test]
async fn test_analysis_without_error_logs() {
    let backend = spawn_backend().await;
    let mut analysis = AnalysisController::new(Arc::new(backend.api()));

    let view = analysis.analyze(TRACE_WITHOUT_ERRORS).await;

    assert_eq!(view.report(), Some(NO_ERROR_LOGS));
    assert!(view.notification.is_none());
}

#[tokio::test]
async fn test_analysis_is_not_cached() {
    let backend = spawn_backend().await;
    let mut analysis = AnalysisController::new(Arc::new(backend.api()));

    analysis.analyze("abc123").await;
    analysis.analyze("abc123").await;

    assert_eq!(backend.received.analyses().len(), 2);
}
