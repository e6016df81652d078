//! AI error-analysis trigger.
//!
//! Analysis has its own loading and error state, separate from search. Results
//! are never cached: each call asks the backend again.

use crate::api::SearchApi;
use crate::error::{ClientError, Notification};
use crate::search::first_trace_id;
use shared::models::LogRecord;
use std::sync::Arc;

/// Text shown when the backend had nothing to analyse.
pub const NO_ERROR_LOGS: &str = "No error logs found for this trace id.";

/// State of the analysis panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisView {
    /// Trace being (or last) analysed.
    pub trace_id: Option<String>,
    /// A request is in flight.
    pub loading: bool,
    /// Explanation returned by the backend. Empty means nothing was found.
    pub analysis: Option<String>,
    /// Set when the last analysis could not be performed.
    pub notification: Option<Notification>,
}

impl AnalysisView {
    /// Text to display for a finished analysis, substituting a hint when the
    /// backend returned nothing.
    #[must_use]
    pub fn report(&self) -> Option<&str> {
        self.analysis.as_deref().map(|text| {
            if text.trim().is_empty() {
                NO_ERROR_LOGS
            } else {
                text
            }
        })
    }
}

/// Requests AI analysis for a trace.
pub struct AnalysisController {
    api: Arc<dyn SearchApi>,
    view: AnalysisView,
}

impl AnalysisController {
    /// Creates a controller with an empty view.
    #[must_use]
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self {
            api,
            view: AnalysisView::default(),
        }
    }

    /// Current panel state.
    #[must_use]
    pub fn view(&self) -> &AnalysisView {
        &self.view
    }

    /// Analyses the first trace found on `hits`.
    pub async fn analyze_page(&mut self, hits: &[LogRecord]) -> &AnalysisView {
        match first_trace_id(hits).map(str::to_string) {
            Some(trace_id) => self.analyze(&trace_id).await,
            None => self.fail(None, &ClientError::NoTraceId),
        }
    }

    /// Analyses `trace_id`.
    pub async fn analyze(&mut self, trace_id: &str) -> &AnalysisView {
        let trace_id = trace_id.trim();
        if trace_id.is_empty() {
            return self.fail(None, &ClientError::NoTraceId);
        }

        self.view = AnalysisView {
            trace_id: Some(trace_id.to_string()),
            loading: true,
            ..AnalysisView::default()
        };
        tracing::debug!(%trace_id, "Requesting analysis");

        match self.api.analyze(trace_id).await {
            Ok(response) => {
                self.view.loading = false;
                self.view.analysis = Some(response.analysis);
                &self.view
            }
            Err(e) => {
                tracing::warn!(%trace_id, error = %e, "Analysis failed");
                self.fail(Some(trace_id.to_string()), &e)
            }
        }
    }

    fn fail(&mut self, trace_id: Option<String>, error: &ClientError) -> &AnalysisView {
        self.view = AnalysisView {
            trace_id,
            notification: Some(Notification::from_error("Analysis", error)),
            ..AnalysisView::default()
        };
        &self.view
    }
}
