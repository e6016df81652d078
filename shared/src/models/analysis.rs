//! Payloads of the auxiliary endpoints: AI analysis, field and service
//! listings, health and error bodies.

use serde::{Deserialize, Serialize};

/// Body of `POST /ai/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Trace whose error records should be analysed.
    pub trace_id: String,
}

impl AnalyzeRequest {
    /// Creates a request for `trace_id`.
    #[must_use]
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }
}

/// Response of `POST /ai/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Free-text explanation. Empty when the backend found nothing to analyse.
    #[serde(default)]
    pub analysis: String,

    /// Echo of the analysed trace id.
    #[serde(default)]
    pub trace_id: String,
}

/// Response of `GET /fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsResponse {
    /// Field names usable in `field:value` queries.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Response of `GET /services`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesResponse {
    /// Service names, in backend order.
    #[serde(default)]
    pub services: Vec<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"healthy"` when the backend is up.
    pub status: String,
}

impl HealthResponse {
    /// Returns `true` if the backend reports itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message.
    pub error: String,
}
