//! Client error taxonomy and user-facing notifications.

use reqwest::StatusCode;
use shared::models::{ErrorResponse, SearchRequestError};
use thiserror::Error;

/// Errors produced while talking to the search backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the backend's `error` field, or the status reason.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Invalid response from server: {0}")]
    Decode(String),

    /// The request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] SearchRequestError),

    /// Analysis was requested but no trace id is available.
    #[error("No trace id available for analysis")]
    NoTraceId,
}

impl ClientError {
    /// Builds a [`ClientError::Status`] from a failed response.
    ///
    /// Prefers the backend's `{"error": "..."}` message, then a non-empty plain
    /// text body, then the canonical reason phrase.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorResponse>(body)
            .map(|e| e.error)
            .ok()
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        Self::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Something failed.
    Error,
    /// Nothing failed, but there is nothing to show.
    Warning,
}

/// Transient message shown to the user instead of propagating an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text to display.
    pub message: String,
}

impl Notification {
    /// Error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Warning notification.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    /// Converts an error raised by `action` into a notification.
    ///
    /// Empty-result conditions become warnings; everything else is an error.
    #[must_use]
    pub fn from_error(action: &str, error: &ClientError) -> Self {
        match error {
            ClientError::NoTraceId => Self::warning(error.to_string()),
            _ => Self::error(format!("{action} failed: {error}")),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NotificationLevel::Error => write!(f, "error: {}", self.message),
            NotificationLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}
