//! Client configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::time::Duration;

/// Origin used when `LOGSCOPE_SERVER_URL` is not set.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// API root used when `LOGSCOPE_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE: &str = "/api/v1";

/// Request timeout used when `LOGSCOPE_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
///
/// Configuration values can be set via environment variables:
/// - `LOGSCOPE_SERVER_URL`: Origin of the search server (default: `http://localhost:8080`)
/// - `LOGSCOPE_API_BASE_URL`: API root, either an absolute URL or a path
///   relative to the server origin (default: `/api/v1`)
/// - `LOGSCOPE_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin. `/health` lives directly under it.
    pub server_url: Url,
    /// Resolved API root that every other endpoint is joined to.
    pub api_base: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `LOGSCOPE_SERVER_URL` is not an absolute URL
    /// - `LOGSCOPE_API_BASE_URL` cannot be resolved against the server URL
    /// - `LOGSCOPE_TIMEOUT_SECS` is set but is not a positive integer
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_url = lookup("LOGSCOPE_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let api_base = lookup("LOGSCOPE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout_secs = lookup("LOGSCOPE_TIMEOUT_SECS")
            .map(|t| t.trim().parse::<u64>())
            .transpose()
            .context("LOGSCOPE_TIMEOUT_SECS must be a whole number of seconds")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(&server_url, &api_base, Duration::from_secs(timeout_secs))
    }

    /// Creates a configuration from explicit values.
    ///
    /// `api_base` may be absolute (`https://logs.example.com/api/v1`) or a path
    /// (`/api/v1`) resolved against `server_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is malformed or the timeout is zero.
    pub fn new(server_url: &str, api_base: &str, timeout: Duration) -> Result<Self> {
        let server_url = Url::parse(server_url.trim())
            .with_context(|| format!("Invalid server URL: '{server_url}'"))?;
        if server_url.cannot_be_a_base() {
            bail!("Server URL must be an http(s) origin: '{server_url}'");
        }
        if timeout.is_zero() {
            bail!("Request timeout must be greater than zero");
        }

        let api_base = resolve_api_base(&server_url, api_base.trim())?;

        Ok(Self {
            server_url,
            api_base,
            timeout,
        })
    }

    /// URL of an API endpoint, e.g. `endpoint("search")`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// URL of the liveness probe. Bypasses the API base.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/health", origin(&self.server_url))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let server_url = Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid");
        let api_base = server_url
            .join(DEFAULT_API_BASE)
            .expect("default API base is a valid path");
        Self {
            server_url,
            api_base,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

fn resolve_api_base(server_url: &Url, api_base: &str) -> Result<Url> {
    if api_base.is_empty() {
        bail!("API base URL must not be empty");
    }
    if api_base.contains("://") {
        return Url::parse(api_base).with_context(|| format!("Invalid API base URL: '{api_base}'"));
    }

    let path = format!("/{}", api_base.trim_start_matches('/'));
    Url::parse(&origin(server_url))
        .and_then(|root| root.join(&path))
        .with_context(|| format!("Invalid API base path: '{api_base}'"))
}
