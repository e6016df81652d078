//! HTTP access to the search backend.
//!
//! [`SearchApi`] is the seam between orchestration and transport; the
//! production implementation is [`HttpSearchApi`], built on `reqwest`.

use crate::config::ClientConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::models::{
    AnalyzeRequest, AnalyzeResponse, FieldsResponse, HealthResponse, SearchRequest,
    SearchResponse, ServicesResponse,
};

/// Operations offered by the search backend.
///
/// Implementations must be thread-safe (Send + Sync) so searches can run on
/// spawned tasks.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// `POST /search`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status or an
    /// undecodable body.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError>;

    /// `GET /fields`.
    ///
    /// # Errors
    ///
    /// Same as [`SearchApi::search`].
    async fn fields(&self) -> Result<Vec<String>, ClientError>;

    /// `GET /services`.
    ///
    /// # Errors
    ///
    /// Same as [`SearchApi::search`].
    async fn services(&self) -> Result<Vec<String>, ClientError>;

    /// `GET /health` on the server origin.
    ///
    /// # Errors
    ///
    /// Same as [`SearchApi::search`].
    async fn health(&self) -> Result<HealthResponse, ClientError>;

    /// `POST /ai/analyze`.
    ///
    /// # Errors
    ///
    /// Same as [`SearchApi::search`].
    async fn analyze(&self, trace_id: &str) -> Result<AnalyzeResponse, ClientError>;
}

/// [`SearchApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    http: Client,
    config: ClientConfig,
}

impl HttpSearchApi {
    /// Creates a client for the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("logscope/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::from_status(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        let url = self.config.endpoint("search");
        tracing::debug!(%url, query = %request.query, page = request.page, "POST search");
        self.send(self.http.post(url).json(request)).await
    }

    async fn fields(&self) -> Result<Vec<String>, ClientError> {
        let response: FieldsResponse = self.send(self.http.get(self.config.endpoint("fields"))).await?;
        Ok(response.fields)
    }

    async fn services(&self) -> Result<Vec<String>, ClientError> {
        let response: ServicesResponse = self
            .send(self.http.get(self.config.endpoint("services")))
            .await?;
        Ok(response.services)
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.http.get(self.config.health_url())).await
    }

    async fn analyze(&self, trace_id: &str) -> Result<AnalyzeResponse, ClientError> {
        let url = self.config.endpoint("ai/analyze");
        tracing::debug!(%url, %trace_id, "POST analyze");
        self.send(self.http.post(url).json(&AnalyzeRequest::new(trace_id)))
            .await
    }
}
