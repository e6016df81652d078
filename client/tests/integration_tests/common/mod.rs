//! Common test utilities and helpers for integration tests.
//!
//! This module provides an in-process mock of the search backend, served by
//! axum on an ephemeral port, so the real HTTP client can be exercised end to
//! end.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use client::{ClientConfig, HttpSearchApi};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Query that makes the mock answer 400 with an error body.
pub const QUERY_REJECTED: &str = "rejected:true";

/// Query that makes the mock answer 200 with a body that is not JSON.
pub const QUERY_GARBAGE: &str = "garbage:true";

/// Trace id the mock has no error logs for.
pub const TRACE_WITHOUT_ERRORS: &str = "no-errors";

/// Bodies received by the mock, in arrival order.
#[derive(Clone, Default)]
pub struct Received {
    searches: Arc<Mutex<Vec<Value>>>,
    analyses: Arc<Mutex<Vec<Value>>>,
}

impl Received {
    /// Search bodies received so far.
    pub fn searches(&self) -> Vec<Value> {
        self.searches.lock().unwrap().clone()
    }

    /// Analysis bodies received so far.
    pub fn analyses(&self) -> Vec<Value> {
        self.analyses.lock().unwrap().clone()
    }
}

/// A running mock backend.
pub struct MockBackend {
    /// Address the mock listens on.
    pub addr: SocketAddr,
    /// What it has received.
    pub received: Received,
}

impl MockBackend {
    /// Origin URL, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// HTTP client pointed at the mock with the default `/api/v1` base.
    pub fn api(&self) -> HttpSearchApi {
        let config = ClientConfig::new(&self.url(), "/api/v1", Duration::from_secs(5)).unwrap();
        HttpSearchApi::new(config).unwrap()
    }
}

/// Starts a mock backend on an ephemeral port.
pub async fn spawn_backend() -> MockBackend {
    let received = Received::default();

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/v1/search", post(search))
        .route("/api/v1/fields", get(fields))
        .route("/api/v1/services", get(services))
        .route("/api/v1/ai/analyze", post(analyze))
        .with_state(received.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockBackend { addr, received }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn search(State(received): State<Received>, Json(body): Json<Value>) -> Response {
    received.searches.lock().unwrap().push(body.clone());

    match body["query"].as_str() {
        Some(QUERY_REJECTED) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid query syntax"})),
        )
            .into_response(),
        Some(QUERY_GARBAGE) => (StatusCode::OK, "<html>proxy error</html>").into_response(),
        _ => Json(json!({
            "total": 42,
            "took_ms": 7,
            "page": body["page"],
            "page_size": body["page_size"],
            "hits": [
                {
                    "timestamp": "2024-01-15T10:30:00.123Z",
                    "level": "ERROR",
                    "message": "login failed for user 42",
                    "service": "user-service",
                    "host": "node-1",
                    "env": "prod",
                    "trace_id": "abc123",
                    "span_id": "span-1",
                    "stack_trace": "AuthError\\n\\tat login()",
                    "labels": {"region": "eu-west-1"}
                },
                {
                    "timestamp": "2024-01-15T10:29:59Z",
                    "level": "INFO",
                    "message": "login attempt",
                    "labels": {"port": 8080, "canary": true}
                }
            ]
        }))
        .into_response(),
    }
}

async fn fields() -> Json<Value> {
    Json(json!({"fields": ["timestamp", "message", "level", "service", "trace_id"]}))
}

async fn services() -> Json<Value> {
    Json(json!({"services": ["api-gateway", "order-service", "user-service"]}))
}

async fn analyze(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
    received.analyses.lock().unwrap().push(body.clone());

    let trace_id = body["trace_id"].as_str().unwrap_or_default().to_string();
    let analysis = if trace_id == TRACE_WITHOUT_ERRORS {
        String::new()
    } else {
        format!("Trace {trace_id}: credential store timed out.")
    };

    Json(json!({"analysis": analysis, "trace_id": trace_id}))
}
