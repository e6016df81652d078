//! Integration tests for the auxiliary lookups.
//!
//! Tests cover:
//! - Health check on the server origin
//! - Field and service listings under the API base

use client::{ClientConfig, HttpSearchApi, SearchApi};
use std::time::Duration;
use tokio_test::assert_ok;

use super::common::spawn_backend;

#[tokio::test]
async fn test_health_check() {
    let backend = spawn_backend().await;

    let health = assert_ok!(backend.api().health().await);

    assert_eq!(health.status, "healthy");
    assert!(health.is_healthy());
}

#[tokio::test]
async fn test_health_bypasses_absolute_api_base() {
    let backend = spawn_backend().await;
    // The API base points at a path that does not exist; health must still work
    // because it is served from the origin.
    let config = ClientConfig::new(
        &backend.url(),
        &format!("{}/nowhere/v9", backend.url()),
        Duration::from_secs(5),
    )
    .unwrap();
    let api = HttpSearchApi::new(config).unwrap();

    assert_ok!(api.health().await);
    assert!(api.fields().await.is_err());
}

#[tokio::test]
async fn test_fields() {
    let backend = spawn_backend().await;

    let fields = assert_ok!(backend.api().fields().await);

    assert_eq!(
        fields,
        vec!["timestamp", "message", "level", "service", "trace_id"]
    );
}

#[tokio::test]
async fn test_services() {
    let backend = spawn_backend().await;

    let services = assert_ok!(backend.api().services().await);

    assert_eq!(
        services,
        vec!["api-gateway", "order-service", "user-service"]
    );
}
