//! Common test utilities and fixtures
#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use cadence_core::ManualClock;
use cadence_server::{api, jobs::ReleaseScheduler, state::AppState};
use cadence_storage::LocalCatalog;
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;

/// Catalog on a temporary `SQLite` file, driven by a manual clock
pub struct TestCatalog {
    pub catalog: Arc<LocalCatalog>,
    pub clock: Arc<ManualClock>,
    _temp_dir: TempDir,
}

/// Create a test catalog with migrations applied
pub async fn create_test_catalog() -> Result<TestCatalog> {
    let temp_dir = TempDir::new()?;
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let pool = cadence_storage::create_pool(&db_url).await?;
    cadence_storage::run_migrations(&pool).await?;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let catalog = Arc::new(LocalCatalog::new(pool, clock.clone()));

    Ok(TestCatalog {
        catalog,
        clock,
        _temp_dir: temp_dir,
    })
}

/// Router over a fresh test catalog
pub async fn create_test_app() -> (Router, TestCatalog) {
    let test_catalog = create_test_catalog().await.unwrap();

    let scheduler = Arc::new(ReleaseScheduler::new(
        test_catalog.catalog.clone(),
        Duration::from_secs(60 * 60),
        Duration::from_secs(30),
    ));
    let app_state = AppState::new(test_catalog.catalog.clone(), scheduler);

    (api::router(app_state), test_catalog)
}

/// JSON request with a body
pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Request without a body
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}
