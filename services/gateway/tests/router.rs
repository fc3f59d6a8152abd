//! Router tests for the read endpoints
//!
//! Requests go through the full router with in-memory stores so status
//! codes, headers and bodies are checked as clients see them.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use gateway::router::create_router;
use gateway::state::AppState;
use http_body_util::BodyExt;
use market_data::fetch::StaticFetcher;
use market_data::ingest;
use market_data::store::{FsBlobStore, FsPointerStore, MemoryBlobStore, MemoryPointerStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use types::snapshot::LATEST_DATASET_KEY;

struct TestApp {
    router: Router,
    blobs: Arc<MemoryBlobStore>,
    pointer: Arc<MemoryPointerStore>,
}

fn test_app() -> TestApp {
    let blobs = Arc::new(MemoryBlobStore::new());
    let pointer = Arc::new(MemoryPointerStore::new());
    let state = AppState::new(blobs.clone(), pointer.clone());
    TestApp {
        router: create_router(state),
        blobs,
        pointer,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, cache_control, json)
}

#[tokio::test]
async fn dataset_not_found_before_first_ingestion() {
    let app = test_app();

    let (status, _, body) = get(&app.router, "/api/dataset").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "Dataset metadata not found.");
}

#[tokio::test]
async fn dataset_returns_latest_snapshot_with_cache_header() {
    let app = test_app();
    let fetcher = StaticFetcher::new(200, r#"{"b":2,"a":1}"#);
    let metadata = ingest(
        "https://example.com/sp500.json",
        app.blobs.as_ref(),
        app.pointer.as_ref(),
        &fetcher,
    )
    .await
    .unwrap();

    let (status, cache_control, body) = get(&app.router, "/api/dataset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some("public, max-age=60"));
    assert_eq!(body["data"], json!({"a": 1, "b": 2}));
    assert_eq!(
        body["metadata"]["checksum"],
        "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777"
    );
    assert_eq!(body["metadata"]["key"], metadata.key);
    assert_eq!(body["metadata"]["contentType"], "application/json");
}

#[tokio::test]
async fn dataset_dangling_pointer_is_not_found() {
    let app = test_app();
    let fetcher = StaticFetcher::new(200, r#"{"a":1}"#);
    let metadata = ingest(
        "https://example.com/sp500.json",
        app.blobs.as_ref(),
        app.pointer.as_ref(),
        &fetcher,
    )
    .await
    .unwrap();
    app.blobs.remove(&metadata.key);

    let (status, _, _) = get(&app.router, "/api/dataset").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dataset_storage_outage_is_server_error() {
    let app = test_app();
    app.pointer.fail_reads(true);

    let (status, cache_control, body) = get(&app.router, "/api/dataset").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(cache_control.is_none());
    assert_eq!(body["error"], "STORAGE_ERROR");
}

#[tokio::test]
async fn dataset_corrupt_pointer_is_server_error() {
    let app = test_app();
    app.pointer.insert_raw(LATEST_DATASET_KEY, "{");

    let (status, _, _) = get(&app.router, "/api/dataset").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn dataset_served_from_filesystem_stores() {
    let dir = TempDir::new().unwrap();
    let blobs = Arc::new(FsBlobStore::new(dir.path().join("blobs")));
    let pointer = Arc::new(FsPointerStore::new(dir.path().join("meta")));
    let fetcher = StaticFetcher::new(200, r#"[{"date":"2024-01-02","value":4742.83}]"#);
    ingest("https://example.com/sp500.json", blobs.as_ref(), pointer.as_ref(), &fetcher)
        .await
        .unwrap();

    let router = create_router(AppState::new(blobs, pointer));
    let (status, _, body) = get(&router, "/api/dataset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["value"], 4742.83);
}

#[tokio::test]
async fn metadata_reports_bundled_dataset() {
    let app = test_app();

    let (status, _, body) = get(&app.router, "/api/metadata").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastUpdated"], "2024-12-31");
    assert_eq!(body["source"], "MacroTrends S&P 500 Historical Data");
}

#[tokio::test]
async fn market_data_returns_sorted_rows() {
    let app = test_app();

    let (status, _, body) = get(&app.router, "/api/market-data").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 35);
    assert_eq!(rows[0]["date"], "1990-12-31");
    assert_eq!(rows[34]["date"], "2024-12-31");
    assert_eq!(body["metadata"]["lastUpdated"], "2024-12-31");
}

#[tokio::test]
async fn health_reports_metrics() {
    let app = test_app();

    let (status, _, body) = get(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ingest"]["runs_attempted"], 0);
    assert!(body["lastPublished"].is_null());
    assert_eq!(body["localDatasetFallbacks"], 0);
}
