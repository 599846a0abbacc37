//! Tests for the HTTP metadata client against a local stand-in service.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use cog_client::{ClientConfig, HttpMetadataClient, MetadataSource};
use cog_common::ViewerError;

const SINGLE_BAND_INFO: &str = r#"{
    "bounds": [0.0, 0.0, 10.0, 10.0],
    "crs": "http://www.opengis.net/def/crs/EPSG/0/4326",
    "band_descriptions": [["b1", "elevation"]],
    "dtype": "float32",
    "driver": "GTiff",
    "count": 1,
    "width": 100,
    "height": 100
}"#;

async fn info(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("url").map(String::as_str) {
        Some("https://x/test.tif") => (StatusCode::OK, SINGLE_BAND_INFO.to_string()),
        Some("https://x/garbage.tif") => (StatusCode::OK, "not json".to_string()),
        Some("https://x/slow.tif") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, SINGLE_BAND_INFO.to_string())
        }
        _ => (
            StatusCode::NOT_FOUND,
            r#"{"detail": "File not found"}"#.to_string(),
        ),
    }
}

async fn spawn_service() -> String {
    let app = Router::new().route("/cog/info", get(info));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String) -> HttpMetadataClient {
    HttpMetadataClient::new(ClientConfig {
        base_url,
        request_timeout: Duration::from_millis(500),
        connect_timeout: Duration::from_millis(500),
    })
    .unwrap()
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_fetch_info_success() {
    let client = client(spawn_service().await);

    let metadata = client.fetch_info("https://x/test.tif").await.unwrap();
    assert_eq!(metadata.count, 1);
    assert_eq!(metadata.width, 100);
    assert_eq!(metadata.band_descriptions[0].description(), Some("elevation"));
    assert_eq!(metadata.crs_code_label(), Some("4326"));
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_fetch_info_service_error_carries_detail() {
    let client = client(spawn_service().await);

    let err = client.fetch_info("/missing.tif").await.unwrap_err();
    match err {
        ViewerError::ServiceStatus { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "File not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_info_malformed_body() {
    let client = client(spawn_service().await);

    let err = client.fetch_info("https://x/garbage.tif").await.unwrap_err();
    assert!(matches!(err, ViewerError::MalformedMetadata(_)));
    assert!(err.is_metadata_failure());
}

#[tokio::test]
async fn test_fetch_info_timeout() {
    let client = client(spawn_service().await);

    let err = client.fetch_info("https://x/slow.tif").await.unwrap_err();
    assert!(matches!(err, ViewerError::Timeout));
}

#[tokio::test]
async fn test_fetch_info_connection_refused() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{}", addr));
    let err = client.fetch_info("https://x/test.tif").await.unwrap_err();
    assert!(err.is_metadata_failure());
}
