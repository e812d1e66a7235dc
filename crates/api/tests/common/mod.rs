#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use maison_api::config::{ServerConfig, UploadConfig, DEFAULT_MAX_UPLOAD_BYTES};
use maison_api::router::build_app_router;
use maison_api::state::AppState;

const MULTIPART_BOUNDARY: &str = "maison-test-boundary";

/// Build a test `ServerConfig` with safe defaults and the given upload root.
pub fn test_config(uploads_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:8910".to_string()],
        request_timeout_secs: 30,
        uploads: UploadConfig {
            root: uploads_root.to_path_buf(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and upload root.
///
/// Goes through [`build_app_router`] so tests exercise the same middleware
/// stack as the binary.
pub fn build_test_app(pool: SqlitePool, uploads_root: &Path) -> Router {
    let config = test_config(uploads_root);
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body).await
}

async fn json_request(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// POST a multipart form with one `file` part per `(filename, bytes)` pair.
pub async fn post_files(app: Router, uri: &str, files: &[(&str, &[u8])]) -> Response {
    let mut body = Vec::new();
    for (filename, data) in files {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a city through the API and return its id.
pub async fn create_city(pool: &SqlitePool, uploads_root: &Path, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone(), uploads_root),
        "/api/v1/cities",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// A complete listing body with two valid publications.
pub fn listing_body(city_id: i64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "city_id": city_id,
        "address": "12 chemin des Pins",
        "price": 450000,
        "surface": 180,
        "rooms": 6,
        "bedrooms": 4,
        "bathrooms": 2,
        "floors": 2,
        "construction_year": 1998,
        "house_type": "villa",
        "land_surface": 900,
        "has_garage": true,
        "outdoor_parking_spaces": 2,
        "notes": "Vue mer",
        "publications": [
            { "url": "http://a", "date": "2024-01-10" },
            { "url": "http://b", "date": "2024-02-01" }
        ]
    })
}
