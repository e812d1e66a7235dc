//! HTTP-level integration tests for the listing, publication and file
//! endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, build_test_app, create_city, delete, get, listing_body, post_files,
    post_json, put_json,
};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Listing CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_listing_returns_201_with_details(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Biarritz").await;

    let response = post_json(
        build_test_app(pool, uploads.path()),
        "/api/v1/listings",
        listing_body(city_id, "Villa"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let id = json["id"].as_i64().unwrap();
    assert_eq!(json["title"], "Villa");
    assert_eq!(json["city_name"], "Biarritz");
    assert_eq!(json["has_garage"], true);
    assert_eq!(json["main_photo"], serde_json::Value::Null);
    assert_eq!(json["publications"].as_array().unwrap().len(), 2);
    assert_eq!(json["publications"][0]["publication_date"], "2024-01-10");
    assert_eq!(json["photos"], serde_json::json!([]));
    assert_eq!(json["attachments"], serde_json::json!([]));

    assert!(uploads.path().join(id.to_string()).join("photos").is_dir());
    assert!(uploads.path().join(id.to_string()).join("attachments").is_dir());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_listing_validation_errors(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Pau").await;

    let mut no_publications = listing_body(city_id, "Sans annonce");
    no_publications["publications"] = serde_json::json!([]);
    let response = post_json(
        build_test_app(pool.clone(), uploads.path()),
        "/api/v1/listings",
        no_publications,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "CONSTRAINT_VIOLATION");

    let mut bad_dates = listing_body(city_id, "Dates invalides");
    bad_dates["publications"] = serde_json::json!([{ "url": "http://a", "date": "10/01/2024" }]);
    let response = post_json(
        build_test_app(pool.clone(), uploads.path()),
        "/api/v1/listings",
        bad_dates,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "PARSE_ERROR");

    let response = post_json(
        build_test_app(pool.clone(), uploads.path()),
        "/api/v1/listings",
        listing_body(city_id, "  "),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = get(build_test_app(pool, uploads.path()), "/api/v1/listings").await;
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_listing_without_upload_directories_returns_500(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Tarbes").await;
    let not_a_dir = tempfile::NamedTempFile::new().unwrap();

    let response = post_json(
        build_test_app(pool.clone(), not_a_dir.path()),
        "/api/v1/listings",
        listing_body(city_id, "Orpheline"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    // The row was committed regardless.
    let response = get(build_test_app(pool, uploads.path()), "/api/v1/listings").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "Orpheline");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_listing_replaces_publications(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Lourdes").await;
    let created = body_json(
        post_json(
            build_test_app(pool.clone(), uploads.path()),
            "/api/v1/listings",
            listing_body(city_id, "Maison"),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let mut body = listing_body(city_id, "Maison rénovée");
    body["price"] = serde_json::json!(199000);
    body["publications"] = serde_json::json!([
        { "url": "http://only", "date": "2024-03-03" },
        { "url": "", "date": "2024-03-04" }
    ]);
    let response = put_json(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Maison rénovée");
    assert_eq!(json["price"], 199000);
    let publications = json["publications"].as_array().unwrap();
    assert_eq!(publications.len(), 1);
    assert_eq!(publications[0]["url"], "http://only");

    let response = put_json(
        build_test_app(pool, uploads.path()),
        "/api/v1/listings/999999",
        listing_body(city_id, "Ghost"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_listing_ignores_main_photo_in_body(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Bayonne").await;
    let created = body_json(
        post_json(
            build_test_app(pool.clone(), uploads.path()),
            "/api/v1/listings",
            listing_body(city_id, "Maison basque"),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let stored = body_json(
        post_files(
            build_test_app(pool.clone(), uploads.path()),
            &format!("/api/v1/listings/{id}/files"),
            &[("facade.jpg", b"jpeg".as_slice())],
        )
        .await,
    )
    .await;
    let photo = stored[0]["name"].as_str().unwrap().to_string();

    let mut body = listing_body(city_id, "Maison basque rénovée");
    body["main_photo"] = serde_json::json!("other.jpg");
    let response = put_json(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Maison basque rénovée");
    assert_eq!(json["main_photo"], photo.as_str());

    let response = get(
        build_test_app(pool, uploads.path()),
        &format!("/api/v1/listings/{id}"),
    )
    .await;
    assert_eq!(body_json(response).await["main_photo"], photo.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_listing_returns_204_and_removes_everything(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Oloron").await;
    let created = body_json(
        post_json(
            build_test_app(pool.clone(), uploads.path()),
            "/api/v1/listings",
            listing_body(city_id, "Ferme"),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = delete(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!uploads.path().join(id.to_string()).exists());

    let response = get(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = get(
        build_test_app(pool, uploads.path()),
        &format!("/api/v1/listings/{id}/publications"),
    )
    .await;
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Publications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publication_endpoints(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Mont-de-Marsan").await;
    let created = body_json(
        post_json(
            build_test_app(pool.clone(), uploads.path()),
            "/api/v1/listings",
            listing_body(city_id, "Airial"),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/publications"),
        serde_json::json!({ "url": "http://c", "date": "2024-05-05" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let added = body_json(response).await;
    let pub_id = added["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/publications"),
        serde_json::json!({ "url": "http://d", "date": "2024-5-5" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/publications/{pub_id}"),
        serde_json::json!({ "url": "http://c2", "date": "2024-06-06" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["url"], "http://c2");

    let response = delete(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/publications/{pub_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = put_json(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/publications"),
        serde_json::json!([
            { "url": "http://x", "date": "2024-07-01" },
            { "url": "http://y", "date": "garbage" }
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let replaced = body_json(response).await;
    assert_eq!(replaced.as_array().unwrap().len(), 1);
    assert_eq!(replaced[0]["url"], "http://x");

    let response = get(
        build_test_app(pool, uploads.path()),
        &format!("/api/v1/listings/{id}/publications"),
    )
    .await;
    let all = body_json(response).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_list_download_and_delete_files(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Hendaye").await;
    let created = body_json(
        post_json(
            build_test_app(pool.clone(), uploads.path()),
            "/api/v1/listings",
            listing_body(city_id, "Villa basque"),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = post_files(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/files"),
        &[("facade.jpg", b"jpeg-bytes".as_slice()), ("diagnostic.pdf", b"%PDF-1.4".as_slice())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let stored = body_json(response).await;
    assert_eq!(stored[0]["kind"], "photo");
    assert_eq!(stored[0]["is_main_photo"], true);
    assert_eq!(stored[1]["kind"], "attachment");
    let photo = stored[0]["name"].as_str().unwrap().to_string();
    let attachment = stored[1]["name"].as_str().unwrap().to_string();

    let response = get(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/photos"),
    )
    .await;
    assert_eq!(body_json(response).await, serde_json::json!([photo]));

    let response = get(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/attachments"),
    )
    .await;
    assert_eq!(body_json(response).await, serde_json::json!([attachment]));

    let response = get(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/photos/{photo}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(body_bytes(response).await, b"jpeg-bytes");

    // A photo is not downloadable through the attachments route.
    let response = get(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/attachments/{photo}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}"),
    )
    .await;
    assert_eq!(body_json(response).await["main_photo"], photo.as_str());

    let response = delete(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/files/{photo}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["main_photo"], serde_json::Value::Null);
    assert_eq!(json["photos"], serde_json::json!([]));

    let response = delete(
        build_test_app(pool, uploads.path()),
        &format!("/api/v1/listings/{id}/files/{photo}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_main_photo(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();
    let city_id = create_city(&pool, uploads.path(), "Saint-Jean-de-Luz").await;
    let created = body_json(
        post_json(
            build_test_app(pool.clone(), uploads.path()),
            "/api/v1/listings",
            listing_body(city_id, "Etxe"),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let stored = body_json(
        post_files(
            build_test_app(pool.clone(), uploads.path()),
            &format!("/api/v1/listings/{id}/files"),
            &[
                ("a.png", b"1".as_slice()),
                ("b.png", b"2".as_slice()),
                ("bail.pdf", b"3".as_slice()),
            ],
        )
        .await,
    )
    .await;
    let second = stored[1]["name"].as_str().unwrap().to_string();
    let pdf = stored[2]["name"].as_str().unwrap().to_string();

    let response = put_json(
        build_test_app(pool.clone(), uploads.path()),
        &format!("/api/v1/listings/{id}/main-photo"),
        serde_json::json!({ "filename": second }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["main_photo"], second.as_str());

    let response = put_json(
        build_test_app(pool, uploads.path()),
        &format!("/api/v1/listings/{id}/main-photo"),
        serde_json::json!({ "filename": pdf }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_errors(pool: SqlitePool) {
    let uploads = tempfile::tempdir().unwrap();

    let response = post_files(
        build_test_app(pool.clone(), uploads.path()),
        "/api/v1/listings/4242/files",
        &[("a.jpg", b"1".as_slice())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let city_id = create_city(&pool, uploads.path(), "Anglet").await;
    let created = body_json(
        post_json(
            build_test_app(pool.clone(), uploads.path()),
            "/api/v1/listings",
            listing_body(city_id, "Maison"),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = post_files(
        build_test_app(pool, uploads.path()),
        &format!("/api/v1/listings/{id}/files"),
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
