//! Handlers for a listing's uploaded photos and attachments.

use axum::extract::{Multipart, Path, State};
use axum::http::header::{self, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use maison_core::types::DbId;
use maison_core::upload::FileKind;
use maison_db::models::listing::Listing;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::StoredFile;
use crate::state::AppState;

/// Body of `PUT /listings/{id}/main-photo`.
#[derive(Debug, Deserialize)]
pub struct MainPhotoRequest {
    pub filename: String,
}

/// GET /api/v1/listings/{id}/photos
pub async fn list_photos(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<Vec<String>>> {
    let photos = state.listings.photos(listing_id).await?;
    Ok(Json(photos))
}

/// GET /api/v1/listings/{id}/attachments
pub async fn list_attachments(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<Vec<String>>> {
    let attachments = state.listings.attachments(listing_id).await?;
    Ok(Json(attachments))
}

/// POST /api/v1/listings/{id}/files
///
/// Accepts a multipart form with one or more `file` fields. Each file is
/// stored under a fresh name and routed to photos or attachments by its
/// extension. Other fields are ignored.
pub async fn upload(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Vec<StoredFile>>)> {
    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let file = state
            .listings
            .upload_file(listing_id, &filename, &data)
            .await?;
        stored.push(file);
    }

    if stored.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required 'file' field".into(),
        ));
    }
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/v1/listings/{id}/files/{filename}
pub async fn delete(
    State(state): State<AppState>,
    Path((listing_id, filename)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    state.listings.delete_file(listing_id, &filename).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/listings/{id}/main-photo
pub async fn set_main_photo(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<MainPhotoRequest>,
) -> AppResult<Json<Listing>> {
    state
        .listings
        .set_main_photo(listing_id, &input.filename)
        .await?;
    let listing = state.listings.get_listing(listing_id).await?;
    Ok(Json(listing))
}

/// GET /api/v1/listings/{id}/photos/{filename}
pub async fn download_photo(
    State(state): State<AppState>,
    Path((listing_id, filename)): Path<(DbId, String)>,
) -> AppResult<Response> {
    serve_file(&state, listing_id, FileKind::Photo, &filename).await
}

/// GET /api/v1/listings/{id}/attachments/{filename}
pub async fn download_attachment(
    State(state): State<AppState>,
    Path((listing_id, filename)): Path<(DbId, String)>,
) -> AppResult<Response> {
    serve_file(&state, listing_id, FileKind::Attachment, &filename).await
}

async fn serve_file(
    state: &AppState,
    listing_id: DbId,
    kind: FileKind,
    filename: &str,
) -> AppResult<Response> {
    let path = state.listings.file_path(listing_id, kind, filename).await?;
    let data = tokio::fs::read(&path)
        .await
        .map_err(maison_core::error::CoreError::from)?;

    let disposition = match kind {
        FileKind::Photo => "inline",
        FileKind::Attachment => "attachment",
    };
    // Stored names are sanitised to [A-Za-z0-9._-], so they are valid header text.
    let disposition = HeaderValue::from_str(&format!("{disposition}; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type_for_extension(filename)),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

fn content_type_for_extension(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
