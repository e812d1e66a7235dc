//! Handlers for publication URLs, both listing-scoped and by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use maison_core::publication::PublicationSubmission;
use maison_core::types::DbId;
use maison_db::models::publication::PublicationUrl;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/listings/{listing_id}/publications
pub async fn list_by_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<Vec<PublicationUrl>>> {
    let publications = state.listings.publications(listing_id).await?;
    Ok(Json(publications))
}

/// POST /api/v1/listings/{listing_id}/publications
pub async fn create(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<PublicationSubmission>,
) -> AppResult<(StatusCode, Json<PublicationUrl>)> {
    let publication = state.listings.add_publication(listing_id, &input).await?;
    Ok((StatusCode::CREATED, Json(publication)))
}

/// PUT /api/v1/listings/{listing_id}/publications
///
/// Replaces the whole set. Invalid pairs are skipped as on create.
pub async fn replace_all(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<Vec<PublicationSubmission>>,
) -> AppResult<Json<Vec<PublicationUrl>>> {
    let publications = state
        .listings
        .replace_publications(listing_id, &input)
        .await?;
    Ok(Json(publications))
}

/// PUT /api/v1/publications/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PublicationSubmission>,
) -> AppResult<Json<PublicationUrl>> {
    let publication = state.listings.update_publication(id, &input).await?;
    Ok(Json(publication))
}

/// DELETE /api/v1/publications/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.listings.delete_publication(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
