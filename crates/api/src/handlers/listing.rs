//! Handlers for the `/listings` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use maison_core::error::CoreError;
use maison_core::listing::Outcome;
use maison_core::publication::PublicationSubmission;
use maison_core::types::DbId;
use maison_db::models::listing::{Listing, ListingFields};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::ListingDetails;
use crate::state::AppState;

/// Body of a listing create or update: the listing fields plus the full
/// publication set.
#[derive(Debug, Deserialize)]
pub struct ListingRequest {
    #[serde(flatten)]
    pub fields: ListingFields,
    #[serde(default)]
    pub publications: Vec<PublicationSubmission>,
}

/// POST /api/v1/listings
///
/// Answers 500 when the row was committed but its upload directories could
/// not be provisioned; the listing then exists without a file subtree.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ListingRequest>,
) -> AppResult<(StatusCode, Json<ListingDetails>)> {
    let created = state
        .listings
        .create_listing(&input.fields, &input.publications)
        .await?;

    if let Outcome::PartiallyFailed { cause } = created.outcome {
        return Err(CoreError::Filesystem(format!(
            "listing {} created without upload directories: {cause}",
            created.id
        ))
        .into());
    }

    let details = state.listings.listing_details(created.id).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/v1/listings
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Listing>>> {
    let listings = state.listings.list_listings().await?;
    Ok(Json(listings))
}

/// GET /api/v1/listings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ListingDetails>> {
    let details = state.listings.listing_details(id).await?;
    Ok(Json(details))
}

/// PUT /api/v1/listings/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ListingRequest>,
) -> AppResult<Json<ListingDetails>> {
    state
        .listings
        .update_listing(id, &input.fields, &input.publications)
        .await?;
    let details = state.listings.listing_details(id).await?;
    Ok(Json(details))
}

/// DELETE /api/v1/listings/{id}
///
/// The row is gone once this returns; a leftover upload subtree is only
/// logged.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.listings.delete_listing(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
