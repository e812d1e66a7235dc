pub mod city;
pub mod health;
pub mod listing;
pub mod publication;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /listings                                        list, create
/// /listings/{id}                                   details, update, delete
/// /listings/{id}/publications                      list, add one, replace all
/// /listings/{id}/photos                            photo names
/// /listings/{id}/photos/{filename}                 download a photo
/// /listings/{id}/attachments                       attachment names
/// /listings/{id}/attachments/{filename}            download an attachment
/// /listings/{id}/files                             multipart upload (POST)
/// /listings/{id}/files/{filename}                  delete a file
/// /listings/{id}/main-photo                        set main photo (PUT)
///
/// /publications/{id}                               update, delete
///
/// /cities                                          list, create
/// /cities/{id}                                     get, rename, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/listings", listing::router())
        .nest("/publications", publication::router())
        .nest("/cities", city::router())
}
