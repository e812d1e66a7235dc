//! Route definitions for the `/listings` resource and its nested
//! publications and files.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{files, listing, publication};
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{id}/publications                 -> list_by_listing
/// POST   /{id}/publications                 -> create
/// PUT    /{id}/publications                 -> replace_all
///
/// GET    /{id}/photos                       -> list_photos
/// GET    /{id}/photos/{filename}            -> download_photo
/// GET    /{id}/attachments                  -> list_attachments
/// GET    /{id}/attachments/{filename}       -> download_attachment
/// POST   /{id}/files                        -> upload
/// DELETE /{id}/files/{filename}             -> delete
/// PUT    /{id}/main-photo                   -> set_main_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listing::list).post(listing::create))
        .route(
            "/{id}",
            get(listing::get_by_id)
                .put(listing::update)
                .delete(listing::delete),
        )
        .route(
            "/{id}/publications",
            get(publication::list_by_listing)
                .post(publication::create)
                .put(publication::replace_all),
        )
        .route("/{id}/photos", get(files::list_photos))
        .route("/{id}/photos/{filename}", get(files::download_photo))
        .route("/{id}/attachments", get(files::list_attachments))
        .route(
            "/{id}/attachments/{filename}",
            get(files::download_attachment),
        )
        .route("/{id}/files", post(files::upload))
        .route("/{id}/files/{filename}", delete(files::delete))
        .route("/{id}/main-photo", put(files::set_main_photo))
}
