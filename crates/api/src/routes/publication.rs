//! Route definitions for publication URLs addressed by their own id.

use axum::routing::put;
use axum::Router;

use crate::handlers::publication;
use crate::state::AppState;

/// Routes mounted at `/publications`.
///
/// ```text
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(publication::update).delete(publication::delete),
    )
}
