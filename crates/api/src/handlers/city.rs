//! Handlers for the `/cities` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use maison_core::types::DbId;
use maison_db::models::city::{City, CityName};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/cities
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CityName>,
) -> AppResult<(StatusCode, Json<City>)> {
    let city = state.cities.create_city(&input.name).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

/// GET /api/v1/cities
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<City>>> {
    let cities = state.cities.list_cities().await?;
    Ok(Json(cities))
}

/// GET /api/v1/cities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<City>> {
    let city = state.cities.get_city(id).await?;
    Ok(Json(city))
}

/// PUT /api/v1/cities/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CityName>,
) -> AppResult<Json<City>> {
    let city = state.cities.update_city(id, &input.name).await?;
    Ok(Json(city))
}

/// DELETE /api/v1/cities/{id}
///
/// Refused with 409 while any listing references the city.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.cities.delete_city(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
