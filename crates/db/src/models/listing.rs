//! Listing entity model and DTOs.

use maison_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A listing row joined with its city name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub title: String,
    pub city_id: DbId,
    pub city_name: String,
    pub address: Option<String>,
    pub price: i64,
    pub surface: i64,
    pub rooms: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub floors: i64,
    pub construction_year: Option<i64>,
    pub house_type: String,
    pub land_surface: Option<i64>,
    pub has_garage: Option<bool>,
    pub outdoor_parking_spaces: Option<i64>,
    /// File name inside this listing's photo directory.
    pub main_photo: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The mutable fields of a listing, used for both insert and full-replace
/// update. No `main_photo`: only the photo operations change it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFields {
    pub title: String,
    pub city_id: DbId,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub surface: i64,
    #[serde(default)]
    pub rooms: i64,
    #[serde(default)]
    pub bedrooms: i64,
    #[serde(default)]
    pub bathrooms: i64,
    #[serde(default)]
    pub floors: i64,
    #[serde(default)]
    pub construction_year: Option<i64>,
    #[serde(default)]
    pub house_type: String,
    #[serde(default)]
    pub land_surface: Option<i64>,
    #[serde(default)]
    pub has_garage: Option<bool>,
    #[serde(default)]
    pub outdoor_parking_spaces: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}
