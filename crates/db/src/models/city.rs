//! City entity model and DTOs.

use maison_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A city row, with the derived in-use flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub name: String,
    /// True iff at least one listing references this city.
    pub is_used: bool,
}

/// DTO for creating or renaming a city.
#[derive(Debug, Clone, Deserialize)]
pub struct CityName {
    pub name: String,
}
