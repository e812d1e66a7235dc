//! City management.
//!
//! Plain passthroughs to the store, except delete: a city referenced by any
//! listing is refused, never cascaded.

use maison_core::error::CoreError;
use maison_core::types::DbId;
use maison_db::models::city::City;
use maison_db::repositories::CityRepo;
use maison_db::{classify_error, DbPool};

pub struct CityManager {
    pool: DbPool,
}

impl CityManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_cities(&self) -> Result<Vec<City>, CoreError> {
        CityRepo::list(&self.pool).await.map_err(classify_error)
    }

    pub async fn get_city(&self, id: DbId) -> Result<City, CoreError> {
        CityRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_error)?
            .ok_or(CoreError::NotFound { entity: "City", id })
    }

    pub async fn create_city(&self, name: &str) -> Result<City, CoreError> {
        let name = validate_name(name)?;
        let id = CityRepo::create(&self.pool, name)
            .await
            .map_err(classify_error)?;
        tracing::info!(city_id = id, name, "City created");
        self.get_city(id).await
    }

    pub async fn update_city(&self, id: DbId, name: &str) -> Result<City, CoreError> {
        let name = validate_name(name)?;
        let updated = CityRepo::update(&self.pool, id, name)
            .await
            .map_err(classify_error)?;
        if !updated {
            return Err(CoreError::NotFound { entity: "City", id });
        }
        self.get_city(id).await
    }

    /// Delete a city that no listing references.
    ///
    /// The usage count is checked first; the store's `ON DELETE RESTRICT`
    /// catches a listing inserted between the check and the delete.
    pub async fn delete_city(&self, id: DbId) -> Result<(), CoreError> {
        let in_use = CityRepo::count_listings(&self.pool, id)
            .await
            .map_err(classify_error)?;
        if in_use > 0 {
            tracing::info!(city_id = id, listings = in_use, "Refusing to delete city in use");
            return Err(CoreError::InUse { entity: "City", id });
        }

        let deleted = CityRepo::delete(&self.pool, id).await.map_err(|e| {
            if maison_db::error::is_foreign_key_violation(&e) {
                CoreError::InUse { entity: "City", id }
            } else {
                classify_error(e)
            }
        })?;
        if !deleted {
            return Err(CoreError::NotFound { entity: "City", id });
        }

        tracing::info!(city_id = id, "City deleted");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::ConstraintViolation("City name is required".into()));
    }
    Ok(name)
}
