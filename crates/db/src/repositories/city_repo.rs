//! Repository for the `cities` table.

use maison_core::types::DbId;
use sqlx::SqliteExecutor;

use crate::models::city::City;

/// Column list with the derived `is_used` flag.
const COLUMNS: &str = "c.id, c.name, \
    EXISTS (SELECT 1 FROM listings l WHERE l.city_id = c.id) AS is_used";

/// Provides CRUD operations for cities.
pub struct CityRepo;

impl CityRepo {
    /// List all cities ordered by name.
    pub async fn list<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<City>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cities c ORDER BY c.name COLLATE NOCASE, c.id");
        sqlx::query_as::<_, City>(&query).fetch_all(executor).await
    }

    /// Find a city by ID.
    pub async fn find_by_id<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<Option<City>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cities c WHERE c.id = ?");
        sqlx::query_as::<_, City>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a new city, returning its ID.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        name: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("INSERT INTO cities (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(executor)
            .await
    }

    /// Rename a city. Returns `true` if a row was updated.
    pub async fn update<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cities SET name = ?, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
             WHERE id = ?",
        )
        .bind(name)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of listings referencing a city.
    pub async fn count_listings<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings WHERE city_id = ?")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Delete a city by ID. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while listings still reference it.
    pub async fn delete<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
