//! Repository for the `listings` table.

use maison_core::types::DbId;
use sqlx::SqliteExecutor;

use crate::models::listing::{Listing, ListingFields};

/// Column list shared across queries, joined with the city name.
const COLUMNS: &str = "l.id, l.title, l.city_id, c.name AS city_name, l.address, \
    l.price, l.surface, l.rooms, l.bedrooms, l.bathrooms, l.floors, \
    l.construction_year, l.house_type, l.land_surface, l.has_garage, \
    l.outdoor_parking_spaces, l.main_photo, l.notes, l.created_at, l.updated_at";

const FROM: &str = "FROM listings l JOIN cities c ON c.id = l.city_id";

/// Provides CRUD operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing, returning its ID. `main_photo` starts empty.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        input: &ListingFields,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO listings (title, city_id, address, price, surface, rooms, \
                bedrooms, bathrooms, floors, construction_year, house_type, \
                land_surface, has_garage, outdoor_parking_spaces, notes) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING id",
        )
        .bind(&input.title)
        .bind(input.city_id)
        .bind(&input.address)
        .bind(input.price)
        .bind(input.surface)
        .bind(input.rooms)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.floors)
        .bind(input.construction_year)
        .bind(&input.house_type)
        .bind(input.land_surface)
        .bind(input.has_garage)
        .bind(input.outdoor_parking_spaces)
        .bind(&input.notes)
        .fetch_one(executor)
        .await
    }

    /// Find a listing by ID.
    pub async fn find_by_id<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE l.id = ?");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all listings, most recently created first.
    pub async fn list<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} ORDER BY l.created_at DESC, l.id DESC");
        sqlx::query_as::<_, Listing>(&query).fetch_all(executor).await
    }

    /// Whether a listing with this ID exists.
    pub async fn exists<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM listings WHERE id = ?)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Replace every mutable field of a listing. `main_photo`, `id` and
    /// `created_at` are left untouched.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        input: &ListingFields,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET \
                title = ?, city_id = ?, address = ?, price = ?, surface = ?, \
                rooms = ?, bedrooms = ?, bathrooms = ?, floors = ?, \
                construction_year = ?, house_type = ?, land_surface = ?, \
                has_garage = ?, outdoor_parking_spaces = ?, notes = ?, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(input.city_id)
        .bind(&input.address)
        .bind(input.price)
        .bind(input.surface)
        .bind(input.rooms)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.floors)
        .bind(input.construction_year)
        .bind(&input.house_type)
        .bind(input.land_surface)
        .bind(input.has_garage)
        .bind(input.outdoor_parking_spaces)
        .bind(&input.notes)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear the main photo. Returns `false` if the listing is absent.
    pub async fn set_main_photo<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        main_photo: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE listings SET main_photo = ? WHERE id = ?")
            .bind(main_photo)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the main photo only if none is set yet. Returns `true` if it was set.
    pub async fn set_main_photo_if_unset<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        main_photo: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET main_photo = ? WHERE id = ? AND main_photo IS NULL",
        )
        .bind(main_photo)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the main photo if it currently names `filename`.
    pub async fn clear_main_photo_if<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        filename: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET main_photo = NULL WHERE id = ? AND main_photo = ?",
        )
        .bind(id)
        .bind(filename)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a listing row. Returns `true` if a row was removed.
    pub async fn delete<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
