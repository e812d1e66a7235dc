//! Repository for the `publication_urls` table.

use maison_core::publication::PublicationEntry;
use maison_core::types::DbId;
use sqlx::{SqliteConnection, SqliteExecutor};

use crate::models::publication::PublicationUrl;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, listing_id, url, publication_date";

/// Provides CRUD operations for publication URLs.
pub struct PublicationRepo;

impl PublicationRepo {
    /// List a listing's publications, oldest date first.
    pub async fn list_for_listing<'e>(
        executor: impl SqliteExecutor<'e>,
        listing_id: DbId,
    ) -> Result<Vec<PublicationUrl>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM publication_urls \
             WHERE listing_id = ? ORDER BY publication_date, id"
        );
        sqlx::query_as::<_, PublicationUrl>(&query)
            .bind(listing_id)
            .fetch_all(executor)
            .await
    }

    /// Find a publication by ID.
    pub async fn find_by_id<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<Option<PublicationUrl>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publication_urls WHERE id = ?");
        sqlx::query_as::<_, PublicationUrl>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a publication for a listing, returning the created row.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        listing_id: DbId,
        entry: &PublicationEntry,
    ) -> Result<PublicationUrl, sqlx::Error> {
        let query = format!(
            "INSERT INTO publication_urls (listing_id, url, publication_date) \
             VALUES (?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublicationUrl>(&query)
            .bind(listing_id)
            .bind(&entry.url)
            .bind(entry.date)
            .fetch_one(executor)
            .await
    }

    /// Update one publication. Returns `None` if no row has this ID.
    pub async fn update<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        entry: &PublicationEntry,
    ) -> Result<Option<PublicationUrl>, sqlx::Error> {
        let query = format!(
            "UPDATE publication_urls SET url = ?, publication_date = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublicationUrl>(&query)
            .bind(&entry.url)
            .bind(entry.date)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Delete one publication. Returns `true` if a row was removed.
    pub async fn delete<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM publication_urls WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every publication of a listing. Returns the number removed.
    pub async fn delete_all_for_listing<'e>(
        executor: impl SqliteExecutor<'e>,
        listing_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM publication_urls WHERE listing_id = ?")
            .bind(listing_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Replace a listing's whole publication set on an open connection.
    ///
    /// Run this inside a transaction: the delete and the inserts must commit
    /// together.
    pub async fn replace_all(
        conn: &mut SqliteConnection,
        listing_id: DbId,
        entries: &[PublicationEntry],
    ) -> Result<Vec<PublicationUrl>, sqlx::Error> {
        Self::delete_all_for_listing(&mut *conn, listing_id).await?;

        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            created.push(Self::create(&mut *conn, listing_id, entry).await?);
        }
        Ok(created)
    }
}
