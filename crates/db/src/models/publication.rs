//! Publication URL entity model.

use chrono::NaiveDate;
use maison_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `publication_urls` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PublicationUrl {
    pub id: DbId,
    pub listing_id: DbId,
    pub url: String,
    pub publication_date: NaiveDate,
}
