//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Single
//! statement methods accept any `SqliteExecutor`, so they run the same against
//! `&DbPool` or inside a transaction (`&mut *tx`).

pub mod city_repo;
pub mod listing_repo;
pub mod publication_repo;

pub use city_repo::CityRepo;
pub use listing_repo::ListingRepo;
pub use publication_repo::PublicationRepo;
