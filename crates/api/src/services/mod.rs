//! Services coordinating repositories and the upload tree.
//!
//! Held in [`AppState`](crate::state::AppState) as `Arc`s. Methods return
//! [`CoreError`](maison_core::error::CoreError) so callers other than HTTP
//! handlers can match on the error kind.

pub mod city;
pub mod listing;

pub use city::CityManager;
pub use listing::{ListingDetails, ListingManager, StoredFile};
