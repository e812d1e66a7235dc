use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{CityManager, ListingManager};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: maison_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Listing lifecycle: rows, publication sets and upload subtrees.
    pub listings: Arc<ListingManager>,
    /// City management with the in-use guard.
    pub cities: Arc<CityManager>,
}

impl AppState {
    /// Wire the services for a pool and configuration.
    pub fn new(pool: maison_db::DbPool, config: ServerConfig) -> Self {
        let listings = Arc::new(ListingManager::new(pool.clone(), &config.uploads));
        let cities = Arc::new(CityManager::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            listings,
            cities,
        }
    }
}
