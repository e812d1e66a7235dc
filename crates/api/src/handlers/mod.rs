//! Request handlers for the listing service.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the services held in [`AppState`](crate::state::AppState)
//! and map errors via [`AppError`](crate::error::AppError).

pub mod city;
pub mod files;
pub mod listing;
pub mod publication;
