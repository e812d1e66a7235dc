//! Domain logic for the listing service.
//!
//! Nothing in this crate touches the database. Persistence lives in
//! `maison_db`; orchestration of store and upload tree lives in `maison_api`.

pub mod error;
pub mod listing;
pub mod naming;
pub mod publication;
pub mod types;
pub mod upload;
pub mod upload_tree;
