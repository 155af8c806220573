#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Gazetteer loading and free-text location resolution.
//!
//! Loads the State > District > Town hierarchy from the database once at
//! startup and answers "where is this place mention" queries entirely
//! in memory. Resolution degrades gracefully: town match, then district
//! centroid, then state centroid, then unresolved.

pub mod gazetteer;
pub mod normalize;
pub mod queries;

pub use gazetteer::Gazetteer;

use thiserror::Error;

/// Errors that can occur during gazetteer operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),
}
