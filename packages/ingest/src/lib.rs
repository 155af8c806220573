#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report ingestion and batch risk scoring.
//!
//! Validates the NLP collaborator's loosely-typed payloads into strict
//! analysis rows, and runs the per-report scoring pipeline. Each report
//! is processed independently: one failure never aborts its siblings,
//! so the external scheduler can retry individual reports with backoff.

pub mod nlp;
pub mod pipeline;

use thiserror::Error;

/// Errors that can occur during ingestion or batch scoring.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A collaborator payload failed boundary validation. Nothing is
    /// written for it.
    #[error("Invalid payload: {message}")]
    InvalidPayload {
        /// Description of what was malformed.
        message: String,
    },

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] flood_map_database::DbError),

    /// Gazetteer operation failed.
    #[error("Gazetteer error: {0}")]
    Geo(#[from] flood_map_geography::GeoError),

    /// Warning lookup or sync failed.
    #[error("Warning error: {0}")]
    Warning(#[from] flood_map_warnings::WarningError),

    /// Scoring failed.
    #[error("Scoring error: {0}")]
    Score(#[from] flood_map_scoring::ScoreError),
}

impl IngestError {
    /// Shorthand for an [`IngestError::InvalidPayload`].
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }
}
