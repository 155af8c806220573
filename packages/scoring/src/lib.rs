#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk score fusion and persistence.
//!
//! Fuses a text-derived urgency signal with the official warning severity
//! into a single deterministic score and categorical level per report.
//! The numeric computation is a pure function; persistence is an
//! idempotent per-report upsert.

pub mod recommendation;
pub mod score;
pub mod scorer;

pub use score::{RiskScore, ScoringPolicy, compute_risk, compute_risk_raw};
pub use scorer::RiskScorer;

use flood_map_risk_models::{InvalidUrgencyError, InvalidWarningLevelError};

/// Errors that can occur while scoring a report.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// Urgency input outside 1-10. Rejected before any write.
    #[error("Invalid input: {0}")]
    InvalidUrgency(#[from] InvalidUrgencyError),

    /// Warning level input outside 0-4. Rejected before any write.
    #[error("Invalid input: {0}")]
    InvalidWarningLevel(#[from] InvalidWarningLevelError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] flood_map_database::DbError),
}
