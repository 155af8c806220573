#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Routing provider client and route safety evaluation.
//!
//! The provider returns candidate polylines for an origin/destination/
//! mode; path-finding stays external. This crate validates those
//! candidates at the boundary and ranks them against the current hazard
//! snapshot.

pub mod evaluator;
pub mod provider;

pub use evaluator::{EvaluatedRoute, RouteSelection, select_route};
pub use provider::{RoutesClient, RoutesConfig};

use thiserror::Error;

/// Errors that can occur while fetching or evaluating routes.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No usable candidate survived validation. Surfaced to the caller
    /// as "no route found".
    #[error("No routes available between the requested points")]
    NoRoutesAvailable,

    /// Provider request failed or timed out. Retryable.
    #[error("Routing provider error: {0}")]
    Provider(#[from] reqwest::Error),

    /// Provider configuration is missing.
    #[error("Routing provider API key not configured (GOOGLE_API_KEY)")]
    MissingApiKey,

    /// The provider response did not have the expected shape.
    #[error("Malformed routing provider response: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}
