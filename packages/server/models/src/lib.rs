#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the flood map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the internal evaluation types to allow independent evolution of
//! the API contract.

use flood_map_hazard::HazardZone;
use flood_map_risk_models::RiskLevel;
use flood_map_routing::EvaluatedRoute;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Query parameters for the route endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQueryParams {
    /// Origin: `"lat,lng"` shorthand or a known town name.
    pub origin: String,
    /// Destination: `"lat,lng"` shorthand or a known town name.
    pub destination: String,
    /// Travel mode (`DRIVE`, `WALK`, `TWO_WHEELER`); defaults to `DRIVE`.
    /// The hyphenated spelling `TWO-WHEELER` is accepted.
    pub travel_mode: Option<String>,
}

/// One route in an API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    /// Encoded polyline for the rendering client.
    pub polyline: String,
    /// Route distance in meters.
    pub distance_m: u32,
    /// Estimated travel time in seconds.
    pub duration_s: u32,
    /// Number of hazard zones this route passes through.
    pub hazard_count: u32,
}

impl From<EvaluatedRoute> for ApiRoute {
    fn from(route: EvaluatedRoute) -> Self {
        Self {
            polyline: route.candidate.polyline,
            distance_m: route.candidate.distance_m,
            duration_s: route.candidate.duration_s,
            hazard_count: route.exposure.zone_count,
        }
    }
}

/// One hazard zone in an API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHazard {
    /// Zone identifier.
    pub id: i64,
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lng: f64,
    /// Categorical risk level.
    pub risk_level: RiskLevel,
    /// Zone radius in meters.
    pub radius_m: u32,
}

impl From<HazardZone> for ApiHazard {
    fn from(zone: HazardZone) -> Self {
        Self {
            id: zone.id,
            lat: zone.center.latitude,
            lng: zone.center.longitude,
            risk_level: zone.risk_level,
            radius_m: zone.radius_m,
        }
    }
}

/// Route query response.
///
/// A success response always carries `bestRoute`; failures are reported
/// with an error body instead, never a partial success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// The safest viable route.
    pub best_route: ApiRoute,
    /// Remaining candidates in rank order.
    pub alternatives: Vec<ApiRoute>,
    /// Hazard snapshot used for the evaluation.
    pub hazards: Vec<ApiHazard>,
}
