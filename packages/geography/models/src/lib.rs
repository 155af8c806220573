#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative unit and resolved-location types.
//!
//! The State > District > Town hierarchy mirrors the national gazetteer
//! tables. Towns carry coordinates; districts and states resolve to
//! centroids computed from their towns.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the pair is within valid WGS84 bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A state row as stored in the gazetteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Stable state identifier.
    pub id: String,
    /// Human-readable state name.
    pub name: String,
}

/// A district row as stored in the gazetteer.
///
/// Deleting a state cascades to its districts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    /// Stable district identifier.
    pub id: String,
    /// Human-readable district name.
    pub name: String,
    /// Owning state.
    pub state_id: String,
}

/// A town row as stored in the gazetteer.
///
/// Deleting a district nulls (not deletes) its towns, so both parent
/// references are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Town {
    /// Stable town identifier.
    pub id: String,
    /// Human-readable town name.
    pub name: String,
    /// Latitude in decimal degrees, if surveyed.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if surveyed.
    pub longitude: Option<f64>,
    /// Owning state, if still linked.
    pub state_id: Option<String>,
    /// Owning district, if still linked.
    pub district_id: Option<String>,
}

/// How precisely a free-text place mention was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationPrecision {
    /// Matched a town by name; exact surveyed coordinates.
    Town,
    /// Matched a district; centroid of the district's towns.
    District,
    /// Matched only a state; centroid of the state's towns.
    StateCentroid,
}

/// A successfully resolved place mention.
///
/// Unresolved mentions are represented as `Option::None` by the resolver,
/// not as an error: callers exclude them from the hazard index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    /// Resolved coordinate.
    pub coordinate: Coordinate,
    /// Precision tier of the match.
    pub precision: LocationPrecision,
    /// Matched town, when precision is [`LocationPrecision::Town`].
    pub town_id: Option<String>,
    /// District the match belongs to, when known. Drives the warning
    /// severity lookup.
    pub district_id: Option<String>,
    /// State the match belongs to, when known.
    pub state_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_coordinate_bounds() {
        assert!(Coordinate::new(3.139, 101.686).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -181.0).is_valid());
    }
}
