#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route candidate and exposure types.
//!
//! Candidates are externally supplied by the routing provider and live
//! for a single evaluation request. Exposure is the lexicographic
//! measure used to rank them against the hazard snapshot.

use flood_map_geography_models::Coordinate;
use flood_map_risk_models::RiskLevel;
use serde::{Deserialize, Serialize};

/// One candidate route from the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCandidate {
    /// Encoded polyline as received from the provider, passed through to
    /// the rendering client unchanged.
    pub polyline: String,
    /// Decoded polyline vertices.
    pub points: Vec<Coordinate>,
    /// Total route distance in meters.
    pub distance_m: u32,
    /// Estimated travel time in seconds.
    pub duration_s: u32,
}

/// A route's aggregate intersection with the hazard snapshot.
///
/// Ordered lexicographically: fewer intersecting zones always wins, and
/// summed risk weight breaks ties among equal counts. The derived `Ord`
/// relies on the field order below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exposure {
    /// Number of hazard zones the route passes through.
    pub zone_count: u32,
    /// Sum of the intersecting zones' risk weights.
    pub weight_sum: u32,
}

impl Exposure {
    /// Records one intersecting zone.
    pub fn add(&mut self, level: RiskLevel) {
        self.zone_count += 1;
        self.weight_sum += u32::from(level.weight());
    }

    /// Whether the route intersects no zones at all.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.zone_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_zones_dominates_severity() {
        // One critical zone still beats two low zones.
        let one_critical = Exposure {
            zone_count: 1,
            weight_sum: 4,
        };
        let two_low = Exposure {
            zone_count: 2,
            weight_sum: 2,
        };
        assert!(one_critical < two_low);
    }

    #[test]
    fn severity_breaks_ties_among_equal_counts() {
        let low = Exposure {
            zone_count: 1,
            weight_sum: 1,
        };
        let critical = Exposure {
            zone_count: 1,
            weight_sum: 4,
        };
        assert!(low < critical);
    }

    #[test]
    fn accumulates_counts_and_weights() {
        let mut exposure = Exposure::default();
        exposure.add(RiskLevel::Low);
        exposure.add(RiskLevel::Critical);
        assert_eq!(exposure.zone_count, 2);
        assert_eq!(exposure.weight_sum, 5);
        assert!(!exposure.is_zero());
    }
}
