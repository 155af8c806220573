#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hazard zone materialization.
//!
//! Projects recent risk assessments into geolocated circles for route
//! evaluation and client rendering. This is a pure read projection: each
//! call produces a fresh snapshot, performs no writes, and assessments
//! whose report location cannot be resolved are dropped (logged), never
//! surfaced as zero-coordinate hazards.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use flood_map_database::queries;
use flood_map_database_models::{AssessmentLocationRow, AssessmentWindow};
use flood_map_geography::Gazetteer;
use flood_map_geography_models::Coordinate;
use flood_map_risk_models::RiskLevel;
use serde::{Deserialize, Serialize};
use switchy_database::Database;

/// Errors that can occur while building the hazard snapshot.
#[derive(Debug, thiserror::Error)]
pub enum HazardError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] flood_map_database::DbError),
}

/// A geolocated hazard circle derived from one risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardZone {
    /// Assessment this zone was derived from.
    pub id: i64,
    /// Zone center.
    pub center: Coordinate,
    /// Categorical risk level.
    pub risk_level: RiskLevel,
    /// Zone radius in meters.
    pub radius_m: u32,
}

/// Hazard materialization policy: freshness window, zone cap, and the
/// per-level radius table.
///
/// The radii are operational policy (how far a report's influence is
/// assumed to reach), passed in at construction rather than baked into
/// the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardPolicy {
    /// How far back assessments count as "current".
    pub freshness: Duration,
    /// Cap on zones per snapshot, most recent first. Bounds the
    /// evaluator's cost on the request path.
    pub max_zones: u32,
    /// Radius for `Low` assessments, meters.
    pub radius_low_m: u32,
    /// Radius for `Moderate` assessments, meters.
    pub radius_moderate_m: u32,
    /// Radius for `High` assessments, meters.
    pub radius_high_m: u32,
    /// Radius for `Critical` assessments, meters.
    pub radius_critical_m: u32,
}

impl Default for HazardPolicy {
    fn default() -> Self {
        Self {
            freshness: Duration::hours(24),
            max_zones: 30,
            radius_low_m: 1_500,
            radius_moderate_m: 3_000,
            radius_high_m: 6_000,
            radius_critical_m: 10_000,
        }
    }
}

impl HazardPolicy {
    /// Returns the zone radius for a risk level, in meters.
    #[must_use]
    pub const fn radius_m(&self, level: RiskLevel) -> u32 {
        match level {
            RiskLevel::Low => self.radius_low_m,
            RiskLevel::Moderate => self.radius_moderate_m,
            RiskLevel::High => self.radius_high_m,
            RiskLevel::Critical => self.radius_critical_m,
        }
    }
}

/// Builds hazard snapshots from recent assessments.
pub struct HazardIndex {
    db: Arc<dyn Database>,
    gazetteer: Arc<Gazetteer>,
    policy: HazardPolicy,
}

impl HazardIndex {
    /// Creates a hazard index with the given materialization policy.
    #[must_use]
    pub fn new(db: Arc<dyn Database>, gazetteer: Arc<Gazetteer>, policy: HazardPolicy) -> Self {
        Self {
            db,
            gazetteer,
            policy,
        }
    }

    /// Returns the hazard zones current as of `as_of`.
    ///
    /// Output order is unspecified; consumers must not rely on it.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError`] if the assessment query fails.
    pub async fn current_hazards(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<HazardZone>, HazardError> {
        let window = AssessmentWindow {
            since: as_of - self.policy.freshness,
            until: as_of,
            limit: self.policy.max_zones,
        };

        let rows = queries::recent_assessments(self.db.as_ref(), &window).await?;
        Ok(build_zones(&self.gazetteer, &self.policy, rows))
    }
}

/// Resolves assessment rows into hazard zones, dropping unresolvable
/// ones.
#[must_use]
pub fn build_zones(
    gazetteer: &Gazetteer,
    policy: &HazardPolicy,
    rows: Vec<AssessmentLocationRow>,
) -> Vec<HazardZone> {
    let mut zones = Vec::with_capacity(rows.len());

    for row in rows {
        let resolved = gazetteer.resolve(
            row.extracted_state.as_deref(),
            row.extracted_city.as_deref(),
        );

        let Some(resolved) = resolved else {
            log::warn!(
                "Excluding assessment {} from hazard index: unresolved location ({:?}, {:?})",
                row.assessment_id,
                row.extracted_state,
                row.extracted_city
            );
            continue;
        };

        zones.push(HazardZone {
            id: row.assessment_id,
            center: resolved.coordinate,
            risk_level: row.risk_level,
            radius_m: policy.radius_m(row.risk_level),
        });
    }

    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_geography_models::{State, Town};

    fn gazetteer() -> Gazetteer {
        let states = vec![State {
            id: "st-sel".to_string(),
            name: "Selangor".to_string(),
        }];
        let towns = vec![Town {
            id: "t-sa".to_string(),
            name: "Shah Alam".to_string(),
            latitude: Some(3.0733),
            longitude: Some(101.5185),
            state_id: Some("st-sel".to_string()),
            district_id: Some("d-pet".to_string()),
        }];
        Gazetteer::from_parts(states, Vec::new(), towns)
    }

    fn row(id: i64, level: RiskLevel, city: Option<&str>) -> AssessmentLocationRow {
        AssessmentLocationRow {
            assessment_id: id,
            report_id: id,
            final_score: 5.0,
            risk_level: level,
            calculated_at: Utc::now(),
            extracted_state: Some("Selangor".to_string()),
            extracted_city: city.map(ToString::to_string),
        }
    }

    #[test]
    fn radius_table_matches_policy_defaults() {
        let policy = HazardPolicy::default();
        assert_eq!(policy.radius_m(RiskLevel::Low), 1_500);
        assert_eq!(policy.radius_m(RiskLevel::Moderate), 3_000);
        assert_eq!(policy.radius_m(RiskLevel::High), 6_000);
        assert_eq!(policy.radius_m(RiskLevel::Critical), 10_000);
    }

    #[test]
    fn resolved_assessment_becomes_zone() {
        let zones = build_zones(
            &gazetteer(),
            &HazardPolicy::default(),
            vec![row(1, RiskLevel::High, Some("Shah Alam"))],
        );
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, 1);
        assert_eq!(zones[0].radius_m, 6_000);
        assert!((zones[0].center.latitude - 3.0733).abs() < 1e-9);
    }

    #[test]
    fn unresolved_assessment_is_dropped() {
        let mut unresolved = row(2, RiskLevel::Critical, Some("Nowhere"));
        unresolved.extracted_state = Some("Atlantis".to_string());

        let zones = build_zones(
            &gazetteer(),
            &HazardPolicy::default(),
            vec![row(1, RiskLevel::Low, Some("Shah Alam")), unresolved],
        );
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, 1);
    }

    #[test]
    fn state_centroid_still_produces_a_zone() {
        // City unknown but the state resolves; the report stays on the map.
        let zones = build_zones(
            &gazetteer(),
            &HazardPolicy::default(),
            vec![row(3, RiskLevel::Moderate, Some("Unknown Town"))],
        );
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].radius_m, 3_000);
    }
}
