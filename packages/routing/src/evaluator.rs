//! Route safety evaluation and ranking.
//!
//! Pure read+compute: evaluation never touches persistent state, so it
//! is safe to retry and to run concurrently for independent requests.
//! Cost is `O(candidates x points_per_route x hazard_count)`; both
//! candidate and hazard counts arrive bounded (provider alternatives and
//! the hazard policy's zone cap).

use flood_map_hazard::HazardZone;
use flood_map_routing_models::{Exposure, RouteCandidate};
use flood_map_spatial::point_to_polyline_m;

use crate::RouteError;

/// Cap on alternatives returned alongside the best route.
pub const MAX_ALTERNATIVES: usize = 3;

/// A candidate together with its computed exposure.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedRoute {
    /// The candidate route.
    pub candidate: RouteCandidate,
    /// Its aggregate hazard intersection.
    pub exposure: Exposure,
}

/// The evaluation result: the safest viable route, ranked alternatives,
/// and the hazard snapshot the ranking was computed against.
///
/// The hazards are returned even when nothing intersected, so the client
/// can render the current picture alongside the route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSelection {
    /// Top-ranked candidate.
    pub best: EvaluatedRoute,
    /// Remaining candidates in rank order, capped at
    /// [`MAX_ALTERNATIVES`].
    pub alternatives: Vec<EvaluatedRoute>,
    /// Zones used for the evaluation.
    pub hazards: Vec<HazardZone>,
}

/// Computes a route's exposure to the hazard snapshot.
///
/// A zone intersects when the minimum great-circle distance from its
/// center to the route polyline is within the zone radius, boundary
/// inclusive.
#[must_use]
pub fn route_exposure(candidate: &RouteCandidate, hazards: &[HazardZone]) -> Exposure {
    let mut exposure = Exposure::default();

    for zone in hazards {
        let Some(min_distance_m) = point_to_polyline_m(zone.center, &candidate.points) else {
            continue;
        };
        if min_distance_m <= f64::from(zone.radius_m) {
            exposure.add(zone.risk_level);
        }
    }

    exposure
}

/// Ranks candidates against the hazard snapshot and selects the safest.
///
/// Candidates with fewer than two points are malformed and skipped
/// individually. Ranking is ascending by `(exposure, distance, provider
/// order)` — the provider-order key makes the result deterministic when
/// exposure and distance tie. With an empty hazard snapshot every
/// exposure is zero and the shortest candidate wins.
///
/// # Errors
///
/// Returns [`RouteError::NoRoutesAvailable`] when no candidate survives
/// validation.
pub fn select_route(
    candidates: Vec<RouteCandidate>,
    hazards: Vec<HazardZone>,
) -> Result<RouteSelection, RouteError> {
    let mut evaluated: Vec<(usize, EvaluatedRoute)> = Vec::with_capacity(candidates.len());

    for (provider_order, candidate) in candidates.into_iter().enumerate() {
        if candidate.points.len() < 2 {
            log::warn!("Skipping malformed candidate {provider_order}: fewer than two points");
            continue;
        }

        let exposure = route_exposure(&candidate, &hazards);
        evaluated.push((provider_order, EvaluatedRoute { candidate, exposure }));
    }

    if evaluated.is_empty() {
        return Err(RouteError::NoRoutesAvailable);
    }

    evaluated.sort_by(|a, b| {
        a.1.exposure
            .cmp(&b.1.exposure)
            .then_with(|| a.1.candidate.distance_m.cmp(&b.1.candidate.distance_m))
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut ranked: Vec<EvaluatedRoute> = evaluated.into_iter().map(|(_, route)| route).collect();
    let best = ranked.remove(0);
    ranked.truncate(MAX_ALTERNATIVES);

    Ok(RouteSelection {
        best,
        alternatives: ranked,
        hazards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_geography_models::Coordinate;
    use flood_map_risk_models::RiskLevel;
    use flood_map_spatial::point_to_polyline_m as polyline_distance;
    use flood_map_spatial::polyline::encode_polyline;

    fn candidate(points: Vec<Coordinate>, distance_m: u32) -> RouteCandidate {
        RouteCandidate {
            polyline: encode_polyline(&points),
            points,
            distance_m,
            duration_s: distance_m / 10,
        }
    }

    fn equator_route(lat: f64, distance_m: u32) -> RouteCandidate {
        candidate(
            vec![Coordinate::new(lat, 0.0), Coordinate::new(lat, 1.0)],
            distance_m,
        )
    }

    fn zone(id: i64, center: Coordinate, level: RiskLevel, radius_m: u32) -> HazardZone {
        HazardZone {
            id,
            center,
            risk_level: level,
            radius_m,
        }
    }

    #[test]
    fn clean_route_outranks_exposed_route_of_equal_distance() {
        // Route B passes within the zone radius; route A stays far north.
        let a = equator_route(1.0, 50_000);
        let b = equator_route(0.0, 50_000);
        let hazards = vec![zone(
            1,
            Coordinate::new(0.0, 0.5),
            RiskLevel::High,
            6_000,
        )];

        let selection = select_route(vec![b, a.clone()], hazards).unwrap();
        assert_eq!(selection.best.candidate, a);
        assert!(selection.best.exposure.is_zero());
        assert_eq!(selection.alternatives.len(), 1);
        assert_eq!(selection.alternatives[0].exposure.zone_count, 1);
    }

    #[test]
    fn provider_order_breaks_full_ties() {
        let first = equator_route(1.0, 40_000);
        let second = equator_route(1.0, 40_000);

        let selection = select_route(vec![first.clone(), second], Vec::new()).unwrap();
        assert_eq!(selection.best.candidate, first);
    }

    #[test]
    fn boundary_distance_counts_as_intersecting() {
        let route = equator_route(0.0, 10_000);
        let center = Coordinate::new(0.05, 0.5);
        // Radius set to the exact minimum distance from center to route.
        let exact = polyline_distance(center, &route.points).unwrap();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let radius_m = exact.ceil() as u32;

        let on_boundary = route_exposure(
            &route,
            &[zone(1, center, RiskLevel::Moderate, radius_m)],
        );
        assert_eq!(on_boundary.zone_count, 1);

        let just_inside = route_exposure(
            &route,
            &[zone(1, center, RiskLevel::Moderate, radius_m - 10)],
        );
        assert!(just_inside.is_zero());

        // Exact equality: a zone centered on a route vertex at radius 0.
        let on_vertex = route_exposure(
            &route,
            &[zone(2, route.points[0], RiskLevel::Low, 0)],
        );
        assert_eq!(on_vertex.zone_count, 1);
    }

    #[test]
    fn empty_hazards_selects_shortest() {
        let long = equator_route(0.0, 80_000);
        let short = equator_route(0.2, 30_000);

        let selection = select_route(vec![long, short.clone()], Vec::new()).unwrap();
        assert_eq!(selection.best.candidate, short);
        assert!(selection.hazards.is_empty());
    }

    #[test]
    fn severity_breaks_equal_zone_counts() {
        // Both routes cross one zone; the low-severity crossing wins even
        // though that route is longer.
        let through_critical = equator_route(0.0, 30_000);
        let through_low = equator_route(1.0, 40_000);
        let hazards = vec![
            zone(1, Coordinate::new(0.0, 0.5), RiskLevel::Critical, 6_000),
            zone(2, Coordinate::new(1.0, 0.5), RiskLevel::Low, 6_000),
        ];

        let selection = select_route(vec![through_critical, through_low.clone()], hazards).unwrap();
        assert_eq!(selection.best.candidate, through_low);
    }

    #[test]
    fn fewer_zones_dominates_distance() {
        let clean_but_long = equator_route(2.0, 90_000);
        let exposed_but_short = equator_route(0.0, 20_000);
        let hazards = vec![zone(
            1,
            Coordinate::new(0.0, 0.5),
            RiskLevel::Low,
            6_000,
        )];

        let selection =
            select_route(vec![exposed_but_short, clean_but_long.clone()], hazards).unwrap();
        assert_eq!(selection.best.candidate, clean_but_long);
    }

    #[test]
    fn malformed_candidate_is_skipped() {
        let malformed = RouteCandidate {
            polyline: String::new(),
            points: vec![Coordinate::new(0.0, 0.0)],
            distance_m: 1,
            duration_s: 1,
        };
        let good = equator_route(0.0, 50_000);

        let selection = select_route(vec![malformed, good.clone()], Vec::new()).unwrap();
        assert_eq!(selection.best.candidate, good);
        assert!(selection.alternatives.is_empty());
    }

    #[test]
    fn all_malformed_is_no_routes_available() {
        let malformed = RouteCandidate {
            polyline: String::new(),
            points: Vec::new(),
            distance_m: 1,
            duration_s: 1,
        };

        assert!(matches!(
            select_route(vec![malformed], Vec::new()),
            Err(RouteError::NoRoutesAvailable)
        ));
    }

    #[test]
    fn empty_candidates_is_no_routes_available() {
        assert!(matches!(
            select_route(Vec::new(), Vec::new()),
            Err(RouteError::NoRoutesAvailable)
        ));
    }

    #[test]
    fn alternatives_are_capped_and_rank_ordered() {
        let routes: Vec<RouteCandidate> = (0_u32..6)
            .map(|i| equator_route(f64::from(i), 10_000 * (i + 1)))
            .collect();

        let selection = select_route(routes, Vec::new()).unwrap();
        assert_eq!(selection.best.candidate.distance_m, 10_000);
        assert_eq!(selection.alternatives.len(), MAX_ALTERNATIVES);
        assert_eq!(selection.alternatives[0].candidate.distance_m, 20_000);
        assert_eq!(selection.alternatives[2].candidate.distance_m, 40_000);
    }

    #[test]
    fn hazards_are_echoed_even_without_intersections() {
        let route = equator_route(5.0, 10_000);
        let hazards = vec![zone(
            9,
            Coordinate::new(0.0, 0.5),
            RiskLevel::High,
            6_000,
        )];

        let selection = select_route(vec![route], hazards).unwrap();
        assert_eq!(selection.hazards.len(), 1);
        assert!(selection.best.exposure.is_zero());
    }
}
