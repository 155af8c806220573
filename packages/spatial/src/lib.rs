#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Great-circle geometry primitives for route/hazard evaluation.
//!
//! Distances are computed on a spherical Earth (mean radius); the
//! point-to-segment distance is the cross-track distance clamped to the
//! segment, not a planar projection. Used by the hazard index and the
//! route safety evaluator.

pub mod polyline;

use flood_map_geography_models::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle (haversine) distance between two coordinates, in meters.
#[must_use]
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Initial bearing from `a` to `b`, in radians.
fn bearing_rad(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    y.atan2(x)
}

/// Minimum great-circle distance from `p` to the segment `a`-`b`, in
/// meters.
///
/// Uses the cross-track distance to the great circle through `a` and `b`,
/// falling back to the nearer endpoint when the perpendicular foot lies
/// outside the segment. A degenerate segment (`a` == `b`) reduces to the
/// point distance.
#[must_use]
pub fn point_to_segment_m(p: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    let segment_m = haversine_m(a, b);
    if segment_m < 1e-6 {
        return haversine_m(p, a);
    }

    let delta13 = haversine_m(a, p) / EARTH_RADIUS_M;
    let theta13 = bearing_rad(a, p);
    let theta12 = bearing_rad(a, b);

    // Perpendicular foot behind the start point.
    if (theta13 - theta12).cos() <= 0.0 {
        return haversine_m(p, a);
    }

    let cross_track = (delta13.sin() * (theta13 - theta12).sin()).asin();
    let along_track = (delta13.cos() / cross_track.cos()).clamp(-1.0, 1.0).acos();

    // Perpendicular foot beyond the end point.
    if along_track * EARTH_RADIUS_M >= segment_m {
        return haversine_m(p, b);
    }

    cross_track.abs() * EARTH_RADIUS_M
}

/// Minimum great-circle distance from `p` to a polyline, in meters.
///
/// Evaluates every consecutive vertex pair and takes the minimum. Returns
/// `None` for a polyline with fewer than two points.
#[must_use]
pub fn point_to_polyline_m(p: Coordinate, points: &[Coordinate]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }

    points
        .windows(2)
        .map(|pair| point_to_segment_m(p, pair[0], pair[1]))
        .min_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_DEGREE_M: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

    #[test]
    fn haversine_one_degree_of_longitude_at_equator() {
        let d = haversine_m(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - ONE_DEGREE_M).abs() < 1.0, "got {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let kl = Coordinate::new(3.139, 101.6869);
        let sg = Coordinate::new(1.3521, 103.8198);
        assert!((haversine_m(kl, sg) - haversine_m(sg, kl)).abs() < 1e-6);
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        let p = Coordinate::new(3.139, 101.6869);
        assert!(haversine_m(p, p).abs() < 1e-9);
    }

    #[test]
    fn cross_track_distance_mid_segment() {
        // Segment along the equator; point 0.01 degrees north of its middle.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let p = Coordinate::new(0.01, 0.5);

        let d = point_to_segment_m(p, a, b);
        let expected = 0.01 * ONE_DEGREE_M;
        assert!((d - expected).abs() < 1.0, "got {d}, expected {expected}");
    }

    #[test]
    fn clamps_to_near_endpoint_before_start() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let p = Coordinate::new(0.0, -0.5);

        let d = point_to_segment_m(p, a, b);
        assert!((d - haversine_m(p, a)).abs() < 1e-6);
    }

    #[test]
    fn clamps_to_near_endpoint_beyond_end() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let p = Coordinate::new(0.0, 1.5);

        let d = point_to_segment_m(p, a, b);
        assert!((d - haversine_m(p, b)).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segment_reduces_to_point_distance() {
        let a = Coordinate::new(3.0, 101.0);
        let p = Coordinate::new(3.1, 101.0);
        assert!((point_to_segment_m(p, a, a) - haversine_m(p, a)).abs() < 1e-6);
    }

    #[test]
    fn polyline_minimum_picks_nearest_segment() {
        // L-shaped polyline; point sits closest to the second leg.
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ];
        let p = Coordinate::new(0.5, 1.01);

        let d = point_to_polyline_m(p, &points).unwrap();
        let expected = 0.01 * ONE_DEGREE_M;
        // Slightly loose tolerance: the second leg is a meridian, exact.
        assert!((d - expected).abs() < 5.0, "got {d}, expected {expected}");
    }

    #[test]
    fn polyline_with_single_point_is_rejected() {
        assert!(point_to_polyline_m(Coordinate::new(0.0, 0.0), &[Coordinate::new(1.0, 1.0)]).is_none());
    }
}
