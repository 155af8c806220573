//! Routing provider client.
//!
//! Requests candidate routes from the provider's computeRoutes endpoint
//! and validates the loosely-typed response into [`RouteCandidate`]s. A
//! candidate that fails validation (missing polyline, undecodable
//! encoding, fewer than two points) is skipped individually; the rest of
//! the response is still used.

use std::time::Duration;

use flood_map_geography_models::Coordinate;
use flood_map_risk_models::TravelMode;
use flood_map_routing_models::RouteCandidate;
use flood_map_spatial::polyline::decode_polyline;

use crate::RouteError;

/// Default computeRoutes endpoint.
pub const DEFAULT_ROUTES_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";

/// Fields requested from the provider; everything else is dropped
/// server-side.
const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline";

/// Routing provider configuration, passed in at construction.
#[derive(Debug, Clone)]
pub struct RoutesConfig {
    /// computeRoutes endpoint URL.
    pub base_url: String,
    /// Provider API key.
    pub api_key: String,
    /// Per-request timeout. The route query path is latency-bounded, so
    /// a slow provider fails fast as a retryable error.
    pub timeout: Duration,
}

impl RoutesConfig {
    /// Builds the configuration from `GOOGLE_API_KEY` and optional
    /// `ROUTES_BASE_URL` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MissingApiKey`] if `GOOGLE_API_KEY` is not
    /// set.
    pub fn from_env() -> Result<Self, RouteError> {
        let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| RouteError::MissingApiKey)?;
        let base_url =
            std::env::var("ROUTES_BASE_URL").unwrap_or_else(|_| DEFAULT_ROUTES_URL.to_string());
        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(5),
        })
    }
}

/// HTTP client for the routing provider.
pub struct RoutesClient {
    client: reqwest::Client,
    config: RoutesConfig,
}

impl RoutesClient {
    /// Creates a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Provider`] if the HTTP client cannot be
    /// built.
    pub fn new(config: RoutesConfig) -> Result<Self, RouteError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetches candidate routes for an origin/destination/mode.
    ///
    /// Alternative routes are always requested; the returned list may
    /// still be empty when the provider finds nothing or every candidate
    /// fails validation.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Provider`] on request failure or timeout,
    /// and [`RouteError::Parse`] when the response body is not the
    /// expected shape.
    pub async fn compute_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Vec<RouteCandidate>, RouteError> {
        let body = serde_json::json!({
            "origin": {
                "location": {
                    "latLng": {
                        "latitude": origin.latitude,
                        "longitude": origin.longitude,
                    }
                }
            },
            "destination": {
                "location": {
                    "latLng": {
                        "latitude": destination.latitude,
                        "longitude": destination.longitude,
                    }
                }
            },
            "travelMode": mode.to_string(),
            "computeAlternativeRoutes": true,
        });

        let resp = self
            .client
            .post(&self.config.base_url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = resp.json().await?;
        parse_routes_response(&payload)
    }
}

/// Validates a provider response body into route candidates.
///
/// # Errors
///
/// Returns [`RouteError::Parse`] when the body is not a JSON object.
/// Individual malformed candidates are skipped, not fatal.
pub fn parse_routes_response(payload: &serde_json::Value) -> Result<Vec<RouteCandidate>, RouteError> {
    if !payload.is_object() {
        return Err(RouteError::Parse {
            message: "response body is not an object".to_string(),
        });
    }

    let routes = payload
        .get("routes")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut candidates = Vec::with_capacity(routes.len());
    for (idx, route) in routes.iter().enumerate() {
        match parse_candidate(route) {
            Some(candidate) => candidates.push(candidate),
            None => log::warn!("Skipping malformed route candidate {idx} from provider"),
        }
    }

    Ok(candidates)
}

/// Validates one provider route object into a [`RouteCandidate`].
///
/// Returns `None` when the polyline is missing, fails to decode, or has
/// fewer than two points.
#[must_use]
pub fn parse_candidate(route: &serde_json::Value) -> Option<RouteCandidate> {
    let encoded = route
        .get("polyline")
        .and_then(|p| p.get("encodedPolyline"))
        .and_then(serde_json::Value::as_str)?;

    let points = decode_polyline(encoded).ok()?;
    if points.len() < 2 {
        return None;
    }

    let distance_m = route
        .get("distanceMeters")
        .and_then(serde_json::Value::as_u64)
        .and_then(|d| u32::try_from(d).ok())
        .unwrap_or(0);

    let duration_s = route
        .get("duration")
        .and_then(serde_json::Value::as_str)
        .and_then(parse_duration_s)
        .unwrap_or(0);

    Some(RouteCandidate {
        polyline: encoded.to_string(),
        points,
        distance_m,
        duration_s,
    })
}

/// Parses the provider's `"123s"` duration strings.
fn parse_duration_s(raw: &str) -> Option<u32> {
    raw.strip_suffix('s')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_spatial::polyline::encode_polyline;
    use serde_json::json;

    fn encoded_pair() -> String {
        encode_polyline(&[Coordinate::new(3.139, 101.6869), Coordinate::new(3.152, 101.7144)])
    }

    #[test]
    fn parses_well_formed_candidate() {
        let route = json!({
            "polyline": {"encodedPolyline": encoded_pair()},
            "distanceMeters": 4200,
            "duration": "390s",
        });

        let candidate = parse_candidate(&route).unwrap();
        assert_eq!(candidate.points.len(), 2);
        assert_eq!(candidate.distance_m, 4200);
        assert_eq!(candidate.duration_s, 390);
    }

    #[test]
    fn rejects_candidate_without_polyline() {
        assert!(parse_candidate(&json!({"distanceMeters": 100})).is_none());
    }

    #[test]
    fn rejects_candidate_with_undecodable_polyline() {
        let route = json!({"polyline": {"encodedPolyline": "abc"}});
        assert!(parse_candidate(&route).is_none());
    }

    #[test]
    fn rejects_candidate_with_single_point() {
        let single = encode_polyline(&[Coordinate::new(3.139, 101.6869)]);
        let route = json!({"polyline": {"encodedPolyline": single}});
        assert!(parse_candidate(&route).is_none());
    }

    #[test]
    fn malformed_candidates_are_skipped_not_fatal() {
        let payload = json!({
            "routes": [
                {"polyline": {"encodedPolyline": "abc"}},
                {
                    "polyline": {"encodedPolyline": encoded_pair()},
                    "distanceMeters": 1000,
                    "duration": "60s",
                },
            ]
        });

        let candidates = parse_routes_response(&payload).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].distance_m, 1000);
    }

    #[test]
    fn empty_routes_list_is_ok_but_empty() {
        assert!(parse_routes_response(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn non_object_response_is_a_parse_error() {
        assert!(matches!(
            parse_routes_response(&json!([1, 2])),
            Err(RouteError::Parse { .. })
        ));
    }
}
