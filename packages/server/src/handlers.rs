//! HTTP handler functions for the flood map API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use flood_map_geography::Gazetteer;
use flood_map_geography_models::Coordinate;
use flood_map_risk_models::TravelMode;
use flood_map_routing::{RouteError, select_route};
use flood_map_server_models::{ApiHazard, ApiHealth, ApiRoute, RouteQueryParams, RouteResponse};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/hazards`
///
/// Returns the current hazard snapshot for the rendering client.
pub async fn hazards(state: web::Data<AppState>) -> HttpResponse {
    match state.hazards.current_hazards(Utc::now()).await {
        Ok(zones) => {
            let api_zones: Vec<ApiHazard> = zones.into_iter().map(ApiHazard::from).collect();
            HttpResponse::Ok().json(api_zones)
        }
        Err(e) => {
            log::error!("Failed to build hazard snapshot: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to build hazard snapshot"
            }))
        }
    }
}

/// `GET /api/route`
///
/// Fetches candidate routes from the routing provider and selects the
/// one least exposed to the current hazard snapshot. A success response
/// always carries `bestRoute`; every failure is reported with an error
/// body and a reason code instead.
pub async fn route(state: web::Data<AppState>, params: web::Query<RouteQueryParams>) -> HttpResponse {
    let Some(origin) = parse_endpoint(&state.gazetteer, &params.origin) else {
        return invalid_parameter("origin", &params.origin);
    };
    let Some(destination) = parse_endpoint(&state.gazetteer, &params.destination) else {
        return invalid_parameter("destination", &params.destination);
    };
    let mode = match parse_travel_mode(params.travel_mode.as_deref()) {
        Ok(mode) => mode,
        Err(raw) => return invalid_parameter("travelMode", &raw),
    };

    let hazards = match state.hazards.current_hazards(Utc::now()).await {
        Ok(zones) => zones,
        Err(e) => {
            log::error!("Failed to build hazard snapshot: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to build hazard snapshot"
            }));
        }
    };

    let candidates = match state.routes.compute_routes(origin, destination, mode).await {
        Ok(candidates) => candidates,
        Err(e) => {
            log::error!("Routing provider request failed: {e}");
            return HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Routing provider unavailable",
                "reason": "PROVIDER_ERROR",
                "retryable": true,
            }));
        }
    };

    match select_route(candidates, hazards) {
        Ok(selection) => {
            let response = RouteResponse {
                best_route: ApiRoute::from(selection.best),
                alternatives: selection
                    .alternatives
                    .into_iter()
                    .map(ApiRoute::from)
                    .collect(),
                hazards: selection.hazards.into_iter().map(ApiHazard::from).collect(),
            };
            HttpResponse::Ok().json(response)
        }
        Err(RouteError::NoRoutesAvailable) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "No route found between the requested points",
            "reason": "NO_ROUTES_AVAILABLE",
        })),
        Err(e) => {
            log::error!("Route evaluation failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Route evaluation failed"
            }))
        }
    }
}

fn invalid_parameter(name: &str, value: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": format!("Invalid {name}: {value:?}"),
        "reason": "INVALID_PARAMETER",
    }))
}

/// Parses a route endpoint: `"lat,lng"` shorthand first, then a known
/// place name via the gazetteer. Full free-text geocoding stays with the
/// external collaborators.
fn parse_endpoint(gazetteer: &Gazetteer, raw: &str) -> Option<Coordinate> {
    if let Some(coordinate) = parse_lat_lng(raw) {
        return Some(coordinate);
    }
    gazetteer
        .resolve(None, Some(raw))
        .map(|resolved| resolved.coordinate)
}

fn parse_lat_lng(raw: &str) -> Option<Coordinate> {
    let (lat, lng) = raw.split_once(',')?;
    let coordinate = Coordinate::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?);
    coordinate.is_valid().then_some(coordinate)
}

/// Parses the `travelMode` parameter, defaulting to `DRIVE`. The
/// hyphenated spelling `TWO-WHEELER` is accepted alongside
/// `TWO_WHEELER`.
fn parse_travel_mode(raw: Option<&str>) -> Result<TravelMode, String> {
    let Some(raw) = raw else {
        return Ok(TravelMode::default());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(TravelMode::default());
    }
    trimmed
        .to_uppercase()
        .replace('-', "_")
        .parse()
        .map_err(|_| trimmed.to_string())
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
            district_id: None,
        }];
        Gazetteer::from_parts(states, Vec::new(), towns)
    }

    #[test]
    fn parses_coordinate_shorthand() {
        let coordinate = parse_endpoint(&gazetteer(), "3.139, 101.6869").unwrap();
        assert!((coordinate.latitude - 3.139).abs() < 1e-9);
        assert!((coordinate.longitude - 101.6869).abs() < 1e-9);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(parse_endpoint(&gazetteer(), "91.0,0.0").is_none());
    }

    #[test]
    fn resolves_town_name_endpoint() {
        let coordinate = parse_endpoint(&gazetteer(), "shah alam").unwrap();
        assert!((coordinate.latitude - 3.0733).abs() < 1e-9);
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        assert!(parse_endpoint(&gazetteer(), "Nowhere Ville").is_none());
    }

    #[test]
    fn travel_mode_defaults_to_drive() {
        assert_eq!(parse_travel_mode(None).unwrap(), TravelMode::Drive);
        assert_eq!(parse_travel_mode(Some("  ")).unwrap(), TravelMode::Drive);
    }

    #[test]
    fn travel_mode_accepts_hyphenated_spelling() {
        assert_eq!(
            parse_travel_mode(Some("two-wheeler")).unwrap(),
            TravelMode::TwoWheeler
        );
        assert_eq!(parse_travel_mode(Some("WALK")).unwrap(), TravelMode::Walk);
    }

    #[test]
    fn travel_mode_rejects_unknown_values() {
        assert_eq!(parse_travel_mode(Some("FLY")), Err("FLY".to_string()));
    }
}
