#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the flood map application.
//!
//! Serves the route query endpoint (hazard-aware route selection against
//! the current hazard snapshot) and the hazard snapshot itself for the
//! rendering client. The gazetteer is loaded once at startup; hazard
//! snapshots are rebuilt per request from recent risk assessments.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use chrono::Duration;
use flood_map_database::{db, run_migrations};
use flood_map_geography::Gazetteer;
use flood_map_hazard::{HazardIndex, HazardPolicy};
use flood_map_routing::{RoutesClient, RoutesConfig};
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<dyn Database>,
    /// In-memory gazetteer for resolving route endpoints.
    pub gazetteer: Arc<Gazetteer>,
    /// Hazard snapshot builder.
    pub hazards: HazardIndex,
    /// Routing provider client.
    pub routes: RoutesClient,
}

/// Builds the hazard policy, honoring `HAZARD_FRESHNESS_HOURS` and
/// `HAZARD_MAX_ZONES` environment overrides.
fn hazard_policy_from_env() -> HazardPolicy {
    let mut policy = HazardPolicy::default();

    if let Some(hours) = std::env::var("HAZARD_FRESHNESS_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        policy.freshness = Duration::hours(hours);
    }
    if let Some(max_zones) = std::env::var("HAZARD_MAX_ZONES")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        policy.max_zones = max_zones;
    }

    policy
}

/// Starts the flood map API server.
///
/// Connects to the database, runs migrations, loads the gazetteer, and
/// starts the Actix-Web HTTP server. This is a regular async function —
/// the caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database connection fails, migrations fail, the
/// gazetteer cannot be loaded, or the routing provider is not configured
/// (`GOOGLE_API_KEY`).
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env()
        .await
        .expect("Failed to connect to database");

    log::info!("Running migrations...");
    run_migrations(db_conn.as_ref())
        .await
        .expect("Failed to run migrations");

    log::info!("Loading gazetteer...");
    let gazetteer = Gazetteer::load(db_conn.as_ref())
        .await
        .expect("Failed to load gazetteer");

    let routes_config = RoutesConfig::from_env().expect("Routing provider not configured");
    let routes = RoutesClient::new(routes_config).expect("Failed to build routing client");

    let db: Arc<dyn Database> = Arc::from(db_conn);
    let gazetteer = Arc::new(gazetteer);
    let hazards = HazardIndex::new(
        Arc::clone(&db),
        Arc::clone(&gazetteer),
        hazard_policy_from_env(),
    );

    let state = web::Data::new(AppState {
        db,
        gazetteer,
        hazards,
        routes,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/route", web::get().to(handlers::route))
                    .route("/hazards", web::get().to(handlers::hazards)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
