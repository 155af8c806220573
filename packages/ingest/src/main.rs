#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI for the batch stages of the flood map pipeline.
//!
//! `sync-warnings` pulls today's official warnings per district;
//! `score-pending` scores flood-positive reports that have no current
//! assessment. Both are designed to be run from an external scheduler.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use flood_map_database::db;
use flood_map_geography::{Gazetteer, queries as geo_queries};
use flood_map_scoring::{RiskScorer, ScoringPolicy};
use flood_map_warnings::WarningAggregator;
use flood_map_warnings::met::{self, MetConfig};
use switchy_database::Database;

#[derive(Parser)]
#[command(name = "flood_map_ingest", about = "Flood map batch pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest NLP collaborator payloads from a JSON file
    Ingest {
        /// File holding one payload object or an array of payloads
        file: std::path::PathBuf,
    },
    /// Sync today's warning observations for every district
    SyncWarnings,
    /// Score flood-positive reports without a current assessment
    ScorePending {
        /// Maximum reports to score in this run
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let db = db::connect_from_env().await?;
    flood_map_database::run_migrations(db.as_ref()).await?;

    match cli.command {
        Commands::Ingest { file } => ingest_file(db.as_ref(), &file).await?,
        Commands::SyncWarnings => sync_warnings(db.as_ref()).await?,
        Commands::ScorePending { limit } => score_pending(db, limit).await?,
    }

    Ok(())
}

/// Ingests collaborator payloads from a file, isolating per-payload
/// failures.
async fn ingest_file(
    db: &dyn Database,
    file: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    let payloads = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    let mut ingested = 0_u32;
    let mut rejected = 0_u32;
    for payload in &payloads {
        match flood_map_ingest::nlp::ingest_payload(db, payload).await {
            Ok(_) => ingested += 1,
            Err(e) => {
                log::error!("Payload rejected: {e}");
                rejected += 1;
            }
        }
    }

    println!("Ingested {ingested} payloads, {rejected} rejected");
    Ok(())
}

/// Syncs today's warnings for every district, isolating per-district
/// failures.
async fn sync_warnings(db: &dyn Database) -> Result<(), Box<dyn std::error::Error>> {
    let config = MetConfig::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let today = chrono::Utc::now().date_naive();

    let districts = geo_queries::all_districts(db).await?;
    log::info!("Syncing warnings for {} districts", districts.len());

    let mut failed = 0_u32;
    for district in &districts {
        if let Err(e) = met::sync_district(db, &client, &config, &district.id, today).await {
            log::error!("Warning sync failed for district {}: {e}", district.id);
            failed += 1;
        }
    }

    if failed > 0 {
        log::warn!("{failed} of {} district syncs failed", districts.len());
    }

    Ok(())
}

/// Scores pending reports with the default policy.
async fn score_pending(
    db: Box<dyn Database>,
    limit: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let db: Arc<dyn Database> = Arc::from(db);

    let gazetteer = Gazetteer::load(db.as_ref()).await?;
    let warnings = WarningAggregator::new(Arc::clone(&db));
    let scorer = RiskScorer::new(Arc::clone(&db), ScoringPolicy::default());

    let outcome =
        flood_map_ingest::pipeline::score_pending(db.as_ref(), &gazetteer, &warnings, &scorer, limit)
            .await?;

    println!(
        "Scored {} reports ({} with unknown warnings), {} failed",
        outcome.scored, outcome.unknown_warning, outcome.failed
    );

    Ok(())
}
