//! Database queries for administrative units.
//!
//! The gazetteer tables are seeded from the national place registry;
//! upserts keep re-runs idempotent. Deletion rules live in the schema:
//! removing a state cascades to its districts, removing a district nulls
//! its towns.

use flood_map_geography_models::{District, State, Town};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::GeoError;

/// Inserts or updates a state.
///
/// # Errors
///
/// Returns [`GeoError`] if the database operation fails.
pub async fn upsert_state(db: &dyn Database, state: &State) -> Result<(), GeoError> {
    db.exec_raw_params(
        "INSERT INTO states (id, name, updated_at)
         VALUES ($1, $2, now())
         ON CONFLICT (id) DO UPDATE SET
             name = EXCLUDED.name,
             updated_at = now()",
        &[
            DatabaseValue::String(state.id.clone()),
            DatabaseValue::String(state.name.clone()),
        ],
    )
    .await?;

    Ok(())
}

/// Inserts or updates a district.
///
/// # Errors
///
/// Returns [`GeoError`] if the database operation fails.
pub async fn upsert_district(db: &dyn Database, district: &District) -> Result<(), GeoError> {
    db.exec_raw_params(
        "INSERT INTO districts (id, name, state_id, updated_at)
         VALUES ($1, $2, $3, now())
         ON CONFLICT (id) DO UPDATE SET
             name = EXCLUDED.name,
             state_id = EXCLUDED.state_id,
             updated_at = now()",
        &[
            DatabaseValue::String(district.id.clone()),
            DatabaseValue::String(district.name.clone()),
            DatabaseValue::String(district.state_id.clone()),
        ],
    )
    .await?;

    Ok(())
}

/// Inserts or updates a town.
///
/// # Errors
///
/// Returns [`GeoError`] if the database operation fails.
pub async fn upsert_town(db: &dyn Database, town: &Town) -> Result<(), GeoError> {
    db.exec_raw_params(
        "INSERT INTO towns (id, name, latitude, longitude, state_id, district_id, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, now())
         ON CONFLICT (id) DO UPDATE SET
             name = EXCLUDED.name,
             latitude = EXCLUDED.latitude,
             longitude = EXCLUDED.longitude,
             state_id = EXCLUDED.state_id,
             district_id = EXCLUDED.district_id,
             updated_at = now()",
        &[
            DatabaseValue::String(town.id.clone()),
            DatabaseValue::String(town.name.clone()),
            town.latitude.map_or(DatabaseValue::Null, DatabaseValue::Real64),
            town.longitude
                .map_or(DatabaseValue::Null, DatabaseValue::Real64),
            town.state_id
                .as_ref()
                .map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.clone())),
            town.district_id
                .as_ref()
                .map_or(DatabaseValue::Null, |d| DatabaseValue::String(d.clone())),
        ],
    )
    .await?;

    Ok(())
}

/// Returns all states.
///
/// # Errors
///
/// Returns [`GeoError`] if the database operation fails.
pub async fn all_states(db: &dyn Database) -> Result<Vec<State>, GeoError> {
    let rows = db
        .query_raw_params("SELECT id, name FROM states ORDER BY id", &[])
        .await?;

    Ok(rows
        .iter()
        .map(|row| State {
            id: row.to_value("id").unwrap_or_default(),
            name: row.to_value("name").unwrap_or_default(),
        })
        .collect())
}

/// Returns all districts.
///
/// # Errors
///
/// Returns [`GeoError`] if the database operation fails.
pub async fn all_districts(db: &dyn Database) -> Result<Vec<District>, GeoError> {
    let rows = db
        .query_raw_params("SELECT id, name, state_id FROM districts ORDER BY id", &[])
        .await?;

    Ok(rows
        .iter()
        .map(|row| District {
            id: row.to_value("id").unwrap_or_default(),
            name: row.to_value("name").unwrap_or_default(),
            state_id: row.to_value("state_id").unwrap_or_default(),
        })
        .collect())
}

/// Returns all towns.
///
/// # Errors
///
/// Returns [`GeoError`] if the database operation fails.
pub async fn all_towns(db: &dyn Database) -> Result<Vec<Town>, GeoError> {
    let rows = db
        .query_raw_params(
            "SELECT id, name, latitude, longitude, state_id, district_id
             FROM towns
             ORDER BY id",
            &[],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| Town {
            id: row.to_value("id").unwrap_or_default(),
            name: row.to_value("name").unwrap_or_default(),
            latitude: row.to_value("latitude").unwrap_or(None),
            longitude: row.to_value("longitude").unwrap_or(None),
            state_id: row.to_value("state_id").unwrap_or(None),
            district_id: row.to_value("district_id").unwrap_or(None),
        })
        .collect())
}
