#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Official meteorological warning aggregation.
//!
//! [`WarningAggregator`] answers "how severe is the warning for this
//! district today" from the `weather_data` table, with a read-through
//! cache. The [`met`] module syncs observations from the national
//! meteorological provider.

pub mod met;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use flood_map_database::DbError;
use flood_map_database::queries;
use flood_map_risk_models::WarningSeverity;
use switchy_database::Database;

/// Errors that can occur while aggregating or syncing warnings.
#[derive(Debug, thiserror::Error)]
pub enum WarningError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Provider request failed or timed out. Retryable.
    #[error("Warning provider error: {0}")]
    Provider(#[from] reqwest::Error),

    /// Provider configuration is missing.
    #[error("Warning provider token not configured (MET_GOV_KEY)")]
    MissingToken,
}

/// Per-district per-day warning severity lookup with a read-through
/// cache.
///
/// `Ok(None)` means "no data" for the key — distinct from
/// [`WarningSeverity::None`], which is an observed level 0. Only present
/// observations are cached: an absent row may appear once the daily sync
/// runs, and a cache hit must never change the value returned for a key
/// that has data.
pub struct WarningAggregator {
    db: Arc<dyn Database>,
    cache: Mutex<BTreeMap<(String, NaiveDate), WarningSeverity>>,
}

impl WarningAggregator {
    /// Creates an aggregator reading from the given database.
    #[must_use]
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the warning severity for a district on a date, or
    /// `Ok(None)` when no observation exists.
    ///
    /// # Errors
    ///
    /// Returns [`WarningError`] if the database lookup fails.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    pub async fn severity_for(
        &self,
        district_id: &str,
        date: NaiveDate,
    ) -> Result<Option<WarningSeverity>, WarningError> {
        let key = (district_id.to_string(), date);

        if let Some(severity) = self.cache.lock().expect("warning cache poisoned").get(&key) {
            return Ok(Some(*severity));
        }

        let observation = queries::warning_observation(self.db.as_ref(), district_id, date).await?;

        let Some(observation) = observation else {
            return Ok(None);
        };

        self.cache
            .lock()
            .expect("warning cache poisoned")
            .insert(key, observation.warning_level);

        Ok(Some(observation.warning_level))
    }
}
