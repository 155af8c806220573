//! National meteorological provider client.
//!
//! Fetches the day's rain warnings per district and upserts one warning
//! observation per `(district, date)`. The provider reports warnings
//! under two category spellings; both are tried in order.
//!
//! Severities arrive as numbers or color/name strings depending on the
//! dataset; both map onto the 0-4 scale.

use chrono::NaiveDate;
use flood_map_database::queries;
use flood_map_risk_models::WarningSeverity;
use switchy_database::Database;

use crate::WarningError;

/// Warning dataset categories, in preference order.
const CATEGORIES: &[&str] = &["RAINS", "RAIN"];

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.met.gov.my/v2.1";

/// Provider configuration, passed in at construction.
#[derive(Debug, Clone)]
pub struct MetConfig {
    /// API base URL.
    pub base_url: String,
    /// API token, sent as `METToken` authorization.
    pub token: String,
}

impl MetConfig {
    /// Builds the configuration from `MET_GOV_KEY` and optional
    /// `MET_BASE_URL` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`WarningError::MissingToken`] if `MET_GOV_KEY` is not set.
    pub fn from_env() -> Result<Self, WarningError> {
        let token = std::env::var("MET_GOV_KEY").map_err(|_| WarningError::MissingToken)?;
        let base_url =
            std::env::var("MET_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self { base_url, token })
    }
}

/// Maps a provider severity value (number or name) onto the 0-4 scale.
///
/// Unrecognized values are level 0 rather than an error: the provider
/// mixes legacy color names and numeric levels across datasets.
#[must_use]
pub fn parse_severity(value: &serde_json::Value) -> WarningSeverity {
    if let Some(n) = value.as_i64() {
        let clamped = u8::try_from(n.clamp(0, 4)).unwrap_or(0);
        return WarningSeverity::from_value(clamped).unwrap_or(WarningSeverity::None);
    }

    let Some(s) = value.as_str() else {
        return WarningSeverity::None;
    };

    if let Ok(n) = s.trim().parse::<i64>() {
        let clamped = u8::try_from(n.clamp(0, 4)).unwrap_or(0);
        return WarningSeverity::from_value(clamped).unwrap_or(WarningSeverity::None);
    }

    match s.trim().to_lowercase().as_str() {
        "red" | "emergency" | "severe" => WarningSeverity::Emergency,
        "orange" | "warning" => WarningSeverity::Warning,
        "amber" | "watch" => WarningSeverity::Watch,
        "yellow" | "advisory" | "info" | "information" => WarningSeverity::Advisory,
        _ => WarningSeverity::None,
    }
}

/// Maximum severity across a warning result set.
///
/// Severity may appear under `severity`, `level`, or `severity_level`
/// depending on the dataset.
#[must_use]
pub fn max_severity(results: &[serde_json::Value]) -> WarningSeverity {
    results
        .iter()
        .map(|result| {
            let value = result
                .get("severity")
                .or_else(|| result.get("level"))
                .or_else(|| result.get("severity_level"))
                .unwrap_or(&serde_json::Value::Null);
            parse_severity(value)
        })
        .max()
        .unwrap_or(WarningSeverity::None)
}

/// Fetches the day's warning results for a district.
///
/// Tries each category in [`CATEGORIES`]; the first non-empty result set
/// wins. An empty `Vec` means the provider answered with no active
/// warnings.
///
/// # Errors
///
/// Returns [`WarningError::Provider`] if a request fails or times out.
pub async fn fetch_warnings(
    client: &reqwest::Client,
    config: &MetConfig,
    district_id: &str,
    date: NaiveDate,
) -> Result<Vec<serde_json::Value>, WarningError> {
    let day = date.format("%Y-%m-%d").to_string();

    for category in CATEGORIES {
        let resp = client
            .get(format!("{}/data", config.base_url))
            .header("Authorization", format!("METToken {}", config.token))
            .query(&[
                ("datasetid", "WARNING"),
                ("datacategoryid", category),
                ("locationid", district_id),
                ("start_date", day.as_str()),
                ("end_date", day.as_str()),
                ("lang", "en"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        let results = body
            .get("results")
            .or_else(|| body.get("data"))
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();

        if !results.is_empty() {
            return Ok(results);
        }
    }

    Ok(Vec::new())
}

/// Syncs one district's observation for a date: fetch, reduce to the max
/// severity, upsert.
///
/// A successful fetch with no active warnings stores an observed level 0,
/// which is distinct from "no data" (no row at all). Fetch failures
/// propagate without writing.
///
/// # Errors
///
/// Returns [`WarningError`] if the fetch or the upsert fails.
pub async fn sync_district(
    db: &dyn Database,
    client: &reqwest::Client,
    config: &MetConfig,
    district_id: &str,
    date: NaiveDate,
) -> Result<WarningSeverity, WarningError> {
    let results = fetch_warnings(client, config, district_id, date).await?;
    let severity = max_severity(&results);

    queries::upsert_warning_observation(db, district_id, date, severity, None, None).await?;

    log::info!(
        "Synced warnings for district {district_id} on {date}: {} results, level {}",
        results.len(),
        severity.value()
    );

    Ok(severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_severity() {
        assert_eq!(parse_severity(&json!(3)), WarningSeverity::Warning);
        assert_eq!(parse_severity(&json!("2")), WarningSeverity::Watch);
    }

    #[test]
    fn clamps_out_of_range_numeric_severity() {
        assert_eq!(parse_severity(&json!(9)), WarningSeverity::Emergency);
        assert_eq!(parse_severity(&json!(-1)), WarningSeverity::None);
    }

    #[test]
    fn parses_color_names() {
        assert_eq!(parse_severity(&json!("Red")), WarningSeverity::Emergency);
        assert_eq!(parse_severity(&json!("orange")), WarningSeverity::Warning);
        assert_eq!(parse_severity(&json!("amber")), WarningSeverity::Watch);
        assert_eq!(parse_severity(&json!("YELLOW")), WarningSeverity::Advisory);
    }

    #[test]
    fn unrecognized_severity_is_level_zero() {
        assert_eq!(parse_severity(&json!("mauve")), WarningSeverity::None);
        assert_eq!(parse_severity(&json!(null)), WarningSeverity::None);
    }

    #[test]
    fn max_severity_scans_alternate_keys() {
        let results = vec![
            json!({"severity": "yellow"}),
            json!({"level": 3}),
            json!({"severity_level": "amber"}),
        ];
        assert_eq!(max_severity(&results), WarningSeverity::Warning);
    }

    #[test]
    fn max_severity_of_empty_results_is_level_zero() {
        assert_eq!(max_severity(&[]), WarningSeverity::None);
    }
}
