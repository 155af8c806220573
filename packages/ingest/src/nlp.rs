//! Boundary validation for the NLP collaborator's payloads.
//!
//! The collaborator emits duck-typed JSON (optional fields, nested or
//! flat location shapes). Everything is validated here into the strict
//! row shapes before it can enter the core; a malformed payload is an
//! explicit error, never a silently-defaulted row.

use chrono::{DateTime, NaiveDateTime, Utc};
use flood_map_database::queries;
use flood_map_risk_models::UrgencyScore;
use switchy_database::Database;

use crate::IngestError;

/// The report portion of a collaborator payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPayload {
    /// Post identifier from the social platform.
    pub source_tweet_id: String,
    /// Raw post text.
    pub text: String,
    /// When the post was published.
    pub posted_at: DateTime<Utc>,
    /// Platform-derived location hint, if any.
    pub location_hint: Option<String>,
}

/// The analysis portion of a collaborator payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NlpAnalysis {
    /// Whether the text describes actual flooding.
    pub flood_detected: bool,
    /// Urgency estimate (1-10).
    pub urgency_score: UrgencyScore,
    /// First extracted state mention, if any.
    pub extracted_state: Option<String>,
    /// First extracted city mention, if any.
    pub extracted_city: Option<String>,
}

/// Validates the report object of a payload.
///
/// # Errors
///
/// Returns [`IngestError::InvalidPayload`] when the id, text, or
/// timestamp is missing or the wrong type.
pub fn parse_report(payload: &serde_json::Value) -> Result<ReportPayload, IngestError> {
    let source_tweet_id = payload
        .get("id")
        .or_else(|| payload.get("tweet_id"))
        .and_then(value_to_id)
        .ok_or_else(|| IngestError::invalid("report is missing an id"))?;

    let text = payload
        .get("text")
        .and_then(serde_json::Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| IngestError::invalid("report text is missing or empty"))?
        .to_string();

    let posted_at = payload
        .get("timestamp")
        .or_else(|| payload.get("created_at"))
        .and_then(serde_json::Value::as_str)
        .and_then(parse_timestamp)
        .ok_or_else(|| IngestError::invalid("report timestamp is missing or unparseable"))?;

    let location_hint = match payload.get("location_hint") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(hint)) => Some(hint.clone()),
        Some(_) => return Err(IngestError::invalid("location_hint is not a string")),
    };

    Ok(ReportPayload {
        source_tweet_id,
        text,
        posted_at,
        location_hint,
    })
}

/// Validates the analysis object of a payload.
///
/// Accepts both the nested `extracted_locations.{states,cities}` arrays
/// and flat `extracted_state`/`extracted_city` strings. The flood flag
/// may be spelled `flood_detected` or `is_flood`.
///
/// # Errors
///
/// Returns [`IngestError::InvalidPayload`] when the flood flag is
/// missing/non-boolean, the urgency is out of range for a flood-positive
/// report, or a location field has the wrong type.
pub fn parse_analysis(payload: &serde_json::Value) -> Result<NlpAnalysis, IngestError> {
    let flood_detected = payload
        .get("flood_detected")
        .or_else(|| payload.get("is_flood"))
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| IngestError::invalid("flood flag is missing or not a boolean"))?;

    let urgency_raw = payload
        .get("urgency_score")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| IngestError::invalid("urgency_score is missing or not an integer"))?;

    // Non-flood reports arrive with urgency 0 from the collaborator;
    // they are never scored, so they are floored to the valid minimum.
    let urgency_value = if flood_detected {
        u8::try_from(urgency_raw)
            .ok()
            .ok_or_else(|| IngestError::invalid("urgency_score out of range"))?
    } else {
        u8::try_from(urgency_raw.max(1)).unwrap_or(1)
    };

    let urgency_score = UrgencyScore::new(urgency_value)
        .map_err(|e| IngestError::invalid(format!("urgency_score out of range: {e}")))?;

    let extracted_state = extract_place(payload, "extracted_state", "states")?;
    let extracted_city = extract_place(payload, "extracted_city", "cities")?;

    Ok(NlpAnalysis {
        flood_detected,
        urgency_score,
        extracted_state,
        extracted_city,
    })
}

/// Parses a full collaborator payload and persists the report and its
/// analysis.
///
/// Returns the report's database id. Re-ingesting the same post reuses
/// the existing report row; the analysis row is appended with the
/// current timestamp.
///
/// # Errors
///
/// Returns [`IngestError`] on validation failure (nothing written) or
/// if a database operation fails.
pub async fn ingest_payload(
    db: &dyn Database,
    payload: &serde_json::Value,
) -> Result<i64, IngestError> {
    let report_value = payload
        .get("original_tweet")
        .or_else(|| payload.get("report"))
        .ok_or_else(|| IngestError::invalid("payload is missing the report object"))?;
    let analysis_value = payload
        .get("analysis")
        .ok_or_else(|| IngestError::invalid("payload is missing the analysis object"))?;

    let report = parse_report(report_value)?;
    let analysis = parse_analysis(analysis_value)?;

    let report_id = queries::insert_report(
        db,
        &report.source_tweet_id,
        &report.text,
        report.posted_at,
        report.location_hint.as_deref(),
    )
    .await?;

    queries::insert_analysis(
        db,
        report_id,
        analysis.flood_detected,
        analysis.urgency_score,
        analysis.extracted_state.as_deref(),
        analysis.extracted_city.as_deref(),
        Utc::now(),
    )
    .await?;

    log::info!(
        "Ingested report {report_id} (flood: {}, urgency: {})",
        analysis.flood_detected,
        analysis.urgency_score.value()
    );

    Ok(report_id)
}

/// Reads a place mention from the flat key or the first entry of the
/// nested `extracted_locations` array.
fn extract_place(
    payload: &serde_json::Value,
    flat_key: &str,
    nested_key: &str,
) -> Result<Option<String>, IngestError> {
    if let Some(value) = payload.get(flat_key) {
        return match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
            serde_json::Value::String(s) => Ok(Some(s.clone())),
            _ => Err(IngestError::invalid(format!("{flat_key} is not a string"))),
        };
    }

    let Some(entries) = payload
        .get("extracted_locations")
        .and_then(|locations| locations.get(nested_key))
    else {
        return Ok(None);
    };

    let entries = entries
        .as_array()
        .ok_or_else(|| IngestError::invalid(format!("extracted_locations.{nested_key} is not an array")))?;

    let Some(first) = entries.first() else {
        return Ok(None);
    };

    first
        .as_str()
        .map(|s| Some(s.to_string()))
        .ok_or_else(|| IngestError::invalid(format!("extracted_locations.{nested_key} entry is not a string")))
}

/// Converts a JSON id value (string or integer) into a string id.
fn value_to_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses an ISO 8601 timestamp, with or without an offset.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}
