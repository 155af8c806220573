#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types and query parameter definitions.
//!
//! These types represent the shapes of data as stored in and retrieved
//! from the database. They are distinct from the API response types in
//! `flood_map_server_models` and the boundary-validated collaborator
//! payloads in `flood_map_ingest`.

use chrono::{DateTime, NaiveDate, Utc};
use flood_map_risk_models::{RiskLevel, UrgencyScore, WarningSeverity};
use serde::{Deserialize, Serialize};

/// A social-media flood report as stored in the database.
///
/// Immutable once created; re-ingesting the same source post is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloodReportRow {
    /// Primary key.
    pub id: i64,
    /// Post identifier from the social platform.
    pub source_tweet_id: String,
    /// Raw post text.
    pub text: String,
    /// When the post was published.
    pub posted_at: DateTime<Utc>,
    /// Self-reported or platform-derived location hint, if any.
    pub location_hint: Option<String>,
}

/// NLP analysis output for one report, validated at the ingest boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResultRow {
    /// Primary key.
    pub id: i64,
    /// Report this analysis belongs to.
    pub report_id: i64,
    /// Whether the text describes actual flooding.
    pub flood_detected: bool,
    /// Urgency estimate (1-10).
    pub urgency_score: UrgencyScore,
    /// State mentioned in the text, if extracted.
    pub extracted_state: Option<String>,
    /// City/town mentioned in the text, if extracted.
    pub extracted_city: Option<String>,
    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

/// One official warning observation for a district on a date.
///
/// Level 0 means "no active warning"; a missing row means "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningObservationRow {
    /// Primary key.
    pub id: i64,
    /// District this observation covers.
    pub district_id: String,
    /// Observation date.
    pub observed_on: NaiveDate,
    /// Official severity level (0-4).
    pub warning_level: WarningSeverity,
    /// Reported rainfall, if present.
    pub rainfall_mm: Option<f64>,
    /// Reported temperature, if present.
    pub temperature_c: Option<f64>,
}

/// The current risk assessment for one report.
///
/// At most one row exists per report; recomputation overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentRow {
    /// Primary key.
    pub id: i64,
    /// Report this assessment scores.
    pub report_id: i64,
    /// Fused score in [1.0, 10.0], one decimal.
    pub final_score: f64,
    /// Categorical band for the score.
    pub risk_level: RiskLevel,
    /// Traveler-facing recommendation text.
    pub recommendation: String,
    /// When the score was (re)computed.
    pub calculated_at: DateTime<Utc>,
}

/// A flood-positive analysis still waiting for a risk assessment.
///
/// Shape of the batch-scoring work queue query: analysis fields joined
/// with the absence of a current `risk_scores` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAnalysisRow {
    /// Report to score.
    pub report_id: i64,
    /// Urgency estimate (1-10).
    pub urgency_score: UrgencyScore,
    /// State mentioned in the text, if extracted.
    pub extracted_state: Option<String>,
    /// City/town mentioned in the text, if extracted.
    pub extracted_city: Option<String>,
}

/// A recent assessment joined with its report's extracted location,
/// as selected for hazard index materialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentLocationRow {
    /// Assessment primary key.
    pub assessment_id: i64,
    /// Scored report.
    pub report_id: i64,
    /// Fused score.
    pub final_score: f64,
    /// Categorical band.
    pub risk_level: RiskLevel,
    /// When the score was computed.
    pub calculated_at: DateTime<Utc>,
    /// State mentioned in the report, if extracted.
    pub extracted_state: Option<String>,
    /// City/town mentioned in the report, if extracted.
    pub extracted_city: Option<String>,
}

/// Time window and cap for selecting current assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentWindow {
    /// Inclusive lower bound on `calculated_at`.
    pub since: DateTime<Utc>,
    /// Inclusive upper bound on `calculated_at`.
    pub until: DateTime<Utc>,
    /// Maximum number of rows, most recent first.
    pub limit: u32,
}
