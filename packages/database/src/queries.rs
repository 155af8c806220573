//! Database query functions for flood reports, warnings, and risk scores.
//!
//! Upserts use `ON CONFLICT` so ingestion and scoring stay idempotent:
//! re-ingesting a post is a no-op and re-scoring a report overwrites its
//! single assessment row.

use chrono::{DateTime, NaiveDate, Utc};
use flood_map_database_models::{
    AnalysisResultRow, AssessmentLocationRow, AssessmentWindow, PendingAnalysisRow,
    RiskAssessmentRow, WarningObservationRow,
};
use flood_map_risk_models::{RiskLevel, UrgencyScore, WarningSeverity};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Inserts a flood report, returning its ID.
///
/// Re-inserting the same `source_tweet_id` returns the existing row's ID
/// without modifying it — reports are immutable once created.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_report(
    db: &dyn Database,
    source_tweet_id: &str,
    text: &str,
    posted_at: DateTime<Utc>,
    location_hint: Option<&str>,
) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO reports (source_tweet_id, text, posted_at, location_hint)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (source_tweet_id) DO UPDATE SET
                 source_tweet_id = EXCLUDED.source_tweet_id
             RETURNING id",
            &[
                DatabaseValue::String(source_tweet_id.to_string()),
                DatabaseValue::String(text.to_string()),
                DatabaseValue::DateTime(posted_at.naive_utc()),
                location_hint.map_or(DatabaseValue::Null, |h| {
                    DatabaseValue::String(h.to_string())
                }),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get report id from insert".to_string(),
    })?;

    row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse report id: {e}"),
    })
}

/// Inserts an NLP analysis result for a report, returning its ID.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_analysis(
    db: &dyn Database,
    report_id: i64,
    flood_detected: bool,
    urgency_score: UrgencyScore,
    extracted_state: Option<&str>,
    extracted_city: Option<&str>,
    analyzed_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO analysis_results (
                report_id, flood_detected, urgency_score,
                extracted_state, extracted_city, analyzed_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id",
            &[
                DatabaseValue::Int64(report_id),
                DatabaseValue::Bool(flood_detected),
                DatabaseValue::Int32(i32::from(urgency_score.value())),
                extracted_state.map_or(DatabaseValue::Null, |s| {
                    DatabaseValue::String(s.to_string())
                }),
                extracted_city.map_or(DatabaseValue::Null, |c| {
                    DatabaseValue::String(c.to_string())
                }),
                DatabaseValue::DateTime(analyzed_at.naive_utc()),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get analysis id from insert".to_string(),
    })?;

    row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse analysis id: {e}"),
    })
}

/// Inserts or updates the warning observation for a district on a date.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_warning_observation(
    db: &dyn Database,
    district_id: &str,
    observed_on: NaiveDate,
    warning_level: WarningSeverity,
    rainfall_mm: Option<f64>,
    temperature_c: Option<f64>,
) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO weather_data (
            district_id, observed_on, warning_level, rainfall_mm, temperature_c
        ) VALUES ($1, $2::date, $3, $4, $5)
        ON CONFLICT (district_id, observed_on) DO UPDATE SET
            warning_level = EXCLUDED.warning_level,
            rainfall_mm = EXCLUDED.rainfall_mm,
            temperature_c = EXCLUDED.temperature_c",
        &[
            DatabaseValue::String(district_id.to_string()),
            DatabaseValue::String(observed_on.format("%Y-%m-%d").to_string()),
            DatabaseValue::Int32(i32::from(warning_level.value())),
            rainfall_mm.map_or(DatabaseValue::Null, DatabaseValue::Real64),
            temperature_c.map_or(DatabaseValue::Null, DatabaseValue::Real64),
        ],
    )
    .await?;

    Ok(())
}

/// Returns the warning observation for a district on a date, or `None`
/// when no data exists for that key.
///
/// Absence of a row is "no data" — callers must not collapse it into
/// level 0.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn warning_observation(
    db: &dyn Database,
    district_id: &str,
    observed_on: NaiveDate,
) -> Result<Option<WarningObservationRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, district_id, observed_on, warning_level, rainfall_mm, temperature_c
             FROM weather_data
             WHERE district_id = $1 AND observed_on = $2::date
             ORDER BY id DESC
             LIMIT 1",
            &[
                DatabaseValue::String(district_id.to_string()),
                DatabaseValue::String(observed_on.format("%Y-%m-%d").to_string()),
            ],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let level_val: i32 = row.to_value("warning_level").unwrap_or(0);
    let warning_level = WarningSeverity::from_value(u8::try_from(level_val).unwrap_or(0))
        .map_err(|e| DbError::Conversion {
            message: format!("Invalid stored warning level: {e}"),
        })?;

    Ok(Some(WarningObservationRow {
        id: row.to_value("id").unwrap_or(0),
        district_id: row.to_value("district_id").unwrap_or_default(),
        observed_on,
        warning_level,
        rainfall_mm: row.to_value("rainfall_mm").unwrap_or(None),
        temperature_c: row.to_value("temperature_c").unwrap_or(None),
    }))
}

/// Inserts or overwrites the risk assessment for a report.
///
/// At most one assessment row exists per report; recomputation updates it
/// in a single atomic statement, so concurrent writers cannot interleave
/// partial updates.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_risk_assessment(
    db: &dyn Database,
    report_id: i64,
    final_score: f64,
    risk_level: RiskLevel,
    recommendation: &str,
    calculated_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO risk_scores (
                report_id, final_score, risk_level, recommendation, calculated_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (report_id) DO UPDATE SET
                final_score = EXCLUDED.final_score,
                risk_level = EXCLUDED.risk_level,
                recommendation = EXCLUDED.recommendation,
                calculated_at = EXCLUDED.calculated_at
            RETURNING id",
            &[
                DatabaseValue::Int64(report_id),
                DatabaseValue::Real64(final_score),
                DatabaseValue::String(risk_level.to_string()),
                DatabaseValue::String(recommendation.to_string()),
                DatabaseValue::DateTime(calculated_at.naive_utc()),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get assessment id from upsert".to_string(),
    })?;

    row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse assessment id: {e}"),
    })
}

/// Returns the current risk assessment for a report, if one exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn risk_assessment_for_report(
    db: &dyn Database,
    report_id: i64,
) -> Result<Option<RiskAssessmentRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, report_id, final_score, risk_level, recommendation, calculated_at
             FROM risk_scores
             WHERE report_id = $1",
            &[DatabaseValue::Int64(report_id)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let level_name: String = row.to_value("risk_level").unwrap_or_default();
    let risk_level = level_name
        .parse::<RiskLevel>()
        .map_err(|_| DbError::Conversion {
            message: format!("Invalid stored risk level: {level_name}"),
        })?;

    Ok(Some(RiskAssessmentRow {
        id: row.to_value("id").unwrap_or(0),
        report_id: row.to_value("report_id").unwrap_or(0),
        final_score: row.to_value("final_score").unwrap_or(0.0),
        risk_level,
        recommendation: row.to_value("recommendation").unwrap_or_default(),
        calculated_at: parse_utc(row.to_value("calculated_at").unwrap_or_default()),
    }))
}

/// Returns flood-positive analysis results that have no current risk
/// assessment, oldest first.
///
/// This is the batch-scoring work queue; each returned report is scored
/// independently of its siblings.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn pending_analyses(
    db: &dyn Database,
    limit: u32,
) -> Result<Vec<PendingAnalysisRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT a.report_id, a.urgency_score, a.extracted_state, a.extracted_city
             FROM analysis_results a
             LEFT JOIN risk_scores r ON r.report_id = a.report_id
             WHERE a.flood_detected AND r.id IS NULL
             ORDER BY a.report_id ASC
             LIMIT $1",
            &[DatabaseValue::Int64(i64::from(limit))],
        )
        .await?;

    let mut pending = Vec::with_capacity(rows.len());
    for row in &rows {
        let report_id: i64 = row.to_value("report_id").unwrap_or(0);
        let urgency_val: i32 = row.to_value("urgency_score").unwrap_or(0);
        let Ok(urgency_score) = UrgencyScore::new(u8::try_from(urgency_val).unwrap_or(0)) else {
            log::warn!("Skipping report {report_id}: stored urgency {urgency_val} out of range");
            continue;
        };

        pending.push(PendingAnalysisRow {
            report_id,
            urgency_score,
            extracted_state: row.to_value("extracted_state").unwrap_or(None),
            extracted_city: row.to_value("extracted_city").unwrap_or(None),
        });
    }

    Ok(pending)
}

/// Returns assessments calculated within a freshness window, joined with
/// their reports' extracted locations, most recent first.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn recent_assessments(
    db: &dyn Database,
    window: &AssessmentWindow,
) -> Result<Vec<AssessmentLocationRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT r.id as assessment_id, r.report_id, r.final_score, r.risk_level,
                    r.calculated_at, a.extracted_state, a.extracted_city
             FROM risk_scores r
             JOIN analysis_results a ON a.report_id = r.report_id
             WHERE r.calculated_at >= $1 AND r.calculated_at <= $2
             ORDER BY r.calculated_at DESC
             LIMIT $3",
            &[
                DatabaseValue::DateTime(window.since.naive_utc()),
                DatabaseValue::DateTime(window.until.naive_utc()),
                DatabaseValue::Int64(i64::from(window.limit)),
            ],
        )
        .await?;

    let mut assessments = Vec::with_capacity(rows.len());
    for row in &rows {
        let assessment_id: i64 = row.to_value("assessment_id").unwrap_or(0);
        let level_name: String = row.to_value("risk_level").unwrap_or_default();
        let Ok(risk_level) = level_name.parse::<RiskLevel>() else {
            log::warn!("Skipping assessment {assessment_id}: invalid risk level {level_name:?}");
            continue;
        };

        assessments.push(AssessmentLocationRow {
            assessment_id,
            report_id: row.to_value("report_id").unwrap_or(0),
            final_score: row.to_value("final_score").unwrap_or(0.0),
            risk_level,
            calculated_at: parse_utc(row.to_value("calculated_at").unwrap_or_default()),
            extracted_state: row.to_value("extracted_state").unwrap_or(None),
            extracted_city: row.to_value("extracted_city").unwrap_or(None),
        });
    }

    Ok(assessments)
}

/// Returns the analysis result for a report, if one exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn analysis_for_report(
    db: &dyn Database,
    report_id: i64,
) -> Result<Option<AnalysisResultRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, report_id, flood_detected, urgency_score,
                    extracted_state, extracted_city, analyzed_at
             FROM analysis_results
             WHERE report_id = $1
             ORDER BY analyzed_at DESC
             LIMIT 1",
            &[DatabaseValue::Int64(report_id)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let urgency_val: i32 = row.to_value("urgency_score").unwrap_or(0);
    let urgency_score = UrgencyScore::new(u8::try_from(urgency_val).unwrap_or(0)).map_err(|e| {
        DbError::Conversion {
            message: format!("Invalid stored urgency score: {e}"),
        }
    })?;

    Ok(Some(AnalysisResultRow {
        id: row.to_value("id").unwrap_or(0),
        report_id: row.to_value("report_id").unwrap_or(0),
        flood_detected: row.to_value("flood_detected").unwrap_or(false),
        urgency_score,
        extracted_state: row.to_value("extracted_state").unwrap_or(None),
        extracted_city: row.to_value("extracted_city").unwrap_or(None),
        analyzed_at: parse_utc(row.to_value("analyzed_at").unwrap_or_default()),
    }))
}

/// Converts a naive database timestamp into UTC.
fn parse_utc(naive: chrono::NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}
