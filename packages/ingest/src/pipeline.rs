//! Per-report batch scoring pipeline.
//!
//! Pulls flood-positive analyses that have no current assessment and
//! scores each one: resolve the report's place mention, look up today's
//! district warning severity, fuse, upsert. Failures are isolated per
//! report — the batch keeps going and the outcome counts tell the
//! scheduler what to retry.

use chrono::Utc;
use flood_map_database::queries;
use flood_map_geography::Gazetteer;
use flood_map_scoring::RiskScorer;
use flood_map_warnings::WarningAggregator;
use switchy_database::Database;

use crate::IngestError;

/// Summary of one batch-scoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Reports scored and persisted.
    pub scored: u32,
    /// Scored reports whose warning severity was unknown (no district
    /// resolved, or no observation for today).
    pub unknown_warning: u32,
    /// Reports that failed and were left for the scheduler to retry.
    pub failed: u32,
}

/// Scores up to `limit` pending reports.
///
/// Reports whose location does not resolve are still scored — an
/// unresolved location only excludes them from the hazard index, not
/// from risk assessment — but their warning severity is unknown.
///
/// # Errors
///
/// Returns [`IngestError`] only when the work-queue query itself fails;
/// per-report failures are counted in the outcome instead.
pub async fn score_pending(
    db: &dyn Database,
    gazetteer: &Gazetteer,
    warnings: &WarningAggregator,
    scorer: &RiskScorer,
    limit: u32,
) -> Result<BatchOutcome, IngestError> {
    let pending = queries::pending_analyses(db, limit).await?;
    let today = Utc::now().date_naive();

    let mut outcome = BatchOutcome::default();

    for row in pending {
        let resolved = gazetteer.resolve(
            row.extracted_state.as_deref(),
            row.extracted_city.as_deref(),
        );
        let district_id = resolved.and_then(|location| location.district_id);

        let severity = match &district_id {
            Some(district) => match warnings.severity_for(district, today).await {
                Ok(severity) => severity,
                Err(e) => {
                    log::error!("Warning lookup failed for report {}: {e}", row.report_id);
                    outcome.failed += 1;
                    continue;
                }
            },
            None => None,
        };

        if severity.is_none() {
            outcome.unknown_warning += 1;
        }

        match scorer
            .score_report(row.report_id, row.urgency_score, severity)
            .await
        {
            Ok(assessment) => {
                outcome.scored += 1;
                log::debug!(
                    "Report {} scored {:.1} ({})",
                    row.report_id,
                    assessment.final_score,
                    assessment.risk_level
                );
            }
            Err(e) => {
                log::error!("Scoring failed for report {}: {e}", row.report_id);
                outcome.failed += 1;
            }
        }
    }

    log::info!(
        "Batch scoring complete: {} scored ({} with unknown warnings), {} failed",
        outcome.scored,
        outcome.unknown_warning,
        outcome.failed
    );

    Ok(outcome)
}
