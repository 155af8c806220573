//! Persisting risk scorer.

use std::sync::Arc;

use chrono::Utc;
use flood_map_database::queries;
use flood_map_database_models::RiskAssessmentRow;
use flood_map_risk_models::{UrgencyScore, WarningSeverity};
use switchy_database::Database;

use crate::recommendation::recommendation_for;
use crate::score::{ScoringPolicy, compute_risk};
use crate::ScoreError;

/// Scores reports and persists one assessment row per report.
///
/// Re-scoring a report with identical inputs produces the same score and
/// level; only `calculated_at` moves. The upsert is a single atomic
/// statement, so concurrent scoring of the same report degrades to
/// last-write-wins without interleaved partial updates.
pub struct RiskScorer {
    db: Arc<dyn Database>,
    policy: ScoringPolicy,
}

impl RiskScorer {
    /// Creates a scorer with the given fusion policy.
    #[must_use]
    pub fn new(db: Arc<dyn Database>, policy: ScoringPolicy) -> Self {
        Self { db, policy }
    }

    /// Scores one report and upserts its assessment.
    ///
    /// `None` for `warning` means the severity is unknown for the
    /// report's district today; the score runs with level 0 and the
    /// recommendation carries a provisional note.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] if the upsert fails. Invalid inputs are
    /// rejected by the typed arguments before this function can be
    /// called, so no write occurs for them.
    pub async fn score_report(
        &self,
        report_id: i64,
        urgency: UrgencyScore,
        warning: Option<WarningSeverity>,
    ) -> Result<RiskAssessmentRow, ScoreError> {
        let result = compute_risk(&self.policy, urgency, warning);
        let recommendation = recommendation_for(result.risk_level, result.low_confidence);
        let calculated_at = Utc::now();

        let id = queries::upsert_risk_assessment(
            self.db.as_ref(),
            report_id,
            result.final_score,
            result.risk_level,
            &recommendation,
            calculated_at,
        )
        .await?;

        log::debug!(
            "Scored report {report_id}: {:.1} ({})",
            result.final_score,
            result.risk_level
        );

        Ok(RiskAssessmentRow {
            id,
            report_id,
            final_score: result.final_score,
            risk_level: result.risk_level,
            recommendation,
            calculated_at,
        })
    }
}
