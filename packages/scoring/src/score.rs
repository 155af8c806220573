//! The risk fusion function.
//!
//! Deterministic and free of side effects: the same inputs always produce
//! the same score and level, which is what makes re-scoring idempotent
//! and the batch pipeline safe to retry.

use flood_map_risk_models::{RiskLevel, UrgencyScore, WarningSeverity};

use crate::ScoreError;

/// Fusion weights for the urgency and warning signals.
///
/// The defaults are operational policy, not physics; they are passed in
/// at construction so deployments can tune them without code changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    /// Weight applied to the text-derived urgency (0-10 scale).
    pub urgency_weight: f64,
    /// Weight applied to the normalized warning severity (0-10 scale).
    pub warning_weight: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            urgency_weight: 0.6,
            warning_weight: 0.4,
        }
    }
}

/// Result of fusing one report's signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScore {
    /// Fused score in [1.0, 10.0], rounded to one decimal.
    pub final_score: f64,
    /// Categorical band for the score.
    pub risk_level: RiskLevel,
    /// Whether the warning severity was missing (scored as level 0).
    ///
    /// Feeds the recommendation text only — the numeric score and level
    /// stay independent of confidence so they remain deterministic.
    pub low_confidence: bool,
}

/// Fuses an urgency score with a warning severity.
///
/// `None` for `warning` means the severity is unknown; the formula runs
/// with level 0 and the result is flagged low-confidence.
#[must_use]
pub fn compute_risk(
    policy: &ScoringPolicy,
    urgency: UrgencyScore,
    warning: Option<WarningSeverity>,
) -> RiskScore {
    // Normalize 0-4 onto the 0-10 scale the urgency already uses.
    let warning_10 = warning.map_or(0.0, |w| f64::from(w.value()) / 4.0 * 10.0);

    let fused =
        f64::from(urgency.value()) * policy.urgency_weight + warning_10 * policy.warning_weight;
    let final_score = (fused.clamp(1.0, 10.0) * 10.0).round() / 10.0;

    RiskScore {
        final_score,
        risk_level: RiskLevel::from_score(final_score),
        low_confidence: warning.is_none(),
    }
}

/// Validates raw integer inputs, then fuses them.
///
/// This is the boundary form of [`compute_risk`] for callers holding
/// unvalidated collaborator values.
///
/// # Errors
///
/// Returns [`ScoreError`] if `urgency` is outside 1-10 or `warning` is
/// `Some` and outside 0-4. Nothing is written on rejection.
pub fn compute_risk_raw(
    policy: &ScoringPolicy,
    urgency: u8,
    warning: Option<u8>,
) -> Result<RiskScore, ScoreError> {
    let urgency = UrgencyScore::new(urgency)?;
    let warning = warning.map(WarningSeverity::from_value).transpose()?;
    Ok(compute_risk(policy, urgency, warning))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(urgency: u8, warning: Option<u8>) -> RiskScore {
        compute_risk_raw(&ScoringPolicy::default(), urgency, warning).unwrap()
    }

    #[test]
    fn worked_example_high() {
        // w10 = 3/4*10 = 7.5; 8*0.6 + 7.5*0.4 = 7.8
        let result = score(8, Some(3));
        assert!((result.final_score - 7.8).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn worked_example_low() {
        let result = score(2, Some(0));
        assert!((result.final_score - 1.2).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn clamps_to_lower_bound() {
        let result = score(1, Some(0));
        assert!((result.final_score - 1.0).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn maximum_inputs_stay_in_range() {
        let result = score(10, Some(4));
        assert!((result.final_score - 10.0).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn full_grid_stays_in_range_and_is_deterministic() {
        for urgency in 1..=10 {
            for warning in 0..=4 {
                let first = score(urgency, Some(warning));
                let second = score(urgency, Some(warning));
                assert!(first.final_score >= 1.0 && first.final_score <= 10.0);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn unknown_warning_scores_as_level_zero_but_flags_confidence() {
        let unknown = score(6, None);
        let zero = score(6, Some(0));
        assert!((unknown.final_score - zero.final_score).abs() < 1e-9);
        assert_eq!(unknown.risk_level, zero.risk_level);
        assert!(unknown.low_confidence);
        assert!(!zero.low_confidence);
    }

    #[test]
    fn rejects_out_of_range_urgency() {
        let policy = ScoringPolicy::default();
        assert!(matches!(
            compute_risk_raw(&policy, 0, Some(2)),
            Err(ScoreError::InvalidUrgency(_))
        ));
        assert!(matches!(
            compute_risk_raw(&policy, 11, Some(2)),
            Err(ScoreError::InvalidUrgency(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_warning_level() {
        assert!(matches!(
            compute_risk_raw(&ScoringPolicy::default(), 5, Some(5)),
            Err(ScoreError::InvalidWarningLevel(_))
        ));
    }

    #[test]
    fn score_is_monotonic_in_warning_level() {
        for urgency in 1..=10 {
            let mut prev = score(urgency, Some(0)).final_score;
            for warning in 1..=4 {
                let current = score(urgency, Some(warning)).final_score;
                assert!(current >= prev);
                prev = current;
            }
        }
    }
}
