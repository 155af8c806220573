//! Traveler-facing recommendation text per risk level.

use flood_map_risk_models::RiskLevel;

/// Returns the recommendation for a risk level.
///
/// When the score was computed without official warning data the text
/// carries a provisional note; the numeric score never does.
#[must_use]
pub fn recommendation_for(level: RiskLevel, low_confidence: bool) -> String {
    let base = match level {
        RiskLevel::Critical => {
            "Danger: Avoid travel in affected areas; move to higher ground and follow official instructions."
        }
        RiskLevel::High => {
            "High risk: Monitor official warnings, prepare evacuation plan, avoid low-lying areas."
        }
        RiskLevel::Moderate => {
            "Moderate risk: Stay alert, check local advisories, avoid flood-prone roads."
        }
        RiskLevel::Low => "Low risk: No immediate action needed; stay informed of updates.",
    };

    if low_confidence {
        format!("{base} No official warning data was available for this area.")
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_text() {
        for level in RiskLevel::all() {
            assert!(!recommendation_for(*level, false).is_empty());
        }
    }

    #[test]
    fn low_confidence_appends_provisional_note() {
        let confident = recommendation_for(RiskLevel::High, false);
        let provisional = recommendation_for(RiskLevel::High, true);
        assert!(provisional.starts_with(&confident));
        assert!(provisional.contains("No official warning data"));
    }
}
