#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Risk taxonomy types and severity definitions for the flood map.
//!
//! This crate defines the canonical vocabulary shared across the system:
//! the categorical risk level derived from a fused score, the official
//! meteorological warning severity scale, the text-derived urgency score,
//! and the supported travel modes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Categorical risk level for a scored flood report.
///
/// Derived from the fused numeric score via [`RiskLevel::from_score`].
/// Bands are inclusive on their lower bound: a score of exactly 3.0 is
/// still `Low`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Final score in [1.0, 3.0]
    Low,
    /// Final score in (3.0, 6.0]
    Moderate,
    /// Final score in (6.0, 8.0]
    High,
    /// Final score in (8.0, 10.0]
    Critical,
}

impl RiskLevel {
    /// Returns the fixed monotonic weight used when summing route exposure.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Moderate => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Maps a final score onto its categorical band.
    ///
    /// Callers are expected to pass scores already clamped to [1.0, 10.0];
    /// anything above the `High` band is `Critical`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            Self::Low
        } else if score <= 6.0 {
            Self::Moderate
        } else if score <= 8.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Moderate, Self::High, Self::Critical]
    }
}

/// Official meteorological warning severity for a district on a date.
///
/// Level 0 (`None`) means "no active warning" and is distinct from missing
/// data: absence of an observation is represented as `Option::None` by the
/// warning aggregator, never as `WarningSeverity::None`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningSeverity {
    /// Level 0: no active warning
    None = 0,
    /// Level 1: advisory
    Advisory = 1,
    /// Level 2: watch
    Watch = 2,
    /// Level 3: warning
    Warning = 3,
    /// Level 4: emergency
    Emergency = 4,
}

impl WarningSeverity {
    /// Returns the numeric level of this severity (0-4).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity from a numeric level.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-4.
    pub const fn from_value(value: u8) -> Result<Self, InvalidWarningLevelError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Advisory),
            2 => Ok(Self::Watch),
            3 => Ok(Self::Warning),
            4 => Ok(Self::Emergency),
            _ => Err(InvalidWarningLevelError { value }),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::Advisory,
            Self::Watch,
            Self::Warning,
            Self::Emergency,
        ]
    }
}

/// Error returned when attempting to create a [`WarningSeverity`] from an
/// invalid numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWarningLevelError {
    /// The invalid level that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidWarningLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid warning level {}: expected 0-4", self.value)
    }
}

impl std::error::Error for InvalidWarningLevelError {}

/// Text-derived urgency estimate for a flood report, on a 1-10 scale.
///
/// Produced by the NLP collaborator; validated here so the scorer can rely
/// on the range invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrgencyScore(u8);

impl UrgencyScore {
    /// Creates an urgency score from a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-10.
    pub const fn new(value: u8) -> Result<Self, InvalidUrgencyError> {
        if matches!(value, 1..=10) {
            Ok(Self(value))
        } else {
            Err(InvalidUrgencyError { value })
        }
    }

    /// Returns the numeric value of this score (1-10).
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Error returned when attempting to create an [`UrgencyScore`] from an
/// invalid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidUrgencyError {
    /// The invalid urgency value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidUrgencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid urgency score {}: expected 1-10", self.value)
    }
}

impl std::error::Error for InvalidUrgencyError {}

/// Travel mode for a route query, passed through to the routing provider.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    /// Motor vehicle
    #[default]
    Drive,
    /// On foot
    Walk,
    /// Motorcycle / scooter
    TwoWheeler,
}
