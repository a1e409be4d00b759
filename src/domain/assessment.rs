//! Risk assessment result types.
//!
//! A score is an integer on a 0-100 scale; the band (low/moderate/high) is
//! always derived from the score, never stored independently of it.

use serde::{Deserialize, Serialize};

/// Risk band classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 30
    Low,
    /// Score in [30, 60)
    Moderate,
    /// Score of 60 or above
    High,
}

impl RiskLevel {
    /// Derive the band from a 0-100 score.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score < 30 {
            Self::Low
        } else if score < 60 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Moderate => "Moderate risk - Follow-up recommended",
            Self::High => "High risk - Consultation advised",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => Err(format!(
                "Unknown risk level '{other}', expected low, moderate or high"
            )),
        }
    }
}

/// A single scored dimension: the integer score plus its derived band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Risk band derived from `score`
    pub risk: RiskLevel,

    /// Integer score on a 0-100 scale
    pub score: u8,
}

impl RiskScore {
    /// Build a score from already-banded integer points.
    #[must_use]
    pub fn from_points(score: u8) -> Self {
        let score = score.min(100);
        Self {
            risk: RiskLevel::from_score(score),
            score,
        }
    }

    /// Build a score from a raw floating-point value, clamping to [0, 100]
    /// and rounding to the nearest integer.
    ///
    /// Non-finite input is treated as zero.
    #[must_use]
    pub fn from_raw(raw: f64) -> Self {
        let raw = if raw.is_finite() { raw } else { 0.0 };
        Self::from_points(raw.clamp(0.0, 100.0).round() as u8)
    }
}

/// Combined cardiovascular and neurological assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Heart-disease risk (remote model when reachable, rule engine otherwise)
    #[serde(rename = "heartDisease")]
    pub heart_disease: RiskScore,

    /// Neurological-disorder risk (always computed locally)
    #[serde(rename = "neurologicalDisorders")]
    pub neurological: RiskScore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn test_from_raw_clamps_and_rounds() {
        assert_eq!(RiskScore::from_raw(120.0).score, 100);
        assert_eq!(RiskScore::from_raw(-5.0).score, 0);
        assert_eq!(RiskScore::from_raw(29.5).score, 30);
        assert_eq!(RiskScore::from_raw(29.5).risk, RiskLevel::Moderate);
        assert_eq!(RiskScore::from_raw(f64::NAN).score, 0);
    }

    #[test]
    fn test_wire_field_names() {
        let assessment = RiskAssessment {
            heart_disease: RiskScore::from_points(65),
            neurological: RiskScore::from_points(10),
        };
        let json = serde_json::to_value(assessment).expect("Should serialize");
        assert_eq!(json["heartDisease"]["risk"], "high");
        assert_eq!(json["heartDisease"]["score"], 65);
        assert_eq!(json["neurologicalDisorders"]["risk"], "low");
    }
}
