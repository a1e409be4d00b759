//! Explanatory (SHAP) weights: per-factor signed influence values.
//!
//! Weights arrive from two sources: the remote prediction response, or JSON
//! the user pastes in from an out-of-band model explanation. Any subset of
//! keys may be present; an absent key means zero influence.

use serde::{Deserialize, Serialize};

/// Error for user-supplied SHAP JSON that fails to parse.
///
/// A rejection here leaves previously loaded weights untouched; weights are
/// never partially applied.
#[derive(Debug, thiserror::Error)]
#[error("Invalid SHAP values JSON: {0}")]
pub struct ShapParseError(#[from] serde_json::Error);

/// Partial per-factor explanatory weights.
///
/// Deserialization accepts the alias spellings seen in exported model
/// explanations (`Age`, `systolic_bp`, `SystolicBP`, ...). Unknown keys
/// such as `fbs` are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapValues {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "Age")]
    pub age: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "Sex")]
    pub sex: Option<f64>,

    #[serde(
        rename = "systolicBP",
        default,
        skip_serializing_if = "Option::is_none",
        alias = "systolic_bp",
        alias = "SystolicBP"
    )]
    pub systolic_bp: Option<f64>,

    #[serde(
        rename = "diastolicBP",
        default,
        skip_serializing_if = "Option::is_none",
        alias = "diastolic_bp",
        alias = "DiastolicBP"
    )]
    pub diastolic_bp: Option<f64>,

    #[serde(
        rename = "heartRate",
        default,
        skip_serializing_if = "Option::is_none",
        alias = "heart_rate",
        alias = "HeartRate"
    )]
    pub heart_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "BMI")]
    pub bmi: Option<f64>,
}

impl ShapValues {
    /// Parse weights from user-pasted JSON.
    ///
    /// # Errors
    /// Returns `ShapParseError` if the text is not a JSON object with
    /// numeric (or absent) weight fields. Nothing is applied on failure.
    pub fn from_json(json: &str) -> Result<Self, ShapParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Overlay `self` on top of `base`: keys present in `self` win, absent
    /// keys fall through to `base`.
    ///
    /// Used to merge remote-supplied weights over manually loaded ones; the
    /// remote source is treated as authoritative for the keys it reports.
    #[must_use]
    pub fn overlaid_on(self, base: Self) -> Self {
        Self {
            age: self.age.or(base.age),
            sex: self.sex.or(base.sex),
            systolic_bp: self.systolic_bp.or(base.systolic_bp),
            diastolic_bp: self.diastolic_bp.or(base.diastolic_bp),
            heart_rate: self.heart_rate.or(base.heart_rate),
            bmi: self.bmi.or(base.bmi),
        }
    }

    /// True if no weight is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.sex.is_none()
            && self.systolic_bp.is_none()
            && self.diastolic_bp.is_none()
            && self.heart_rate.is_none()
            && self.bmi.is_none()
    }
}
