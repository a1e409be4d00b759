//! Biometric input types for risk assessment.
//!
//! One snapshot of the five tracked health measurements, entered once and
//! immutable from the engine's point of view.

use serde::{Deserialize, Serialize};

/// Biological sex as used by the prediction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(format!("Unknown sex '{other}', expected male or female")),
        }
    }
}

/// One self-reported biometric snapshot.
///
/// Field names on the wire match the stored-record format
/// (`systolicBP`, `heartRate`, ...), so a previously exported history
/// deserializes unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiometricInput {
    /// Age in years (1-120)
    pub age: u32,

    /// Biological sex
    pub sex: Sex,

    /// Systolic blood pressure in mmHg
    #[serde(rename = "systolicBP")]
    pub systolic_bp: i32,

    /// Diastolic blood pressure in mmHg
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: i32,

    /// Resting heart rate in bpm
    #[serde(rename = "heartRate")]
    pub heart_rate: i32,

    /// Body mass index
    pub bmi: f64,
}

impl BiometricInput {
    /// Validate that all measurements are within plausible ranges.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(1..=120).contains(&self.age) {
            errors.push(format!("Age {} out of range [1, 120]", self.age));
        }
        if !(50..=250).contains(&self.systolic_bp) {
            errors.push(format!(
                "Systolic BP {} out of range [50, 250]",
                self.systolic_bp
            ));
        }
        if !(30..=150).contains(&self.diastolic_bp) {
            errors.push(format!(
                "Diastolic BP {} out of range [30, 150]",
                self.diastolic_bp
            ));
        }
        if !(20..=250).contains(&self.heart_rate) {
            errors.push(format!(
                "Heart rate {} out of range [20, 250]",
                self.heart_rate
            ));
        }
        if !self.bmi.is_finite() || !(10.0..=70.0).contains(&self.bmi) {
            errors.push(format!("BMI {} out of range [10, 70]", self.bmi));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
