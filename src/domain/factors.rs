//! Explanatory risk factors: per-measurement narratives for display.
//!
//! Pure derivation from the biometric input plus optional weights. The
//! impact thresholds intentionally mirror the rule-engine bands in
//! [`super::rules`] but are defined against the raw input, not the computed
//! score; the test module pins that coupling.

use serde::{Deserialize, Serialize};

use super::{BiometricInput, Sex, ShapValues};

/// Qualitative impact of one factor.
///
/// Serialized capitalized (`"High"`) to match the stored-record format;
/// distinct from the lowercase risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

/// One displayable risk factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Factor name ("Age", "Blood Pressure", ...)
    pub name: String,

    /// Formatted measurement ("56 years", "140/90 mmHg", ...)
    pub value: String,

    /// Qualitative impact band
    pub impact: Impact,

    /// Static narrative text
    pub description: String,

    /// Explanatory weight for this factor, when one was supplied
    #[serde(rename = "shapValue", default, skip_serializing_if = "Option::is_none")]
    pub shap_value: Option<f64>,
}

/// Derive the five risk factors in fixed order: Age, Blood Pressure,
/// Heart Rate, BMI, Sex.
///
/// Never fails: non-finite measurements still produce a formatted string.
#[must_use]
pub fn generate_factors(input: &BiometricInput, weights: &ShapValues) -> Vec<RiskFactor> {
    vec![
        RiskFactor {
            name: "Age".to_string(),
            value: format!("{} years", input.age),
            impact: if input.age > 60 {
                Impact::High
            } else if input.age > 40 {
                Impact::Moderate
            } else {
                Impact::Low
            },
            description: "Age is a significant risk factor for both cardiovascular and \
                neurological conditions. As we age, blood vessels lose elasticity, heart \
                muscle weakens, and the brain becomes more susceptible to degenerative \
                changes. Risk increases substantially after age 60."
                .to_string(),
            shap_value: weights.age,
        },
        RiskFactor {
            name: "Blood Pressure".to_string(),
            value: format!("{}/{} mmHg", input.systolic_bp, input.diastolic_bp),
            impact: if input.systolic_bp > 140 || input.diastolic_bp > 90 {
                Impact::High
            } else if input.systolic_bp > 130 {
                Impact::Moderate
            } else {
                Impact::Low
            },
            description: "High blood pressure (hypertension) damages blood vessels \
                throughout the body, including those in the heart and brain. It \
                significantly increases the risk of heart attack, heart failure, stroke, \
                and vascular dementia. Normal BP is below 120/80 mmHg."
                .to_string(),
            shap_value: weights.systolic_bp,
        },
        RiskFactor {
            name: "Heart Rate".to_string(),
            value: format!("{} bpm", input.heart_rate),
            impact: if input.heart_rate > 100 || input.heart_rate < 50 {
                Impact::Moderate
            } else {
                Impact::Low
            },
            description: "Resting heart rate reflects cardiovascular fitness. A \
                consistently high heart rate (>100 bpm) may indicate poor cardiovascular \
                health, stress, or underlying conditions. Very low rates (<50 bpm) in \
                non-athletes may suggest heart conduction issues. Normal range is 60-100 \
                bpm."
                .to_string(),
            shap_value: weights.heart_rate,
        },
        RiskFactor {
            name: "Body Mass Index (BMI)".to_string(),
            value: format!("{:.1}", input.bmi),
            impact: if input.bmi > 30.0 || input.bmi < 18.5 {
                Impact::High
            } else if input.bmi > 25.0 {
                Impact::Moderate
            } else {
                Impact::Low
            },
            description: "BMI is a measure of body fat based on height and weight. \
                Obesity (BMI >30) increases risk of heart disease, diabetes, stroke, and \
                certain cancers. Being underweight (BMI <18.5) is also associated with \
                health risks. Healthy range is 18.5-24.9."
                .to_string(),
            shap_value: weights.bmi,
        },
        RiskFactor {
            name: "Sex".to_string(),
            value: match input.sex {
                Sex::Male => "Male".to_string(),
                Sex::Female => "Female".to_string(),
            },
            impact: if input.sex == Sex::Male && input.age > 45 {
                Impact::Moderate
            } else {
                Impact::Low
            },
            description: "Biological sex affects cardiovascular risk. Men typically face \
                higher heart disease risk at younger ages, while women's risk increases \
                after menopause. Hormonal differences, body composition, and lifestyle \
                factors contribute to these variations in risk profiles."
                .to_string(),
            shap_value: weights.sex,
        },
    ]
}
