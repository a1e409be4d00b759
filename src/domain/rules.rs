//! Deterministic rule engine for risk scoring.
//!
//! The heart-disease table is the fallback when the remote model is
//! unreachable; the neurological table always runs locally. Both are pure
//! functions of the input and the supplied weights: identical input always
//! yields identical scores.
//!
//! Each factor contributes its highest matching band only; bands within a
//! factor are exclusive and never stack.

use super::{BiometricInput, Sex, ShapValues};

fn clamp_round(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

/// Rule-based heart-disease score on a 0-100 scale.
///
/// Used only when the remote prediction is unavailable.
#[must_use]
pub fn heart_score(input: &BiometricInput, weights: &ShapValues) -> u8 {
    let mut score = 0.0;

    if input.age > 65 {
        score += 30.0;
    } else if input.age > 50 {
        score += 20.0;
    } else if input.age > 40 {
        score += 10.0;
    }

    if input.systolic_bp > 140 || input.diastolic_bp > 90 {
        score += 25.0;
    } else if input.systolic_bp > 130 || input.diastolic_bp > 85 {
        score += 15.0;
    }

    if input.heart_rate > 100 {
        score += 15.0;
    } else if input.heart_rate < 50 {
        score += 10.0;
    }

    if input.bmi > 30.0 {
        score += 20.0;
    } else if input.bmi > 25.0 {
        score += 10.0;
    } else if input.bmi < 18.5 {
        score += 10.0;
    }

    if input.sex == Sex::Male && input.age > 45 {
        score += 10.0;
    }

    if let Some(w) = weights.age {
        score += w * 10.0;
    }
    if let Some(w) = weights.systolic_bp {
        score += w * 10.0;
    }

    clamp_round(score)
}

/// Rule-based neurological-disorder score on a 0-100 scale.
///
/// Always computed locally; the remote model scores heart disease only.
#[must_use]
pub fn neuro_score(input: &BiometricInput, weights: &ShapValues) -> u8 {
    let mut score = 0.0;

    if input.age > 70 {
        score += 35.0;
    } else if input.age > 60 {
        score += 25.0;
    } else if input.age > 50 {
        score += 15.0;
    }

    if input.systolic_bp > 140 {
        score += 20.0;
    } else if input.systolic_bp > 130 {
        score += 10.0;
    }

    if input.bmi > 30.0 {
        score += 15.0;
    } else if input.bmi < 18.5 {
        score += 10.0;
    }

    if let Some(w) = weights.age {
        score += w * 12.0;
    }
    if let Some(w) = weights.bmi {
        score += w * 8.0;
    }

    clamp_round(score)
}
