//! Scoring service: Orchestrates remote prediction with rule-based fallback.
//!
//! One assessment makes at most one remote attempt. Any remote failure is
//! absorbed here: the caller always receives a complete assessment, scored
//! by the deterministic rule engine when the service is unreachable. The
//! neurological score never leaves this process; the remote model only
//! scores heart disease.

use std::sync::Arc;

use crate::domain::{
    generate_factors, rules, BiometricInput, RiskAssessment, RiskFactor, RiskScore, ShapValues,
};
use crate::ports::{PredictionRequest, Predictor};

/// Where the heart-disease score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// Remote model responded
    Remote,
    /// Remote unavailable; deterministic rule engine used
    RuleBased,
}

/// Complete outcome of one assessment, ready for display or persistence.
#[derive(Debug, Clone)]
pub struct AssessmentOutcome {
    /// The input that was assessed
    pub input: BiometricInput,

    /// Heart and neuro scores with their bands
    pub assessment: RiskAssessment,

    /// The five explanatory factors, derived from the input and the
    /// manually supplied weights
    pub factors: Vec<RiskFactor>,

    /// The manually supplied weights, carried for persistence
    pub shap_values: Option<ShapValues>,

    /// Which path produced the heart score
    pub source: ScoreSource,
}

/// Service for computing risk assessments.
pub struct ScoringService<P: Predictor> {
    predictor: Arc<P>,
}

impl<P: Predictor> ScoringService<P> {
    /// Create a new scoring service.
    pub fn new(predictor: Arc<P>) -> Self {
        Self { predictor }
    }

    /// Compute a full assessment for one biometric snapshot.
    ///
    /// Weight handling: `manual` weights apply as-is to the heart fallback
    /// path. For the neurological score, weights reported by the remote
    /// model override the manual ones on overlapping keys; the remote
    /// source is authoritative for the factors it explains.
    ///
    /// Infallible by design: remote failures are logged and replaced by the
    /// rule engine's result.
    pub async fn assess(
        &self,
        input: &BiometricInput,
        manual: Option<ShapValues>,
    ) -> AssessmentOutcome {
        let manual_weights = manual.unwrap_or_default();
        let request = PredictionRequest::from(input);

        let (heart, neuro_weights, source) = match self.predictor.predict(&request).await {
            Ok(response) => {
                tracing::debug!(
                    risk_score = response.risk_score,
                    probability = response.probability,
                    "Remote prediction succeeded"
                );
                let weights = match response.shap_values {
                    Some(remote) => remote.overlaid_on(manual_weights),
                    None => manual_weights,
                };
                (
                    RiskScore::from_raw(response.risk_score),
                    weights,
                    ScoreSource::Remote,
                )
            }
            Err(err) => {
                tracing::warn!(
                    "Remote prediction failed, falling back to rule-based scoring: {err}"
                );
                (
                    RiskScore::from_points(rules::heart_score(input, &manual_weights)),
                    manual_weights,
                    ScoreSource::RuleBased,
                )
            }
        };

        let neuro = RiskScore::from_points(rules::neuro_score(input, &neuro_weights));

        AssessmentOutcome {
            input: *input,
            assessment: RiskAssessment {
                heart_disease: heart,
                neurological: neuro,
            },
            factors: generate_factors(input, &manual_weights),
            shap_values: manual.filter(|w| !w.is_empty()),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskLevel, Sex};
    use crate::ports::{HealthStatus, PredictionError, PredictionResponse};
    use async_trait::async_trait;

    /// Predictor scripted to either fail or return a fixed response.
    enum ScriptedPredictor {
        Down,
        Respond { risk_score: f64, shap: Option<ShapValues> },
    }

    #[async_trait]
    impl Predictor for ScriptedPredictor {
        async fn predict(
            &self,
            _request: &PredictionRequest,
        ) -> Result<PredictionResponse, PredictionError> {
            match self {
                Self::Down => Err(PredictionError::Transport("connection refused".into())),
                Self::Respond { risk_score, shap } => Ok(PredictionResponse {
                    prediction: if *risk_score >= 50.0 { 1.0 } else { 0.0 },
                    probability: risk_score / 100.0,
                    risk_level: RiskLevel::from_score(*risk_score as u8),
                    risk_score: *risk_score,
                    shap_values: *shap,
                }),
            }
        }

        async fn health(&self) -> Result<HealthStatus, PredictionError> {
            Err(PredictionError::Transport("not scripted".into()))
        }
    }

    fn high_risk_input() -> BiometricInput {
        BiometricInput {
            age: 70,
            sex: Sex::Male,
            systolic_bp: 150,
            diastolic_bp: 95,
            heart_rate: 110,
            bmi: 32.0,
        }
    }

    fn low_risk_input() -> BiometricInput {
        BiometricInput {
            age: 30,
            sex: Sex::Female,
            systolic_bp: 110,
            diastolic_bp: 70,
            heart_rate: 70,
            bmi: 22.0,
        }
    }

    #[tokio::test]
    async fn test_fallback_scores_high_risk_profile() {
        let service = ScoringService::new(Arc::new(ScriptedPredictor::Down));
        let outcome = service.assess(&high_risk_input(), None).await;

        assert_eq!(outcome.source, ScoreSource::RuleBased);
        assert_eq!(outcome.assessment.heart_disease.score, 100);
        assert_eq!(outcome.assessment.heart_disease.risk, RiskLevel::High);
        assert_eq!(outcome.assessment.neurological.score, 70);
        assert_eq!(outcome.assessment.neurological.risk, RiskLevel::High);
    }

    #[tokio::test]
    async fn test_fallback_scores_low_risk_profile() {
        let service = ScoringService::new(Arc::new(ScriptedPredictor::Down));
        let outcome = service.assess(&low_risk_input(), None).await;

        assert_eq!(outcome.assessment.heart_disease.score, 0);
        assert_eq!(outcome.assessment.heart_disease.risk, RiskLevel::Low);
        assert_eq!(outcome.assessment.neurological.score, 0);
        assert_eq!(outcome.assessment.neurological.risk, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic() {
        let service = ScoringService::new(Arc::new(ScriptedPredictor::Down));
        let weights = ShapValues {
            age: Some(0.3),
            systolic_bp: Some(-0.1),
            ..ShapValues::default()
        };

        let first = service
            .assess(&high_risk_input(), Some(weights))
            .await
            .assessment;
        for _ in 0..5 {
            let again = service
                .assess(&high_risk_input(), Some(weights))
                .await
                .assessment;
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn test_remote_score_used_when_available() {
        let service = ScoringService::new(Arc::new(ScriptedPredictor::Respond {
            risk_score: 42.4,
            shap: None,
        }));
        let outcome = service.assess(&high_risk_input(), None).await;

        assert_eq!(outcome.source, ScoreSource::Remote);
        assert_eq!(outcome.assessment.heart_disease.score, 42);
        assert_eq!(outcome.assessment.heart_disease.risk, RiskLevel::Moderate);
        // Neuro is always local: 35 + 20 + 15 = 70.
        assert_eq!(outcome.assessment.neurological.score, 70);
    }

    #[tokio::test]
    async fn test_remote_weights_override_manual_for_neuro() {
        // Low-risk profile so neuro comes purely from weight adjustments.
        let manual = ShapValues {
            age: Some(1.0), // would add 12 to neuro
            bmi: Some(1.0), // adds 8
            ..ShapValues::default()
        };
        let remote = ShapValues {
            age: Some(0.5), // overrides: adds 6
            ..ShapValues::default()
        };

        let service = ScoringService::new(Arc::new(ScriptedPredictor::Respond {
            risk_score: 10.0,
            shap: Some(remote),
        }));
        let outcome = service.assess(&low_risk_input(), Some(manual)).await;

        // 0.5*12 + 1.0*8 = 14, not 12 + 8 = 20.
        assert_eq!(outcome.assessment.neurological.score, 14);
    }

    #[tokio::test]
    async fn test_factors_and_weights_reflect_manual_input() {
        let manual = ShapValues {
            age: Some(0.4),
            ..ShapValues::default()
        };
        let service = ScoringService::new(Arc::new(ScriptedPredictor::Respond {
            risk_score: 10.0,
            shap: Some(ShapValues {
                age: Some(0.9),
                ..ShapValues::default()
            }),
        }));
        let outcome = service.assess(&low_risk_input(), Some(manual)).await;

        // Factors and the persisted weight snapshot keep the user's values;
        // the remote overlay only influences scoring.
        assert_eq!(outcome.factors[0].shap_value, Some(0.4));
        assert_eq!(outcome.shap_values, Some(manual));
    }

    #[tokio::test]
    async fn test_empty_manual_weights_not_persisted() {
        let service = ScoringService::new(Arc::new(ScriptedPredictor::Down));
        let outcome = service
            .assess(&low_risk_input(), Some(ShapValues::default()))
            .await;
        assert_eq!(outcome.shap_values, None);
    }
}
