//! Prediction port: Trait for the remote heart-disease model.
//!
//! Abstracts the HTTP prediction service from the scoring flow so the
//! engine can be tested against scripted responses and failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BiometricInput, RiskLevel, Sex, ShapValues};

/// Error taxonomy for the prediction capability.
///
/// All variants collapse into "remote unavailable" from the scoring flow's
/// point of view: the caller falls back to the rule engine and never
/// surfaces these to the end user.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Prediction service unreachable: {0}")]
    Transport(String),

    #[error("Prediction service rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed prediction response: {0}")]
    Malformed(String),
}

/// Request body for a scoring call.
///
/// All six biometric fields are sent even though the current remote model
/// only consumes a subset; the optional fields mirror the service contract.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    pub age: u32,
    pub sex: Sex,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: i32,
    #[serde(rename = "diastolicBP", skip_serializing_if = "Option::is_none")]
    pub diastolic_bp: Option<i32>,
    #[serde(rename = "heartRate", skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
}

impl From<&BiometricInput> for PredictionRequest {
    fn from(input: &BiometricInput) -> Self {
        Self {
            age: input.age,
            sex: input.sex,
            systolic_bp: input.systolic_bp,
            diastolic_bp: Some(input.diastolic_bp),
            heart_rate: Some(input.heart_rate),
            bmi: Some(input.bmi),
        }
    }
}

/// Response body from the prediction service.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    /// Binary model output (0 = no disease indicated, 1 = disease indicated)
    pub prediction: f64,

    /// Raw model probability in [0, 1]
    pub probability: f64,

    /// Band as classified by the service
    pub risk_level: RiskLevel,

    /// Heart-disease score on a 0-100 scale
    pub risk_score: f64,

    /// Per-factor explanatory weights, when the endpoint supplies them
    #[serde(default)]
    pub shap_values: Option<ShapValues>,
}

/// Response from the companion health-check endpoint.
///
/// Not on the scoring path; scoring simply attempts a prediction and falls
/// back on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
}

/// Trait for the remote prediction capability.
///
/// One attempt per assessment; no retries. Implementations are expected to
/// bound the call with a timeout so the scoring flow never suspends
/// indefinitely.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Request a heart-disease score with explanatory weights.
    ///
    /// # Errors
    /// Returns `PredictionError` for any transport, status or payload
    /// failure.
    async fn predict(&self, request: &PredictionRequest)
        -> Result<PredictionResponse, PredictionError>;

    /// Query service health.
    ///
    /// # Errors
    /// Returns `PredictionError` if the service is unreachable or the
    /// response is malformed.
    async fn health(&self) -> Result<HealthStatus, PredictionError>;
}
