//! # Vitalscore
//!
//! Client-side health-risk self-assessment core: a biometric snapshot goes
//! in, a cardiovascular and neurological risk assessment comes out, with
//! explanatory factors and an optional per-account history.
//!
//! This crate provides:
//! - Risk scoring via a remote prediction service, with a deterministic
//!   rule-based fallback when the service is unavailable
//! - Explanatory per-factor narratives with optional SHAP weight overlays
//! - A per-identity assessment history with a 64-second soft-delete/undo
//!   window, filtering and pagination
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Pure types and the deterministic rule engine
//! - `ports`: Trait definitions for consumed capabilities (prediction
//!   service, key-value persistence, timers)
//! - `adapters`: Concrete implementations (reqwest, SQLite, tokio timers)
//! - `application`: Use cases orchestrating domain and ports
//!
//! This is a library boundary for a surrounding UI; it owns no server
//! surface. No result here is a medical diagnosis.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{AssessmentOutcome, HistoryService, ScoringService};
pub use domain::{BiometricInput, RiskAssessment, RiskLevel, Sex, ShapValues};

/// Result type for vitalscore operations.
pub type Result<T> = std::result::Result<T, VitalscoreError>;

/// Main error type for vitalscore.
///
/// Note the deliberate asymmetry with the runtime behavior: remote
/// prediction failures and storage failures inside the scoring/history
/// flows are absorbed there (fallback, degrade-to-empty) and never reach
/// callers as errors. These variants cover the surfaces that do fail:
/// opening a store, explicit health checks, and input validation.
#[derive(Debug, thiserror::Error)]
pub enum VitalscoreError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Prediction service failed: {0}")]
    Prediction(#[from] ports::PredictionError),

    #[error("Invalid biometric input: {0}")]
    Validation(String),

    #[error(transparent)]
    Shap(#[from] domain::ShapParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
