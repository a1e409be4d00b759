//! Domain layer: Core business types and the deterministic rule engine.
//!
//! This module contains pure types and pure scoring logic with no I/O.
//! All stored types serialize to the same JSON shape the original client
//! wrote, keeping existing histories loadable.

mod assessment;
mod biometrics;
mod factors;
mod record;
pub mod rules;
mod session;
mod shap;

pub use assessment::{RiskAssessment, RiskLevel, RiskScore};
pub use biometrics::{BiometricInput, Sex};
pub use factors::{generate_factors, Impact, RiskFactor};
pub use record::{new_record_id, StoredAssessment};
pub use session::UserId;
pub use shap::{ShapParseError, ShapValues};
