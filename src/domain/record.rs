//! Stored assessment records.
//!
//! One record per completed assessment, kept newest-first in a per-identity
//! collection. The JSON shape matches the format the original client
//! exported, so existing histories load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BiometricInput, RiskAssessment, RiskFactor, ShapValues};

/// A persisted assessment snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAssessment {
    /// Unique within one identity's collection; epoch millis plus a random
    /// suffix
    pub id: String,

    /// Creation time (ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,

    /// The biometric snapshot that was assessed
    pub data: BiometricInput,

    /// Computed heart and neuro scores
    pub assessment: RiskAssessment,

    /// Explanatory factors as shown at assessment time
    pub factors: Vec<RiskFactor>,

    /// Manually loaded weights, when any were supplied
    #[serde(rename = "shapValues", default, skip_serializing_if = "Option::is_none")]
    pub shap_values: Option<ShapValues>,
}

/// Generate a record id: `<epoch_millis>_<6 base36 chars>`.
///
/// The random suffix comes from a CSPRNG seeded from OS entropy, following
/// the same idiom used for the rest of this crate's id generation.
#[must_use]
pub fn new_record_id(now: DateTime<Utc>) -> String {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut rng = ChaCha20Rng::from_entropy();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{}_{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::super::{RiskScore, Sex};
    use super::*;

    fn sample() -> StoredAssessment {
        let input = BiometricInput {
            age: 70,
            sex: Sex::Male,
            systolic_bp: 150,
            diastolic_bp: 95,
            heart_rate: 110,
            bmi: 32.0,
        };
        StoredAssessment {
            id: new_record_id(Utc::now()),
            timestamp: Utc::now(),
            data: input,
            assessment: RiskAssessment {
                heart_disease: RiskScore::from_points(100),
                neurological: RiskScore::from_points(70),
            },
            factors: super::super::generate_factors(&input, &ShapValues::default()),
            shap_values: None,
        }
    }

    #[test]
    fn test_id_format() {
        let id = new_record_id(Utc::now());
        let (millis, suffix) = id.split_once('_').expect("Should contain separator");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_ids_are_distinct() {
        let now = Utc::now();
        assert_ne!(new_record_id(now), new_record_id(now));
    }

    #[test]
    fn test_json_round_trip() {
        let record = sample();
        let json = serde_json::to_string(&record).expect("Should serialize");
        let back: StoredAssessment = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn test_exported_shape() {
        let json = serde_json::to_value(sample()).expect("Should serialize");
        assert!(json.get("id").is_some());
        assert!(json.get("timestamp").is_some());
        assert!(json["data"].get("systolicBP").is_some());
        assert!(json["assessment"].get("heartDisease").is_some());
        // No manual weights were loaded, so the key is absent entirely.
        assert!(json.get("shapValues").is_none());
    }
}
