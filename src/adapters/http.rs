//! HTTP adapter: reqwest-based implementation of the prediction port.
//!
//! Talks to the external scoring service (`POST /predict-with-shap`,
//! `GET /health`). Every call is bounded by a client-wide timeout; the
//! underlying transport's default would otherwise let a dead service
//! suspend the scoring flow indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::ports::{
    HealthStatus, PredictionError, PredictionRequest, PredictionResponse, Predictor,
};

/// Env var overriding the prediction service base URL.
pub const API_URL_ENV: &str = "VITALSCORE_API_URL";

/// Env var overriding the per-request timeout, in whole seconds.
pub const API_TIMEOUT_ENV: &str = "VITALSCORE_API_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:5001";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

/// HTTP client for the remote prediction service.
pub struct HttpPredictor {
    client: Client,
    base_url: String,
}

impl HttpPredictor {
    /// Create a predictor against the given base URL with a request timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }

    /// Create a predictor from `VITALSCORE_API_URL` and
    /// `VITALSCORE_API_TIMEOUT_SECS`, with defaults of
    /// `http://localhost:5001` and 4 seconds.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var(API_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        Self::new(base_url, timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let url = format!("{}/predict-with-shap", self.base_url);
        tracing::debug!(url, "Requesting prediction");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The service reports failures as {"error": "..."}; fall back to
            // the bare status line when the body is not in that shape.
            let message = response
                .json::<ApiError>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("Prediction failed: {status}"));
            return Err(PredictionError::Rejected(message));
        }

        response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| PredictionError::Malformed(e.to_string()))
    }

    async fn health(&self) -> Result<HealthStatus, PredictionError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Rejected(format!(
                "Health check failed: {status}"
            )));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| PredictionError::Malformed(e.to_string()))
    }
}
