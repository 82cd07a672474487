use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::PremiumRecord;

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("prediction backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode prediction response: {0}")]
    Decode(String),

    #[error("prediction backend returned an unusable premium: {0}")]
    InvalidOutput(f64),
}

/// Longest slice of a backend response body kept in an error
const MAX_ERROR_BODY_CHARS: usize = 256;

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

/// The external premium model.
///
/// Given a fully validated record, returns a non-negative annual premium.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, record: &PremiumRecord) -> Result<f64, PredictorError>;
}

/// Rejects values no premium can take.
pub fn check_premium(value: f64) -> Result<f64, PredictorError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PredictorError::InvalidOutput(value))
    }
}

/// Accepted response bodies: a bare number, or an object carrying the value
/// under `premium` or `prediction`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionResponse {
    Bare(f64),
    Wrapped {
        #[serde(alias = "prediction")]
        premium: f64,
    },
}

impl PredictionResponse {
    fn premium(&self) -> f64 {
        match self {
            PredictionResponse::Bare(value) => *value,
            PredictionResponse::Wrapped { premium } => *premium,
        }
    }
}

/// Forwards the record as JSON to a model served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, record: &PremiumRecord) -> Result<f64, PredictorError> {
        debug!(endpoint = %self.endpoint, "Requesting premium prediction");

        let response = self.client.post(&self.endpoint).json(record).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(endpoint = %self.endpoint, status = %status, "Prediction backend error");
            return Err(PredictorError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let body = response.text().await?;
        let parsed: PredictionResponse = serde_json::from_str(body.trim())
            .map_err(|e| {
            PredictorError::Decode(format!("{e}. Raw response: {}", truncate_body(&body)))
        })?;

        check_premium(parsed.premium())
    }
}
