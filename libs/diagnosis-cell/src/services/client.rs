use std::time::Duration;

use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use shared_config::AppConfig;

use crate::error::DiagnosisError;
use crate::models::{DiagnoseRequest, DiagnosisOutcome};
use crate::services::enhance::enhance_api_response;
use crate::services::fallback::fallback_response;

/// Client for the remote diagnosis endpoint. Each attempt is bounded by the
/// configured timeout; failed attempts are retried after a fixed backoff.
pub struct DiagnosisClient {
    http_client: Client,
    endpoint: Option<String>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl DiagnosisClient {
    pub fn new(config: &AppConfig) -> Result<Self, DiagnosisError> {
        let http_client = Client::builder()
            .timeout(config.diagnosis_timeout())
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.is_configured().then(|| config.diagnose_url()),
            max_retries: config.diagnosis_max_retries,
            retry_backoff: config.diagnosis_retry_backoff(),
        })
    }

    /// Always resolves. Remote payloads are repaired; any failure after the
    /// last retry yields a locally synthesized assessment instead.
    #[instrument(skip(self, request), fields(pain_level = ?request.pain_level))]
    pub async fn diagnose_symptoms(&self, request: &DiagnoseRequest) -> DiagnosisOutcome {
        match self.request_diagnosis(request).await {
            Ok(data) => {
                info!("Diagnosis API response received");
                DiagnosisOutcome::remote(enhance_api_response(&data, request))
            }
            Err(err) => {
                warn!("All diagnosis attempts failed, using fallback response: {}", err);
                DiagnosisOutcome::fallback(fallback_response(request), err.to_string())
            }
        }
    }

    /// Raw remote payload with retries applied. Callers outside this crate
    /// should prefer `diagnose_symptoms`.
    pub async fn request_diagnosis(&self, request: &DiagnoseRequest) -> Result<Value, DiagnosisError> {
        let endpoint = self.endpoint.as_deref().ok_or(DiagnosisError::NotConfigured)?;
        let attempts = self.max_retries + 1;
        let mut attempt = 1;

        loop {
            debug!("Diagnosis attempt {}/{} to {}", attempt, attempts, endpoint);

            match self.send_once(endpoint, request).await {
                Ok(data) => return Ok(data),
                Err(err) if attempt < attempts => {
                    warn!("Diagnosis attempt {}/{} failed: {}", attempt, attempts, err);
                    tokio::time::sleep(self.retry_backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!("Diagnosis attempt {}/{} failed: {}", attempt, attempts, err);
                    return Err(err);
                }
            }
        }
    }

    async fn send_once(&self, endpoint: &str, request: &DiagnoseRequest) -> Result<Value, DiagnosisError> {
        let response = self
            .http_client
            .post(endpoint)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(DiagnosisError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let data: Value = serde_json::from_str(&response_text)
            .map_err(|e| DiagnosisError::InvalidPayload(e.to_string()))?;

        if !data.is_object() {
            return Err(DiagnosisError::InvalidPayload("expected a JSON object".to_string()));
        }

        Ok(data)
    }
}
