use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response format from API: {0}")]
    InvalidPayload(String),

    #[error("Diagnosis API base URL is not configured")]
    NotConfigured,
}

impl DiagnosisError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DiagnosisError::Http(e) if e.is_timeout())
    }
}
