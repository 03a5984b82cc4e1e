use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_DIAGNOSIS_API_BASE_URL: &str = "https://symptacare-api.onrender.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub diagnosis_api_base_url: String,
    pub diagnosis_timeout_ms: u64,
    pub diagnosis_max_retries: u32,
    pub diagnosis_retry_backoff_ms: u64,
    pub storage_path: PathBuf,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            diagnosis_api_base_url: DEFAULT_DIAGNOSIS_API_BASE_URL.to_string(),
            diagnosis_timeout_ms: 8_000,
            diagnosis_max_retries: 1,
            diagnosis_retry_backoff_ms: 1_000,
            storage_path: PathBuf::from("symptacare-storage.json"),
            port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            diagnosis_api_base_url: env::var("DIAGNOSIS_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DIAGNOSIS_API_BASE_URL not set, using default");
                    defaults.diagnosis_api_base_url.clone()
                }),
            diagnosis_timeout_ms: parse_var("DIAGNOSIS_TIMEOUT_MS", defaults.diagnosis_timeout_ms),
            diagnosis_max_retries: parse_var("DIAGNOSIS_MAX_RETRIES", defaults.diagnosis_max_retries),
            diagnosis_retry_backoff_ms: parse_var(
                "DIAGNOSIS_RETRY_BACKOFF_MS",
                defaults.diagnosis_retry_backoff_ms,
            ),
            storage_path: env::var("SYMPTACARE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("SYMPTACARE_STORAGE_PATH not set, using default");
                    defaults.storage_path.clone()
                }),
            port: parse_var("PORT", defaults.port),
        };

        if !config.is_configured() {
            warn!("Diagnosis API base URL is empty - every analysis will use the fallback assessment");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.diagnosis_api_base_url.trim().is_empty()
    }

    pub fn diagnosis_timeout(&self) -> Duration {
        Duration::from_millis(self.diagnosis_timeout_ms)
    }

    pub fn diagnosis_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.diagnosis_retry_backoff_ms)
    }

    pub fn diagnose_url(&self) -> String {
        format!("{}/diagnose", self.diagnosis_api_base_url.trim_end_matches('/'))
    }
}

fn parse_var<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value {:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
