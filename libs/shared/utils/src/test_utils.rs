use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;
use shared_models::auth::UserProfile;
use shared_models::symptom::SymptomFormData;

pub struct TestConfig {
    pub diagnosis_api_base_url: String,
    pub diagnosis_timeout_ms: u64,
    pub diagnosis_max_retries: u32,
    pub diagnosis_retry_backoff_ms: u64,
    pub storage_path: PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            // Nothing listens here; connections are refused immediately
            diagnosis_api_base_url: "http://127.0.0.1:9".to_string(),
            diagnosis_timeout_ms: 500,
            diagnosis_max_retries: 1,
            diagnosis_retry_backoff_ms: 10,
            storage_path: std::env::temp_dir().join("symptacare-test-storage.json"),
        }
    }
}

impl TestConfig {
    pub fn with_api(base_url: impl Into<String>) -> Self {
        Self {
            diagnosis_api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            diagnosis_api_base_url: self.diagnosis_api_base_url.clone(),
            diagnosis_timeout_ms: self.diagnosis_timeout_ms,
            diagnosis_max_retries: self.diagnosis_max_retries,
            diagnosis_retry_backoff_ms: self.diagnosis_retry_backoff_ms,
            storage_path: self.storage_path.clone(),
            port: 0,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestProfile;

impl TestProfile {
    pub fn basic(name: &str, email: &str) -> UserProfile {
        UserProfile::new(name, email)
    }

    /// Profile with age and gender set, which locks those form fields.
    pub fn with_demographics(age: u32, gender: &str) -> UserProfile {
        UserProfile {
            age: Some(age),
            gender: Some(gender.to_string()),
            medical_conditions: Some(vec!["asthma".to_string()]),
            ..UserProfile::new("Jo", "jo@x.com")
        }
    }
}

pub struct TestForms;

impl TestForms {
    pub fn headache_and_fever() -> SymptomFormData {
        SymptomFormData {
            symptoms: "I have a bad headache and fever".to_string(),
            age: "30".to_string(),
            gender: "female".to_string(),
            duration: "2 days".to_string(),
        }
    }

    pub fn headache_and_fever_json() -> serde_json::Value {
        json!({
            "symptoms": "I have a bad headache and fever",
            "age": "30",
            "gender": "female",
            "duration": "2 days"
        })
    }
}

pub struct MockDiagnosisResponses;

impl MockDiagnosisResponses {
    pub fn full_response() -> serde_json::Value {
        json!({
            "advice": "Rest and drink plenty of fluids.",
            "conditions": [
                {
                    "condition": "Migraine",
                    "confidence": 0.72,
                    "matched_symptoms": ["headache", "sensitivity to light"],
                    "description": "Recurring headaches of moderate to severe intensity."
                },
                {
                    "condition": "Tension Headache",
                    "confidence": 0.61,
                    "matched_symptoms": ["headache"]
                },
                {
                    "condition": "Sinusitis",
                    "confidence": 0.4,
                    "matched_symptoms": ["pressure"]
                }
            ],
            "diagnosis_summary": "Your symptoms are most consistent with a migraine.",
            "disclaimer": "This is not a medical diagnosis.",
            "home_remedies": ["Rest in a dark room", "Stay hydrated"],
            "severity": "Moderate",
            "next_steps": ["See a doctor if it persists"],
            "when_to_seek_help": "If the headache is sudden and severe.",
            "estimated_recovery_time": "1-3 days"
        })
    }

    pub fn saturated_response() -> serde_json::Value {
        json!({
            "conditions": [
                { "condition": "Migraine", "confidence": 1.0 },
                { "condition": "Tension Headache", "confidence": 0.99 }
            ],
            "severity": "severe"
        })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({ "detail": message })
    }
}
