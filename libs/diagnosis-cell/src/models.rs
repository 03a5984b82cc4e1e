use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST {base}/diagnose`. Sent verbatim to the remote API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnoseRequest {
    pub age: u32,
    pub gender: String,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub severity_indicators: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medical_history: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_level: Option<u8>,
}

impl DiagnoseRequest {
    pub fn input_lower(&self) -> String {
        self.input.to_lowercase()
    }

    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        let input = self.input_lower();
        keywords.iter().any(|k| input.contains(k))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.7 {
            UrgencyLevel::High
        } else if confidence >= 0.4 {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Moderate,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Moderate => "moderate",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps any severity label onto the fixed tier set. Unknown labels become
/// `Medium`; "moderate" is kept distinct.
pub fn normalize_severity(severity: &str) -> Severity {
    match severity.trim().to_lowercase().as_str() {
        "low" | "mild" => Severity::Low,
        "medium" => Severity::Medium,
        "moderate" => Severity::Moderate,
        "high" | "severe" => Severity::High,
        _ => Severity::Medium,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub condition: String,
    pub confidence: f64,
    #[serde(default)]
    pub matched_symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
}

/// Fully populated assessment. Whatever the remote API omitted has already
/// been synthesized by the time a value of this type exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnoseResponse {
    pub advice: String,
    pub conditions: Vec<Condition>,
    pub diagnosis_summary: String,
    pub disclaimer: String,
    pub home_remedies: Vec<String>,
    pub severity: Severity,
    pub next_steps: Vec<String>,
    pub when_to_seek_help: String,
    pub estimated_recovery_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseSource {
    Remote,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisOutcome {
    pub response: DiagnoseResponse,
    pub source: ResponseSource,
}

impl DiagnosisOutcome {
    pub fn remote(response: DiagnoseResponse) -> Self {
        Self {
            response,
            source: ResponseSource::Remote,
        }
    }

    pub fn fallback(response: DiagnoseResponse, reason: impl Into<String>) -> Self {
        Self {
            response,
            source: ResponseSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ResponseSource::Fallback { .. })
    }
}
