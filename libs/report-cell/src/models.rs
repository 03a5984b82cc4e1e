use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use diagnosis_cell::{Severity, UrgencyLevel};

use crate::emergency::EmergencyLinks;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub age: String,
    pub gender: String,
    pub duration: String,
    pub reported_symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityGauge {
    pub level: Severity,
    pub label: String,
    /// Portion of the low-to-high bar to fill.
    pub fill_percent: u8,
}

impl SeverityGauge {
    pub fn for_severity(level: Severity) -> Self {
        let (label, fill_percent) = match level {
            Severity::Low => ("Low", 33),
            Severity::Medium => ("Medium", 66),
            Severity::Moderate => ("Moderate", 66),
            Severity::High => ("High", 100),
        };

        Self {
            level,
            label: label.to_string(),
            fill_percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.7 {
            ConfidenceBand::High
        } else if confidence >= 0.4 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCondition {
    pub rank: usize,
    pub name: String,
    pub confidence_percent: u8,
    pub confidence_band: ConfidenceBand,
    pub matched_symptoms: Vec<String>,
    pub description: Option<String>,
    pub urgency: Option<UrgencyLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub generated_at: DateTime<Utc>,
    pub patient: PatientInfo,
    pub diagnosis_summary: String,
    pub severity: SeverityGauge,
    pub severity_guidance: String,
    pub conditions: Vec<RankedCondition>,
    pub advice: String,
    pub home_remedies: Vec<String>,
    pub next_steps: Vec<String>,
    pub when_to_seek_help: String,
    pub estimated_recovery_time: String,
    pub disclaimer: String,
    pub emergency: EmergencyLinks,
}
