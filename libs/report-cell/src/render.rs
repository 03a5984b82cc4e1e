use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tracing::debug;

use diagnosis_cell::{Condition, DiagnoseResponse, Severity};
use shared_models::symptom::SymptomFormData;

use crate::emergency::{Coordinates, EmergencyLinks};
use crate::models::{
    AssessmentReport, ConfidenceBand, PatientInfo, RankedCondition, SeverityGauge,
};

const GAUGE_WIDTH: usize = 20;

pub fn confidence_percent(confidence: f64) -> u8 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

pub fn severity_guidance(severity: Severity) -> &'static str {
    match severity {
        Severity::High => {
            "Your symptoms suggest a potentially serious condition that requires prompt medical evaluation."
        }
        Severity::Medium | Severity::Moderate => {
            "Your symptoms should be evaluated by a healthcare professional within the next 1-2 days."
        }
        Severity::Low => {
            "Your symptoms appear mild and can likely be managed with home care. Seek medical attention if they worsen."
        }
    }
}

fn rank(index: usize, condition: &Condition) -> RankedCondition {
    RankedCondition {
        rank: index + 1,
        name: condition.condition.clone(),
        confidence_percent: confidence_percent(condition.confidence),
        confidence_band: ConfidenceBand::from_confidence(condition.confidence),
        matched_symptoms: condition.matched_symptoms.clone(),
        description: condition.description.clone(),
        urgency: condition.urgency_level,
    }
}

impl AssessmentReport {
    pub fn build(
        response: &DiagnoseResponse,
        form: &SymptomFormData,
        generated_at: DateTime<Utc>,
    ) -> Self {
        debug!("Building report with {} conditions", response.conditions.len());

        Self {
            generated_at,
            patient: PatientInfo {
                age: form.age.trim().to_string(),
                gender: form.gender.trim().to_string(),
                duration: form.duration.trim().to_string(),
                reported_symptoms: form.symptoms.trim().to_string(),
            },
            diagnosis_summary: response.diagnosis_summary.clone(),
            severity: SeverityGauge::for_severity(response.severity),
            severity_guidance: severity_guidance(response.severity).to_string(),
            conditions: response
                .conditions
                .iter()
                .enumerate()
                .map(|(i, c)| rank(i, c))
                .collect(),
            advice: response.advice.clone(),
            home_remedies: response.home_remedies.clone(),
            next_steps: response.next_steps.clone(),
            when_to_seek_help: response.when_to_seek_help.clone(),
            estimated_recovery_time: response.estimated_recovery_time.clone(),
            disclaimer: response.disclaimer.clone(),
            emergency: EmergencyLinks::default(),
        }
    }

    /// Same report with the hospital link centred on the caller's location.
    pub fn with_location(mut self, location: Option<Coordinates>) -> Self {
        self.emergency = EmergencyLinks::new(location);
        self
    }

    pub fn export_file_name(&self) -> String {
        format!("symptacare-report-{}.txt", self.generated_at.format("%Y-%m-%d"))
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = self.write_plain_text(&mut out);
        out
    }

    fn write_plain_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "MEDICAL ASSESSMENT REPORT")?;
        writeln!(
            out,
            "Generated on {}",
            self.generated_at.format("%B %-d, %Y at %H:%M UTC")
        )?;

        section(out, "PATIENT INFORMATION")?;
        writeln!(out, "Age: {}", self.patient.age)?;
        writeln!(out, "Gender: {}", self.patient.gender)?;
        writeln!(out, "Duration: {}", self.patient.duration)?;
        writeln!(out, "Reported Symptoms: {}", self.patient.reported_symptoms)?;

        section(out, "DIAGNOSIS SUMMARY")?;
        writeln!(out, "{}", self.diagnosis_summary)?;

        section(out, &format!("SEVERITY LEVEL: {}", self.severity.label.to_uppercase()))?;
        writeln!(out, "{}", bar(self.severity.fill_percent))?;
        writeln!(out, "{}", self.severity_guidance)?;

        section(out, "POSSIBLE CONDITIONS")?;
        for condition in &self.conditions {
            writeln!(
                out,
                "{}. {} - Match: {}%",
                condition.rank, condition.name, condition.confidence_percent
            )?;
            writeln!(out, "   {}", bar(condition.confidence_percent))?;
            if !condition.matched_symptoms.is_empty() {
                writeln!(
                    out,
                    "   Matched symptoms: {}",
                    condition.matched_symptoms.join(", ")
                )?;
            }
            if let Some(description) = &condition.description {
                writeln!(out, "   {}", description)?;
            }
            if let Some(urgency) = condition.urgency {
                writeln!(out, "   Urgency: {}", urgency.as_str())?;
            }
        }

        section(out, "MEDICAL ADVICE")?;
        writeln!(out, "{}", self.advice)?;

        section(out, "HOME REMEDIES")?;
        bullets(out, &self.home_remedies)?;

        section(out, "NEXT STEPS")?;
        bullets(out, &self.next_steps)?;

        section(out, "WHEN TO SEEK HELP")?;
        writeln!(out, "{}", self.when_to_seek_help)?;

        section(out, "ESTIMATED RECOVERY TIME")?;
        writeln!(out, "{}", self.estimated_recovery_time)?;

        section(out, "EMERGENCY")?;
        writeln!(out, "Call emergency services: {}", self.emergency.call_uri)?;
        writeln!(out, "Find the nearest hospital: {}", self.emergency.nearest_hospital_url)?;

        section(out, "DISCLAIMER")?;
        writeln!(out, "{}", self.disclaimer)
    }
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", title)
}

fn bullets(out: &mut String, items: &[String]) -> std::fmt::Result {
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    Ok(())
}

fn bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * GAUGE_WIDTH + 50) / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_percent() {
        assert_eq!(confidence_percent(0.784), 78);
        assert_eq!(confidence_percent(0.2), 20);
        assert_eq!(confidence_percent(1.7), 100);
        assert_eq!(confidence_percent(-0.1), 0);
    }

    #[test]
    fn test_bar_rendering() {
        assert_eq!(bar(100), "[####################] 100%");
        assert_eq!(bar(0), "[--------------------] 0%");
        assert_eq!(bar(33), "[#######-------------] 33%");
    }

    #[test]
    fn test_guidance_treats_moderate_as_medium() {
        assert_eq!(
            severity_guidance(Severity::Moderate),
            severity_guidance(Severity::Medium)
        );
    }
}
