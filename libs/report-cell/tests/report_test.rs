use chrono::{TimeZone, Utc};

use diagnosis_cell::services::fallback::fallback_response;
use diagnosis_cell::{build_enhanced_request, Severity};
use report_cell::emergency::Coordinates;
use report_cell::{AssessmentReport, ConfidenceBand};
use shared_utils::test_utils::TestForms;

fn high_pain_report() -> AssessmentReport {
    let form = TestForms::headache_and_fever();
    let mut request = build_enhanced_request(&form, &["Pain level: 9/10".to_string()]);
    request.pain_level = Some(9);

    let response = fallback_response(&request);
    let generated_at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();

    AssessmentReport::build(&response, &form, generated_at)
}

#[test]
fn test_report_structure() {
    let report = high_pain_report();

    assert_eq!(report.patient.age, "30");
    assert_eq!(report.patient.gender, "female");
    assert_eq!(report.patient.reported_symptoms, "I have a bad headache and fever");
    assert_eq!(report.severity.level, Severity::High);
    assert_eq!(report.severity.fill_percent, 100);
    assert!(report.severity_guidance.contains("prompt medical evaluation"));

    assert!(!report.conditions.is_empty());
    for (i, condition) in report.conditions.iter().enumerate() {
        assert_eq!(condition.rank, i + 1);
        assert!((20..=90).contains(&condition.confidence_percent));
    }
    assert!(report
        .conditions
        .windows(2)
        .all(|w| w[0].confidence_percent >= w[1].confidence_percent));
}

#[test]
fn test_confidence_bands_follow_percent() {
    let report = high_pain_report();

    for condition in &report.conditions {
        let expected = match condition.confidence_percent {
            p if p >= 70 => ConfidenceBand::High,
            p if p >= 40 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        };
        // Rounding can only move a value across a band edge by half a point
        if condition.confidence_percent != 70 && condition.confidence_percent != 40 {
            assert_eq!(condition.confidence_band, expected);
        }
    }
}

#[test]
fn test_plain_text_export() {
    let report = high_pain_report();
    let text = report.to_plain_text();

    assert!(text.starts_with("MEDICAL ASSESSMENT REPORT\nGenerated on October 18, 2026 at 09:30 UTC"));
    assert!(text.contains("SEVERITY LEVEL: HIGH"));
    assert!(text.contains("Reported Symptoms: I have a bad headache and fever"));
    assert!(text.contains("1. "));
    assert!(text.contains("Seek medical attention within 24 hours"));
    assert!(text.contains("Call emergency services: tel:911"));
    assert!(text.contains(&report.disclaimer));
    assert!(text.contains("Tension Headache") || text.contains("Migraine"));

    assert_eq!(report.export_file_name(), "symptacare-report-2026-10-18.txt");
}

#[test]
fn test_location_updates_hospital_link() {
    let report = high_pain_report().with_location(Coordinates::new(51.5, -0.12));

    assert!(report.emergency.nearest_hospital_url.contains("@51.500000,-0.120000"));
    assert!(report.to_plain_text().contains("@51.500000,-0.120000"));
}

#[test]
fn test_report_serializes_tagged_levels() {
    let report = high_pain_report();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["severity"]["level"], "high");
    assert_eq!(json["severity"]["label"], "High");
    assert!(json["conditions"][0]["confidence_percent"].is_u64());
}
