use serde_json::Value;
use tracing::debug;

use crate::models::{normalize_severity, Condition, DiagnoseRequest, DiagnoseResponse, UrgencyLevel};
use crate::services::confidence::{
    rank_conditions, ConfidenceJitter, MAX_CONDITIONS, MAX_CONFIDENCE,
};
use crate::services::fallback::{
    condition_description, contextual_advice, contextual_remedies, diagnosis_summary, next_steps,
    pad_conditions, recovery_time, severity_from_context, symptom_based_conditions,
    when_to_seek_help, DEFAULT_DISCLAIMER,
};
use crate::services::request::extract_symptoms_from_input;

const SATURATED_CONFIDENCE: f64 = 0.95;
const DEFAULT_API_CONFIDENCE: f64 = 0.5;
const API_CONFIDENCE_FLOOR: f64 = 0.25;

/// Merges a (possibly partial) remote payload with synthesized defaults.
/// Fields of the wrong JSON type count as missing.
pub fn enhance_api_response(data: &Value, request: &DiagnoseRequest) -> DiagnoseResponse {
    let mut jitter = ConfidenceJitter::for_request(request);

    let api_conditions = data
        .get("conditions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let conditions = diverse_conditions(api_conditions, request, &mut jitter);

    let severity = text_field(data, "severity")
        .map(|s| normalize_severity(&s))
        .unwrap_or_else(|| severity_from_context(request));

    DiagnoseResponse {
        advice: text_field(data, "advice").unwrap_or_else(|| contextual_advice(request)),
        diagnosis_summary: text_field(data, "diagnosis_summary")
            .unwrap_or_else(|| diagnosis_summary(request, &conditions)),
        conditions,
        disclaimer: text_field(data, "disclaimer").unwrap_or_else(|| DEFAULT_DISCLAIMER.to_string()),
        home_remedies: list_field(data, "home_remedies").unwrap_or_else(|| contextual_remedies(request)),
        severity,
        next_steps: list_field(data, "next_steps").unwrap_or_else(|| next_steps(request)),
        when_to_seek_help: text_field(data, "when_to_seek_help")
            .unwrap_or_else(|| when_to_seek_help(request)),
        estimated_recovery_time: text_field(data, "estimated_recovery_time")
            .unwrap_or_else(|| recovery_time(request)),
    }
}

/// Rewrites remote confidences into the display band, fills gaps, pads to the
/// minimum count and ranks.
pub fn diverse_conditions(
    api_conditions: &[Value],
    request: &DiagnoseRequest,
    jitter: &mut ConfidenceJitter,
) -> Vec<Condition> {
    let mut conditions: Vec<Condition> = api_conditions
        .iter()
        .filter(|c| c.is_object())
        .enumerate()
        .map(|(index, raw)| repair_condition(raw, index, request, jitter))
        .collect();

    if conditions.is_empty() {
        debug!("API returned no usable conditions, using keyword conditions");
        conditions = symptom_based_conditions(request, jitter);
    }

    pad_conditions(&mut conditions, jitter);
    rank_conditions(conditions, MAX_CONDITIONS)
}

fn repair_condition(
    raw: &Value,
    index: usize,
    request: &DiagnoseRequest,
    jitter: &mut ConfidenceJitter,
) -> Condition {
    let name = text_field(raw, "condition");

    let mut confidence = raw
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_API_CONFIDENCE);

    if confidence >= SATURATED_CONFIDENCE {
        confidence = jitter.sample(0.65, 0.2);
    }

    if index == 0 {
        confidence = confidence.max(0.55);
    } else {
        confidence *= 0.9 - index as f64 * 0.08;
    }

    if let (Some(pain), Some(name)) = (request.pain_level, name.as_deref()) {
        if name.to_lowercase().contains("pain") {
            confidence = (confidence + f64::from(pain) / 10.0 * 0.15).min(MAX_CONFIDENCE);
        }
    }

    let confidence = confidence.clamp(API_CONFIDENCE_FLOOR, MAX_CONFIDENCE);

    let matched_symptoms = list_field(raw, "matched_symptoms")
        .unwrap_or_else(|| extract_symptoms_from_input(&request.input));
    let description = text_field(raw, "description")
        .unwrap_or_else(|| condition_description(name.as_deref().unwrap_or_default()));

    Condition {
        condition: name.unwrap_or_else(|| "Unknown condition".to_string()),
        confidence,
        matched_symptoms,
        description: Some(description),
        urgency_level: Some(UrgencyLevel::from_confidence(confidence)),
    }
}

fn text_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn list_field(data: &Value, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = data
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Severity;

    fn request(input: &str, pain_level: Option<u8>) -> DiagnoseRequest {
        DiagnoseRequest {
            age: 42,
            gender: "male".into(),
            input: input.into(),
            pain_level,
            ..DiagnoseRequest::default()
        }
    }

    #[test]
    fn test_saturated_confidences_are_pulled_into_band() {
        let data = json!({
            "conditions": [
                { "condition": "Migraine", "confidence": 0.99 },
                { "condition": "Sinusitis", "confidence": 1.0 },
                { "condition": "Common Cold", "confidence": 0.97 }
            ]
        });

        let response = enhance_api_response(&data, &request("headache", None));

        assert_eq!(response.conditions.len(), 3);
        for window in response.conditions.windows(2) {
            assert!(window[0].confidence >= window[1].confidence);
        }
        for condition in &response.conditions {
            assert!(condition.confidence <= MAX_CONFIDENCE);
            assert!(condition.confidence >= 0.2);
            assert!(condition.description.is_some());
        }
    }

    #[test]
    fn test_missing_fields_are_synthesized() {
        let data = json!({ "conditions": [], "severity": "SEVERE" });
        let response = enhance_api_response(&data, &request("a cough and a cold", Some(3)));

        assert_eq!(response.severity, Severity::High);
        assert_eq!(response.disclaimer, DEFAULT_DISCLAIMER);
        assert!(response.conditions.iter().any(|c| c.condition == "Common Cold"));
        assert!(!response.advice.is_empty());
        assert!(!response.home_remedies.is_empty());
        assert!(!response.next_steps.is_empty());
    }

    #[test]
    fn test_api_fields_are_preserved() {
        let data = json!({
            "advice": "Drink water",
            "disclaimer": "Not medical advice",
            "home_remedies": ["Sleep"],
            "severity": "low",
            "conditions": [
                { "condition": "Dehydration", "confidence": 0.6, "matched_symptoms": ["thirst"] }
            ]
        });

        let response = enhance_api_response(&data, &request("thirsty", None));

        assert_eq!(response.advice, "Drink water");
        assert_eq!(response.disclaimer, "Not medical advice");
        assert_eq!(response.home_remedies, vec!["Sleep"]);
        assert_eq!(response.severity, Severity::Low);
        assert_eq!(response.conditions[0].condition, "Dehydration");
        assert_eq!(response.conditions[0].matched_symptoms, vec!["thirst"]);
        assert!(response.conditions.len() >= 3);
    }

    #[test]
    fn test_wrongly_typed_fields_count_as_missing() {
        let data = json!({
            "advice": 12,
            "conditions": "none",
            "home_remedies": "rest",
            "severity": null
        });

        let response = enhance_api_response(&data, &request("stomach ache", Some(6)));

        assert_eq!(response.severity, Severity::Medium);
        assert!(response.conditions.iter().any(|c| c.condition == "Gastroenteritis"));
        assert_eq!(response.home_remedies[0], "Eat bland foods like crackers, toast, or rice");
    }

    #[test]
    fn test_pain_conditions_are_boosted_and_capped() {
        let data = json!({
            "conditions": [
                { "condition": "Chronic Back Pain", "confidence": 0.8 }
            ]
        });

        let response = enhance_api_response(&data, &request("back pain", Some(10)));
        let top = &response.conditions[0];

        assert_eq!(top.condition, "Chronic Back Pain");
        assert!((top.confidence - MAX_CONFIDENCE).abs() < 1e-9);
        assert_eq!(top.urgency_level, Some(UrgencyLevel::High));
    }

    #[test]
    fn test_more_than_five_conditions_are_truncated() {
        let conditions: Vec<Value> = (0..8)
            .map(|i| json!({ "condition": format!("Condition {}", i), "confidence": 0.8 - i as f64 * 0.05 }))
            .collect();
        let data = json!({ "conditions": conditions });

        let response = enhance_api_response(&data, &request("tired", None));
        assert_eq!(response.conditions.len(), MAX_CONDITIONS);
    }
}
