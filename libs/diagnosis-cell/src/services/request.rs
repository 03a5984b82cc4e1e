use shared_models::symptom::SymptomFormData;

use crate::models::DiagnoseRequest;

const COMMON_SYMPTOMS: [&str; 16] = [
    "fever",
    "headache",
    "cough",
    "sore throat",
    "runny nose",
    "congestion",
    "nausea",
    "vomiting",
    "diarrhea",
    "fatigue",
    "dizziness",
    "pain",
    "rash",
    "swelling",
    "shortness of breath",
    "chest pain",
];

pub fn map_gender_for_api(gender: &str) -> String {
    match gender.trim().to_lowercase().as_str() {
        "male" => "male",
        "female" => "female",
        _ => "other",
    }
    .to_string()
}

/// Builds the request for one conversation from the submitted form and every
/// answer gathered since.
pub fn build_enhanced_request(form: &SymptomFormData, additional_inputs: &[String]) -> DiagnoseRequest {
    let mut parts = vec![
        format!("Primary symptoms: {}", form.symptoms.trim()),
        format!("Duration: {}", form.duration.trim()),
    ];
    parts.extend(
        additional_inputs
            .iter()
            .enumerate()
            .map(|(i, input)| format!("Additional detail {}: {}", i + 1, input.trim())),
    );

    let indicator_text = format!("{} {}", form.symptoms, additional_inputs.join(" "));

    DiagnoseRequest {
        age: form.age_years().unwrap_or_default(),
        gender: map_gender_for_api(&form.gender),
        input: parts.join(". "),
        duration: Some(form.duration.trim().to_string()),
        severity_indicators: extract_severity_indicators(&indicator_text),
        medical_history: Vec::new(),
        additional_context: if additional_inputs.is_empty() {
            None
        } else {
            Some(additional_inputs.join(". "))
        },
        pain_level: None,
    }
}

pub fn extract_severity_indicators(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    let rules: [(&[&str], &str); 4] = [
        (&["severe", "intense"], "severe_pain"),
        (&["sudden", "acute"], "sudden_onset"),
        (&["worsening", "getting worse"], "progressive"),
        (&["fever", "temperature"], "fever_present"),
    ];

    rules
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, indicator)| indicator.to_string())
        .collect()
}

pub fn extract_symptoms_from_input(input: &str) -> Vec<String> {
    let input = input.to_lowercase();
    COMMON_SYMPTOMS
        .iter()
        .filter(|s| input.contains(*s))
        .map(|s| s.to_string())
        .collect()
}
