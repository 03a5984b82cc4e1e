//! Keyword heuristics used to synthesize any part of an assessment the remote
//! API did not supply, or the whole assessment when the API is unreachable.

use tracing::debug;

use crate::models::{Condition, DiagnoseRequest, DiagnoseResponse, Severity, UrgencyLevel};
use crate::services::confidence::{rank_conditions, ConfidenceJitter, MIN_CONDITIONS};

pub const DEFAULT_DISCLAIMER: &str =
    "This assessment is for informational purposes only and should not replace professional medical advice.";

pub const FALLBACK_DISCLAIMER: &str =
    "This is a fallback assessment due to technical issues. Please consult with a healthcare professional for proper evaluation.";

const FALLBACK_MAX_CONDITIONS: usize = 4;
const DEFAULT_PAIN_LEVEL: u8 = 5;

const PADDING_CONDITIONS: [(&str, &str); 3] = [
    (
        "General Malaise",
        "General feeling of discomfort or illness that may require further evaluation.",
    ),
    (
        "Undetermined Condition",
        "The reported symptoms do not clearly point to a specific condition and need professional evaluation.",
    ),
    (
        "Nonspecific Symptoms",
        "Symptoms that are common to many conditions and should be monitored for changes.",
    ),
];

struct Candidate {
    name: &'static str,
    base: f64,
    spread: f64,
    matched: &'static [&'static str],
    description: &'static str,
    urgency: UrgencyLevel,
}

impl Candidate {
    fn into_condition(self, jitter: &mut ConfidenceJitter) -> Condition {
        Condition {
            condition: self.name.to_string(),
            confidence: jitter.sample(self.base, self.spread),
            matched_symptoms: self.matched.iter().map(|s| s.to_string()).collect(),
            description: Some(self.description.to_string()),
            urgency_level: Some(self.urgency),
        }
    }
}

pub fn severity_from_context(request: &DiagnoseRequest) -> Severity {
    let pain = request.pain_level;

    if pain.is_some_and(|p| p >= 8) || request.mentions_any(&["severe", "unbearable", "emergency"]) {
        return Severity::High;
    }
    if pain.is_some_and(|p| p >= 5) || request.mentions_any(&["moderate", "persistent", "fever"]) {
        return Severity::Medium;
    }
    if pain.is_some_and(|p| p <= 3) || request.mentions_any(&["mild", "slight"]) {
        return Severity::Low;
    }

    Severity::Medium
}

/// Condition candidates keyed off symptom keywords and pain level. May be
/// empty when nothing in the input is recognized.
pub fn symptom_based_conditions(request: &DiagnoseRequest, jitter: &mut ConfidenceJitter) -> Vec<Condition> {
    let pain = request.pain_level.unwrap_or(DEFAULT_PAIN_LEVEL);
    let mut candidates = Vec::new();

    if request.mentions_any(&["headache", "head pain"]) {
        candidates.push(Candidate {
            name: "Tension Headache",
            base: 0.65,
            spread: 0.15,
            matched: &["headache", "head pain", "pressure"],
            description: "Most common type of headache, often caused by stress, poor posture, or muscle tension.",
            urgency: if pain > 7 { UrgencyLevel::Medium } else { UrgencyLevel::Low },
        });
        candidates.push(Candidate {
            name: "Migraine",
            base: 0.45,
            spread: 0.2,
            matched: &["severe headache", "sensitivity to light", "nausea"],
            description: "Neurological condition causing intense headaches, often with additional symptoms.",
            urgency: if pain > 8 { UrgencyLevel::High } else { UrgencyLevel::Medium },
        });
        if pain > 8 {
            candidates.push(Candidate {
                name: "Cluster Headache",
                base: 0.35,
                spread: 0.15,
                matched: &["severe head pain", "eye pain", "nasal congestion"],
                description: "Severe headaches that occur in cyclical patterns or clusters.",
                urgency: UrgencyLevel::High,
            });
        }
    }

    if request.mentions_any(&["cough", "cold", "congestion"]) {
        candidates.push(Candidate {
            name: "Upper Respiratory Infection",
            base: 0.6,
            spread: 0.15,
            matched: &["cough", "congestion", "sore throat"],
            description: "Viral infection affecting the nose, throat, and upper airways.",
            urgency: UrgencyLevel::Low,
        });
        candidates.push(Candidate {
            name: "Common Cold",
            base: 0.55,
            spread: 0.15,
            matched: &["runny nose", "sneezing", "mild cough"],
            description: "Viral infection of the upper respiratory tract.",
            urgency: UrgencyLevel::Low,
        });
        if request.mentions_any(&["fever"]) {
            candidates.push(Candidate {
                name: "Influenza",
                base: 0.5,
                spread: 0.15,
                matched: &["fever", "body aches", "fatigue", "cough"],
                description: "Viral infection that affects the respiratory system and causes systemic symptoms.",
                urgency: UrgencyLevel::Medium,
            });
        }
    }

    if request.mentions_any(&["stomach", "nausea", "vomit"]) {
        candidates.push(Candidate {
            name: "Gastroenteritis",
            base: 0.55,
            spread: 0.2,
            matched: &["nausea", "stomach pain", "diarrhea"],
            description: "Inflammation of the stomach and intestines, often caused by viral or bacterial infection.",
            urgency: UrgencyLevel::Medium,
        });
        candidates.push(Candidate {
            name: "Food Poisoning",
            base: 0.4,
            spread: 0.15,
            matched: &["nausea", "vomiting", "abdominal cramps"],
            description: "Illness caused by consuming contaminated food or beverages.",
            urgency: UrgencyLevel::Medium,
        });
    }

    if request.mentions_any(&["fever", "temperature"]) {
        candidates.push(Candidate {
            name: "Viral Infection",
            base: 0.6,
            spread: 0.15,
            matched: &["fever", "fatigue", "body aches"],
            description: "General viral infection causing systemic symptoms.",
            urgency: UrgencyLevel::Medium,
        });
        if pain > 6 {
            candidates.push(Candidate {
                name: "Bacterial Infection",
                base: 0.45,
                spread: 0.15,
                matched: &["high fever", "severe pain", "fatigue"],
                description: "Bacterial infection that may require antibiotic treatment.",
                urgency: UrgencyLevel::Medium,
            });
        }
    }

    candidates
        .into_iter()
        .map(|c| c.into_condition(jitter))
        .collect()
}

/// Generic low-confidence entry used to pad short lists. `index` is the
/// position it will occupy.
pub fn padding_condition(index: usize, jitter: &mut ConfidenceJitter) -> Condition {
    let (name, description) = PADDING_CONDITIONS[index % PADDING_CONDITIONS.len()];
    let base = 0.4 - index as f64 * 0.08;

    Condition {
        condition: name.to_string(),
        confidence: jitter.sample(base, 0.1).max(0.2),
        matched_symptoms: vec![
            "fatigue".to_string(),
            "discomfort".to_string(),
            "general unwellness".to_string(),
        ],
        description: Some(description.to_string()),
        urgency_level: Some(UrgencyLevel::Low),
    }
}

pub fn pad_conditions(conditions: &mut Vec<Condition>, jitter: &mut ConfidenceJitter) {
    while conditions.len() < MIN_CONDITIONS {
        let index = conditions.len();
        conditions.push(padding_condition(index, jitter));
    }
}

pub fn contextual_advice(request: &DiagnoseRequest) -> String {
    let advice = if request.pain_level.unwrap_or(DEFAULT_PAIN_LEVEL) >= 8 {
        "Your high pain level suggests you should seek medical attention promptly. Consider visiting an urgent care center or emergency room if pain is severe."
    } else if request.mentions_any(&["headache"]) {
        "For headaches, try resting in a quiet, dark room and staying hydrated. If headaches are severe or frequent, consult with a healthcare provider."
    } else if request.mentions_any(&["fever"]) {
        "Monitor your fever and stay hydrated. Seek medical attention if fever exceeds 103°F (39.4°C) or persists for more than 3 days."
    } else if request.mentions_any(&["cough", "cold"]) {
        "Rest, stay hydrated, and consider using a humidifier. If symptoms worsen or persist beyond 10 days, consult a healthcare provider."
    } else {
        "Monitor your symptoms closely and seek medical attention if they worsen or persist. Consider consulting with a healthcare provider for proper evaluation."
    };

    advice.to_string()
}

pub fn contextual_remedies(request: &DiagnoseRequest) -> Vec<String> {
    let mut remedies: Vec<&str> = Vec::new();

    if request.mentions_any(&["headache"]) {
        remedies.extend([
            "Apply a cold or warm compress to your head or neck",
            "Rest in a quiet, dark room",
            "Stay hydrated with water",
            "Practice relaxation techniques or gentle neck stretches",
        ]);
    }
    if request.mentions_any(&["fever"]) {
        remedies.extend([
            "Stay hydrated with water, clear broths, or electrolyte solutions",
            "Rest and avoid strenuous activities",
            "Use a cool, damp cloth on your forehead",
            "Dress in lightweight clothing",
        ]);
    }
    if request.mentions_any(&["cough", "cold"]) {
        remedies.extend([
            "Drink warm liquids like tea with honey",
            "Use a humidifier or breathe steam from a hot shower",
            "Gargle with warm salt water for sore throat",
            "Get plenty of rest to help your body recover",
        ]);
    }
    if request.mentions_any(&["stomach", "nausea"]) {
        remedies.extend([
            "Eat bland foods like crackers, toast, or rice",
            "Stay hydrated with small, frequent sips of water",
            "Try ginger tea or peppermint for nausea relief",
            "Avoid dairy, caffeine, and fatty foods",
        ]);
    }
    if remedies.is_empty() {
        remedies.extend([
            "Get adequate rest and sleep",
            "Stay hydrated by drinking plenty of fluids",
            "Eat nutritious, easily digestible foods",
            "Monitor your symptoms and note any changes",
        ]);
    }

    remedies.into_iter().take(6).map(String::from).collect()
}

pub fn diagnosis_summary(request: &DiagnoseRequest, conditions: &[Condition]) -> String {
    let top = conditions.first().map(|c| c.condition.as_str());

    match request.pain_level {
        Some(pain) if pain >= 8 => format!(
            "Based on your symptoms and high pain level ({}/10), you may be experiencing {}. The severity of your pain suggests prompt medical evaluation would be beneficial.",
            pain,
            top.unwrap_or("a condition that requires attention")
        ),
        Some(pain) if pain >= 5 => format!(
            "Your symptoms suggest you may be experiencing {}. With a moderate pain level of {}/10, monitoring and possible medical consultation is recommended.",
            top.unwrap_or("a medical condition"),
            pain
        ),
        _ => format!(
            "Based on your reported symptoms, you may be experiencing {} or a related condition. The symptoms you've described warrant attention and monitoring.",
            top.unwrap_or("a condition")
        ),
    }
}

pub fn next_steps(request: &DiagnoseRequest) -> Vec<String> {
    let severity = severity_from_context(request);
    let pain = request.pain_level;

    let steps: [&str; 4] = if severity == Severity::High || pain.is_some_and(|p| p >= 8) {
        [
            "Seek medical attention within 24 hours",
            "Consider visiting urgent care or emergency room if symptoms are severe",
            "Monitor symptoms closely and seek immediate help if they worsen",
            "Have someone accompany you to medical appointments if possible",
        ]
    } else if severity == Severity::Medium || pain.is_some_and(|p| p >= 4) {
        [
            "Schedule an appointment with your healthcare provider within 2-3 days",
            "Keep a symptom diary noting changes and triggers",
            "Follow recommended home care measures",
            "Seek immediate care if symptoms significantly worsen",
        ]
    } else {
        [
            "Monitor symptoms for 24-48 hours",
            "Try appropriate home remedies and self-care measures",
            "Schedule a routine appointment if symptoms persist beyond a week",
            "Maintain good hydration and rest",
        ]
    };

    steps.iter().map(|s| s.to_string()).collect()
}

pub fn when_to_seek_help(request: &DiagnoseRequest) -> String {
    if request.pain_level.is_some_and(|p| p >= 8) {
        "Seek immediate medical attention if pain becomes unbearable, if you develop difficulty breathing, severe dizziness, or if symptoms rapidly worsen.".to_string()
    } else {
        "Contact your healthcare provider if symptoms worsen significantly, if you develop high fever (over 103°F), severe pain, difficulty breathing, or if symptoms persist beyond expected recovery time.".to_string()
    }
}

pub fn recovery_time(request: &DiagnoseRequest) -> String {
    let estimate = if request.mentions_any(&["cold", "cough"]) {
        "Most cold symptoms resolve within 7-10 days with proper rest and care."
    } else if request.mentions_any(&["headache"]) {
        "Tension headaches typically resolve within a few hours to 2 days. Migraines may last 4-72 hours."
    } else if request.mentions_any(&["stomach", "nausea"]) {
        "Gastrointestinal symptoms often improve within 24-48 hours with proper care and hydration."
    } else {
        match severity_from_context(request) {
            Severity::High => "Recovery time depends on proper medical treatment. Follow your healthcare provider's guidance for expected recovery timeline.",
            Severity::Medium | Severity::Moderate => "Most moderate conditions improve within 1-2 weeks with appropriate care and rest.",
            Severity::Low => "Mild symptoms typically resolve within 3-7 days with adequate self-care.",
        }
    };

    estimate.to_string()
}

pub fn condition_description(name: &str) -> String {
    if name.trim().is_empty() {
        return "Medical condition requiring evaluation.".to_string();
    }

    let known = match name.trim().to_lowercase().as_str() {
        "tension headache" => "Most common type of headache, often caused by stress, poor posture, or muscle tension.",
        "migraine" => "Neurological condition causing intense headaches, often with sensitivity to light and sound.",
        "cluster headache" => "Severe headaches that occur in cyclical patterns, typically affecting one side of the head.",
        "common cold" => "Viral infection of the upper respiratory tract causing congestion and mild symptoms.",
        "influenza" => "Viral infection affecting the respiratory system with systemic symptoms like fever and body aches.",
        "upper respiratory infection" => "Infection affecting the nose, throat, and upper airways.",
        "gastroenteritis" => "Inflammation of the stomach and intestines, often causing nausea and digestive issues.",
        "food poisoning" => "Illness caused by consuming contaminated food, typically causing gastrointestinal symptoms.",
        "viral infection" => "General viral infection that can affect various body systems.",
        "bacterial infection" => "Bacterial infection that may require antibiotic treatment.",
        "allergic rhinitis" => "Allergic reaction causing cold-like symptoms such as sneezing and congestion.",
        "sinusitis" => "Inflammation of the sinus cavities, often causing facial pain and congestion.",
        _ => return format!("{} is a medical condition that may require professional evaluation.", name.trim()),
    };

    known.to_string()
}

/// Complete local assessment for when the remote API cannot be reached.
pub fn fallback_response(request: &DiagnoseRequest) -> DiagnoseResponse {
    let mut jitter = ConfidenceJitter::for_request(request);

    let mut conditions = symptom_based_conditions(request, &mut jitter);
    debug!("Fallback matched {} keyword conditions", conditions.len());
    pad_conditions(&mut conditions, &mut jitter);
    let conditions = rank_conditions(conditions, FALLBACK_MAX_CONDITIONS);

    DiagnoseResponse {
        advice: contextual_advice(request),
        diagnosis_summary: diagnosis_summary(request, &conditions),
        conditions,
        disclaimer: FALLBACK_DISCLAIMER.to_string(),
        home_remedies: contextual_remedies(request),
        severity: severity_from_context(request),
        next_steps: next_steps(request),
        when_to_seek_help: when_to_seek_help(request),
        estimated_recovery_time: recovery_time(request),
    }
}
