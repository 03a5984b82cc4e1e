use serde::{Deserialize, Serialize};

/// Validated output of the symptom form. Immutable once a conversation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomFormData {
    pub symptoms: String,
    pub age: String,
    pub gender: String,
    pub duration: String,
}

impl SymptomFormData {
    pub fn age_years(&self) -> Option<u32> {
        self.age.trim().parse().ok()
    }
}
