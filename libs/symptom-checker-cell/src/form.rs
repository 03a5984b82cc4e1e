use serde::Serialize;
use tracing::debug;

use shared_models::auth::UserProfile;
use shared_models::error::{AppError, FieldErrors};
use shared_models::symptom::SymptomFormData;

pub const MIN_SYMPTOMS_LEN: usize = 5;
pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 120;
pub const GENDER_OPTIONS: [&str; 4] = ["male", "female", "other", "prefer-not-to-say"];

/// Initial values for the symptom form. Profile values the form would accept
/// are filled in and locked; anything else is left for the user to enter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDefaults {
    pub symptoms: String,
    pub age: String,
    pub gender: String,
    pub duration: String,
    pub age_locked: bool,
    pub gender_locked: bool,
    pub gender_options: Vec<&'static str>,
}

impl FormDefaults {
    pub fn for_profile(profile: &UserProfile) -> Self {
        let age = profile.age.filter(|years| accepted_age(*years));
        let gender = profile.gender.as_deref().and_then(accepted_gender);

        Self {
            symptoms: String::new(),
            age: age.map(|a| a.to_string()).unwrap_or_default(),
            age_locked: age.is_some(),
            gender_locked: gender.is_some(),
            gender: gender.unwrap_or_default(),
            duration: String::new(),
            gender_options: GENDER_OPTIONS.to_vec(),
        }
    }

    /// Overwrites locked fields of a submission with the profile values.
    pub fn apply_locks(&self, mut form: SymptomFormData) -> SymptomFormData {
        if self.age_locked {
            form.age = self.age.clone();
        }
        if self.gender_locked {
            form.gender = self.gender.clone();
        }
        form
    }
}

fn accepted_age(years: u32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&years)
}

/// Lowercased option when `gender` is one of `GENDER_OPTIONS`.
fn accepted_gender(gender: &str) -> Option<String> {
    let gender = gender.trim().to_lowercase();
    GENDER_OPTIONS.contains(&gender.as_str()).then_some(gender)
}

pub fn field_errors(form: &SymptomFormData) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.symptoms.trim().chars().count() < MIN_SYMPTOMS_LEN {
        errors.insert(
            "symptoms".into(),
            "Please describe your symptoms in more detail".into(),
        );
    }

    let age = form.age.trim();
    if age.is_empty() {
        errors.insert("age".into(), "Please enter your age".into());
    } else if !form.age_years().is_some_and(accepted_age) {
        errors.insert(
            "age".into(),
            format!("Please enter a valid age between {} and {}", MIN_AGE, MAX_AGE),
        );
    }

    let gender = form.gender.trim();
    if gender.is_empty() {
        errors.insert("gender".into(), "Please select your gender".into());
    } else if accepted_gender(gender).is_none() {
        errors.insert("gender".into(), "Please select a valid gender".into());
    }

    if form.duration.trim().is_empty() {
        errors.insert(
            "duration".into(),
            "Please specify how long you've had these symptoms".into(),
        );
    }

    errors
}

/// Validates a submission for `profile`, returning the data the conversation
/// will start from.
pub fn validate_submission(
    form: SymptomFormData,
    profile: &UserProfile,
) -> Result<SymptomFormData, AppError> {
    let form = FormDefaults::for_profile(profile).apply_locks(form);
    let errors = field_errors(&form);

    if !errors.is_empty() {
        debug!("Symptom form rejected with {} error(s)", errors.len());
        return Err(AppError::InvalidForm(errors));
    }

    Ok(SymptomFormData {
        symptoms: form.symptoms.trim().to_string(),
        age: form.age.trim().to_string(),
        gender: form.gender.trim().to_lowercase(),
        duration: form.duration.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use shared_utils::test_utils::{TestForms, TestProfile};

    use super::*;

    #[test]
    fn test_valid_form_passes() {
        let profile = TestProfile::basic("Jo", "jo@x.com");
        let form = validate_submission(TestForms::headache_and_fever(), &profile).unwrap();

        assert_eq!(form, TestForms::headache_and_fever());
    }

    #[test]
    fn test_all_failing_fields_reported_together() {
        let form = SymptomFormData {
            symptoms: "ow".into(),
            age: "".into(),
            gender: "".into(),
            duration: " ".into(),
        };

        let errors = field_errors(&form);

        assert_eq!(errors.len(), 4);
        assert_eq!(errors["symptoms"], "Please describe your symptoms in more detail");
        assert_eq!(errors["age"], "Please enter your age");
        assert_eq!(errors["gender"], "Please select your gender");
        assert_eq!(errors["duration"], "Please specify how long you've had these symptoms");
    }

    #[test]
    fn test_age_out_of_range() {
        for age in ["0", "121", "thirty"] {
            let form = SymptomFormData {
                age: age.into(),
                ..TestForms::headache_and_fever()
            };
            assert_eq!(
                field_errors(&form)["age"],
                "Please enter a valid age between 1 and 120"
            );
        }
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let form = SymptomFormData {
            gender: "robot".into(),
            ..TestForms::headache_and_fever()
        };

        let result = validate_submission(form, &TestProfile::basic("Jo", "jo@x.com"));
        assert_matches!(result, Err(AppError::InvalidForm(fields)) if fields.contains_key("gender"));
    }

    #[test]
    fn test_profile_prefills_and_locks() {
        let profile = TestProfile::with_demographics(52, "male");
        let defaults = FormDefaults::for_profile(&profile);

        assert_eq!(defaults.age, "52");
        assert_eq!(defaults.gender, "male");
        assert!(defaults.age_locked && defaults.gender_locked);

        let submitted = SymptomFormData {
            age: "19".into(),
            gender: "female".into(),
            ..TestForms::headache_and_fever()
        };
        let form = validate_submission(submitted, &profile).unwrap();

        assert_eq!(form.age, "52");
        assert_eq!(form.gender, "male");
    }

    #[test]
    fn test_unlisted_profile_gender_is_not_locked() {
        let profile = TestProfile::with_demographics(40, "Non-binary");
        let defaults = FormDefaults::for_profile(&profile);

        assert!(defaults.age_locked);
        assert!(!defaults.gender_locked);
        assert!(defaults.gender.is_empty());

        let submitted = SymptomFormData {
            gender: "other".into(),
            ..TestForms::headache_and_fever()
        };
        let form = validate_submission(submitted, &profile).unwrap();
        assert_eq!(form.gender, "other");
        assert_eq!(form.age, "40");
    }

    #[test]
    fn test_out_of_range_profile_age_is_not_locked() {
        for age in [0, 150] {
            let profile = TestProfile::with_demographics(age, "Female");
            let defaults = FormDefaults::for_profile(&profile);

            assert!(!defaults.age_locked);
            assert!(defaults.age.is_empty());
            assert!(defaults.gender_locked);
            assert_eq!(defaults.gender, "female");

            let form = validate_submission(TestForms::headache_and_fever(), &profile).unwrap();
            assert_eq!(form.age, "30");
        }
    }

    #[test]
    fn test_no_profile_demographics_leaves_fields_open() {
        let defaults = FormDefaults::for_profile(&TestProfile::basic("Jo", "jo@x.com"));

        assert!(defaults.age.is_empty());
        assert!(!defaults.age_locked);
        assert!(!defaults.gender_locked);
        assert_eq!(defaults.gender_options.len(), 4);
    }
}
