use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::models::{Condition, DiagnoseRequest};

pub const MIN_CONFIDENCE: f64 = 0.2;
pub const MAX_CONFIDENCE: f64 = 0.85;
pub const MAX_CONDITIONS: usize = 5;
pub const MIN_CONDITIONS: usize = 3;

/// Display-only confidence spread. Seeded from the request so the same
/// submission always renders the same numbers.
pub struct ConfidenceJitter {
    rng: StdRng,
}

impl ConfidenceJitter {
    pub fn for_request(request: &DiagnoseRequest) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(request.input.as_bytes());
        hasher.update([request.pain_level.unwrap_or(0)]);

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&hasher.finalize());

        Self {
            rng: StdRng::from_seed(seed),
        }
    }

    /// Uniform in `[base, base + spread)`.
    pub fn sample(&mut self, base: f64, spread: f64) -> f64 {
        base + self.rng.gen::<f64>() * spread
    }
}

/// Sorts descending, keeps the top `cap`, then steps each entry down by its
/// rank so the list reads as strictly ranked. Never drops below
/// `MIN_CONFIDENCE`.
pub fn rank_conditions(mut conditions: Vec<Condition>, cap: usize) -> Vec<Condition> {
    conditions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    conditions.truncate(cap);

    for (index, condition) in conditions.iter_mut().enumerate() {
        let attenuated = condition.confidence.min(MAX_CONFIDENCE) - index as f64 * 0.05;
        condition.confidence = attenuated.max(MIN_CONFIDENCE);
    }

    conditions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(name: &str, confidence: f64) -> Condition {
        Condition {
            condition: name.to_string(),
            confidence,
            matched_symptoms: vec![],
            description: None,
            urgency_level: None,
        }
    }

    #[test]
    fn test_jitter_is_reproducible_per_request() {
        let request = DiagnoseRequest {
            input: "Primary symptoms: headache".into(),
            pain_level: Some(4),
            ..DiagnoseRequest::default()
        };

        let a: Vec<f64> = {
            let mut j = ConfidenceJitter::for_request(&request);
            (0..4).map(|_| j.sample(0.5, 0.2)).collect()
        };
        let b: Vec<f64> = {
            let mut j = ConfidenceJitter::for_request(&request);
            (0..4).map(|_| j.sample(0.5, 0.2)).collect()
        };

        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.5..0.7).contains(v)));
    }

    #[test]
    fn test_rank_conditions_sorts_caps_and_floors() {
        let ranked = rank_conditions(
            vec![
                condition("a", 0.3),
                condition("b", 0.9),
                condition("c", 0.21),
                condition("d", 0.6),
                condition("e", 0.5),
                condition("f", 0.4),
            ],
            MAX_CONDITIONS,
        );

        let names: Vec<&str> = ranked.iter().map(|c| c.condition.as_str()).collect();
        assert_eq!(names, ["b", "d", "e", "f", "a"]);
        assert!((ranked[0].confidence - 0.85).abs() < 1e-9);
        assert!((ranked[1].confidence - 0.55).abs() < 1e-9);
        assert_eq!(ranked[4].confidence, MIN_CONFIDENCE);
        assert!(ranked.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }
}
