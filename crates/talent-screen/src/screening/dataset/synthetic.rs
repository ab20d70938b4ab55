use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::LabeledCandidate;
use crate::screening::domain::{CandidateProfile, Education, Language};
use crate::screening::encoding::LanguageVocabulary;

/// Size and seed of a generated training set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticOptions {
    pub samples: usize,
    pub seed: u64,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            samples: 1000,
            seed: 42,
        }
    }
}

/// Generate a reproducible labeled dataset.
///
/// Technical scores follow N(70, 15) clipped to 0..=100, months unemployed an exponential
/// with mean 6, and each candidate lists up to two languages drawn with replacement.
pub fn generate(options: &SyntheticOptions, vocabulary: &LanguageVocabulary) -> Vec<LabeledCandidate> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut records = Vec::with_capacity(options.samples);

    for _ in 0..options.samples {
        let experience_years = rng.random_range(0..10u32);
        let education = Education::ALL[rng.random_range(0..Education::ALL.len())];
        let technical_score = normal(&mut rng, 70.0, 15.0).clamp(0.0, 100.0) as u8;
        let soft_skill_score = rng.random_range(1..=5u8);
        let months_unemployed = exponential(&mut rng, 6.0) as u32;

        let mut languages = BTreeSet::new();
        if !vocabulary.is_empty() {
            let picks = rng.random_range(0..3usize);
            for _ in 0..picks {
                let slot = rng.random_range(0..vocabulary.len());
                languages.insert(Language::new(vocabulary.languages()[slot].as_str()));
            }
        }

        records.push(LabeledCandidate::from_rule(CandidateProfile {
            experience_years,
            education,
            technical_score,
            soft_skill_score,
            months_unemployed,
            languages,
        }));
    }

    records
}

/// Box-Muller draw from N(mean, std_dev).
fn normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + std_dev * z
}

/// Inverse-CDF draw from an exponential distribution with the given mean.
fn exponential(rng: &mut StdRng, mean: f64) -> f64 {
    let u = rng.random::<f64>();
    -mean * (1.0 - u).ln()
}
