use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::error::{ScreeningError, UnknownCategoryError, ValidationError};

/// Highest education level reported by the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Education {
    Degree,
    Master,
    Bootcamp,
}

impl Education {
    pub const ALL: [Education; 3] = [Education::Degree, Education::Master, Education::Bootcamp];

    pub const fn label(self) -> &'static str {
        match self {
            Education::Degree => "Degree",
            Education::Master => "Master",
            Education::Bootcamp => "Bootcamp",
        }
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Education {
    type Err = UnknownCategoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Education::ALL
            .into_iter()
            .find(|education| education.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategoryError::new("education", trimmed))
    }
}

/// Programming language named by the candidate.
///
/// Membership in the trained vocabulary is checked by the encoder, not here, so that an
/// unknown language surfaces as an encoding error instead of disappearing during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(pub String);

impl Language {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated candidate record consumed by the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub experience_years: u32,
    pub education: Education,
    /// 0 to 100.
    pub technical_score: u8,
    /// 1 to 5.
    pub soft_skill_score: u8,
    pub months_unemployed: u32,
    pub languages: BTreeSet<Language>,
}

/// Candidate record as received from a caller, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    pub experience_years: i64,
    pub education: String,
    pub technical_score: i64,
    pub soft_skill_score: i64,
    pub months_unemployed: i64,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl TryFrom<CandidateSubmission> for CandidateProfile {
    type Error = ScreeningError;

    fn try_from(submission: CandidateSubmission) -> Result<Self, Self::Error> {
        let experience_years = non_negative("experience_years", submission.experience_years)?;
        let technical_score = bounded("technical_score", submission.technical_score, 0, 100)?;
        let soft_skill_score = bounded("soft_skill_score", submission.soft_skill_score, 1, 5)?;
        let months_unemployed = non_negative("months_unemployed", submission.months_unemployed)?;
        let education = submission.education.parse::<Education>()?;

        let mut languages = BTreeSet::new();
        for raw in submission.languages {
            let language = Language::new(raw);
            if language.as_str().is_empty() {
                return Err(ValidationError::new("languages", "language names cannot be blank").into());
            }
            languages.insert(language);
        }

        Ok(Self {
            experience_years,
            education,
            technical_score,
            soft_skill_score,
            months_unemployed,
            languages,
        })
    }
}

impl From<&CandidateProfile> for CandidateSubmission {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            experience_years: i64::from(profile.experience_years),
            education: profile.education.label().to_string(),
            technical_score: i64::from(profile.technical_score),
            soft_skill_score: i64::from(profile.soft_skill_score),
            months_unemployed: i64::from(profile.months_unemployed),
            languages: profile
                .languages
                .iter()
                .map(|language| language.as_str().to_string())
                .collect(),
        }
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value)
        .map_err(|_| ValidationError::new(field, format!("expected a whole number >= 0, got {value}")))
}

fn bounded(field: &'static str, value: i64, min: u8, max: u8) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|score| (min..=max).contains(score))
        .ok_or_else(|| {
            ValidationError::new(field, format!("expected {min} to {max}, got {value}"))
        })
}

/// Hiring decision produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    PartiallyApproved,
    Rejected,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::PartiallyApproved => "PartiallyApproved",
            Decision::Rejected => "Rejected",
        }
    }

    /// Position of this decision in [`ClassOrder`].
    pub const fn class_index(self) -> usize {
        match self {
            Decision::Approved => 0,
            Decision::PartiallyApproved => 1,
            Decision::Rejected => 2,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Decision {
    type Err = UnknownCategoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        ClassOrder::DECISIONS
            .into_iter()
            .find(|decision| decision.label() == trimmed)
            .ok_or_else(|| UnknownCategoryError::new("decision", trimmed))
    }
}

/// Canonical class layout: decision labels in lexicographic order.
///
/// Every positional probability or margin array in the crate is indexed by this order.
pub struct ClassOrder;

impl ClassOrder {
    pub const DECISIONS: [Decision; 3] = [
        Decision::Approved,
        Decision::PartiallyApproved,
        Decision::Rejected,
    ];

    pub const LEN: usize = Self::DECISIONS.len();

    pub fn decision_at(index: usize) -> Option<Decision> {
        Self::DECISIONS.get(index).copied()
    }

    pub fn labels() -> [&'static str; 3] {
        Self::DECISIONS.map(Decision::label)
    }
}

/// Per-class probabilities keyed by decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities([f64; ClassOrder::LEN]);

impl ClassProbabilities {
    pub(crate) fn from_class_order(values: [f64; ClassOrder::LEN]) -> Self {
        Self(values)
    }

    pub fn get(&self, decision: Decision) -> f64 {
        self.0[decision.class_index()]
    }

    /// Positional view; index `i` belongs to `ClassOrder::DECISIONS[i]`.
    pub fn as_array(&self) -> [f64; ClassOrder::LEN] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Decision, f64)> + '_ {
        ClassOrder::DECISIONS
            .into_iter()
            .zip(self.0.iter().copied())
    }
}

impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ClassOrder::LEN))?;
        for (decision, probability) in self.iter() {
            map.serialize_entry(decision.label(), &probability)?;
        }
        map.end()
    }
}
