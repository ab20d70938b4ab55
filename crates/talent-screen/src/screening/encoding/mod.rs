//! Deterministic transform from candidate profiles to schema-aligned feature vectors.
//!
//! Training and inference both go through [`FeatureEncoder::encode`]; column alignment happens
//! in exactly one place, the final reindex against the [`TrainingSchema`].

mod schema;
mod vocabulary;

pub use schema::{
    TrainingSchema, EDUCATION, EXPERIENCE_YEARS, MONTHS_UNEMPLOYED, NUMERIC_COLUMNS,
    SOFT_SKILL_SCORE, TECHNICAL_SCORE,
};
pub use vocabulary::{EducationOrdinals, EncodingConfig, LanguageVocabulary};

use super::domain::CandidateProfile;
use super::error::UnknownCategoryError;

/// Numeric feature values bound to the schema they were aligned against.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: TrainingSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn from_parts(schema: TrainingSchema, values: Vec<f64>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.schema
            .position(column)
            .and_then(|index| self.values.get(index).copied())
    }

    /// `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Stateless encoder over a fixed set of category tables.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    config: EncodingConfig,
}

impl FeatureEncoder {
    pub fn new(config: EncodingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// The schema this encoder's tables produce.
    pub fn schema(&self) -> TrainingSchema {
        TrainingSchema::from_config(&self.config)
    }

    pub fn encode(
        &self,
        profile: &CandidateProfile,
        schema: &TrainingSchema,
    ) -> Result<FeatureVector, UnknownCategoryError> {
        let working = self.working_columns(profile)?;
        Ok(reindex(&working, schema))
    }

    fn working_columns<'a>(
        &'a self,
        profile: &CandidateProfile,
    ) -> Result<Vec<(&'a str, f64)>, UnknownCategoryError> {
        let vocabulary = &self.config.languages;
        let mut working = Vec::with_capacity(NUMERIC_COLUMNS.len() + vocabulary.len() + 1);
        working.push((EXPERIENCE_YEARS, f64::from(profile.experience_years)));
        working.push((TECHNICAL_SCORE, f64::from(profile.technical_score)));
        working.push((SOFT_SKILL_SCORE, f64::from(profile.soft_skill_score)));
        working.push((MONTHS_UNEMPLOYED, f64::from(profile.months_unemployed)));

        let mut indicators = vec![0.0; vocabulary.len()];
        for language in &profile.languages {
            let canonical = vocabulary.resolve(language)?;
            if let Some(slot) = vocabulary
                .languages()
                .iter()
                .position(|known| known == canonical)
            {
                indicators[slot] = 1.0;
            }
        }
        working.extend(
            vocabulary
                .languages()
                .iter()
                .map(String::as_str)
                .zip(indicators),
        );

        working.push((
            EDUCATION,
            f64::from(self.config.education.ordinal(profile.education)),
        ));
        Ok(working)
    }
}

/// Aligns produced columns to `schema`: missing columns become 0, unknown ones are dropped.
fn reindex(working: &[(&str, f64)], schema: &TrainingSchema) -> FeatureVector {
    let values = schema
        .columns()
        .iter()
        .map(|column| {
            working
                .iter()
                .find(|(name, _)| *name == column.as_str())
                .map(|(_, value)| *value)
                .unwrap_or(0.0)
        })
        .collect();
    FeatureVector::from_parts(schema.clone(), values)
}
