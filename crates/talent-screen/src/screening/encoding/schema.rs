use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::vocabulary::EncodingConfig;

pub const EXPERIENCE_YEARS: &str = "experience_years";
pub const TECHNICAL_SCORE: &str = "technical_score";
pub const SOFT_SKILL_SCORE: &str = "soft_skill_score";
pub const MONTHS_UNEMPLOYED: &str = "months_unemployed";
pub const EDUCATION: &str = "education";

/// Numeric columns, in the order they lead every schema.
pub const NUMERIC_COLUMNS: [&str; 4] = [
    EXPERIENCE_YEARS,
    TECHNICAL_SCORE,
    SOFT_SKILL_SCORE,
    MONTHS_UNEMPLOYED,
];

/// Ordered column layout every feature vector is aligned to.
///
/// Cloning shares the underlying column list.
#[derive(Debug, Clone)]
pub struct TrainingSchema {
    columns: Arc<[String]>,
}

impl TrainingSchema {
    /// Numeric columns, one indicator per vocabulary language, then `education`.
    pub fn from_config(config: &EncodingConfig) -> Self {
        let columns = NUMERIC_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain(config.languages.languages().iter().cloned())
            .chain(std::iter::once(EDUCATION.to_string()))
            .collect::<Vec<_>>();
        Self::from_columns(columns)
    }

    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|candidate| candidate == column)
    }
}

impl PartialEq for TrainingSchema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.columns, &other.columns) || self.columns == other.columns
    }
}

impl Serialize for TrainingSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.columns.iter())
    }
}
