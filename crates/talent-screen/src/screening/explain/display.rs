use std::collections::BTreeMap;

use crate::screening::encoding::{EDUCATION, MONTHS_UNEMPLOYED, SOFT_SKILL_SCORE, TECHNICAL_SCORE};

/// Human-readable labels for feature columns. Unlisted columns keep their identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNames {
    names: BTreeMap<String, String>,
}

impl Default for DisplayNames {
    fn default() -> Self {
        Self::new([
            (EDUCATION, "Education"),
            (TECHNICAL_SCORE, "Technical Score"),
            (SOFT_SKILL_SCORE, "Soft Skills"),
            (MONTHS_UNEMPLOYED, "Months Unemployed"),
        ])
    }
}

impl DisplayNames {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(column, label)| (column.into(), label.into()))
                .collect(),
        }
    }

    pub fn display_name<'a>(&'a self, column: &'a str) -> &'a str {
        self.names.get(column).map(String::as_str).unwrap_or(column)
    }
}
