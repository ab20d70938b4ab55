use serde::Serialize;

use crate::screening::domain::{Education, Language};
use crate::screening::error::UnknownCategoryError;

/// Ordinal codes written into the `education` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EducationOrdinals {
    pub degree: u8,
    pub master: u8,
    pub bootcamp: u8,
}

impl Default for EducationOrdinals {
    fn default() -> Self {
        Self {
            degree: 0,
            master: 1,
            bootcamp: 2,
        }
    }
}

impl EducationOrdinals {
    pub fn ordinal(&self, education: Education) -> u8 {
        match education {
            Education::Degree => self.degree,
            Education::Master => self.master,
            Education::Bootcamp => self.bootcamp,
        }
    }
}

/// Ordered set of languages that get an indicator column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LanguageVocabulary {
    languages: Vec<String>,
}

impl Default for LanguageVocabulary {
    fn default() -> Self {
        Self::new(["C++", "Java", "JavaScript", "Python", "SQL"])
    }
}

impl LanguageVocabulary {
    /// Builds a vocabulary in the given order; later case-insensitive duplicates are ignored.
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for language in languages {
            let language = language.into().trim().to_string();
            if language.is_empty()
                || unique
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(&language))
            {
                continue;
            }
            unique.push(language);
        }
        Self { languages: unique }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Canonical column name for a language, or an error when it was never trained on.
    pub fn resolve(&self, language: &Language) -> Result<&str, UnknownCategoryError> {
        self.languages
            .iter()
            .find(|known| known.eq_ignore_ascii_case(language.as_str()))
            .map(String::as_str)
            .ok_or_else(|| UnknownCategoryError::new("language", language.as_str()))
    }
}

/// Category tables shared by schema construction and encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncodingConfig {
    pub education: EducationOrdinals,
    pub languages: LanguageVocabulary,
}
