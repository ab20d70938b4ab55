use std::io::{Read, Write};

use serde::{Deserialize, Deserializer, Serialize};

use super::LabeledCandidate;
use crate::screening::domain::{CandidateProfile, CandidateSubmission, Decision};
use crate::screening::error::{DatasetError, ScreeningError};

const LANGUAGE_SEPARATOR: &str = ";";

#[derive(Debug, Serialize, Deserialize)]
struct CandidateRow {
    experience_years: i64,
    education: String,
    technical_score: i64,
    soft_skill_score: i64,
    months_unemployed: i64,
    #[serde(default)]
    languages: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    decision: Option<String>,
}

impl CandidateRow {
    fn into_record(self) -> Result<LabeledCandidate, ScreeningError> {
        let languages = self
            .languages
            .split(LANGUAGE_SEPARATOR)
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .map(str::to_string)
            .collect();
        let submission = CandidateSubmission {
            experience_years: self.experience_years,
            education: self.education,
            technical_score: self.technical_score,
            soft_skill_score: self.soft_skill_score,
            months_unemployed: self.months_unemployed,
            languages,
        };
        let profile = CandidateProfile::try_from(submission)?;

        match self.decision {
            Some(label) => Ok(LabeledCandidate {
                profile,
                decision: label.parse::<Decision>()?,
            }),
            None => Ok(LabeledCandidate::from_rule(profile)),
        }
    }

    fn from_record(record: &LabeledCandidate) -> Self {
        let submission = CandidateSubmission::from(&record.profile);
        Self {
            experience_years: submission.experience_years,
            education: submission.education,
            technical_score: submission.technical_score,
            soft_skill_score: submission.soft_skill_score,
            months_unemployed: submission.months_unemployed,
            languages: submission.languages.join(LANGUAGE_SEPARATOR),
            decision: Some(record.decision.label().to_string()),
        }
    }
}

pub(super) fn parse_records<R: Read>(reader: R) -> Result<Vec<LabeledCandidate>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<CandidateRow>().enumerate() {
        let row = row?;
        let record = row.into_record().map_err(|source| DatasetError::Record {
            row: index + 1,
            source: Box::new(source),
        })?;
        records.push(record);
    }

    Ok(records)
}

pub(super) fn write_records<W: Write>(
    writer: W,
    records: &[LabeledCandidate],
) -> Result<(), DatasetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CandidateRow::from_record(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
