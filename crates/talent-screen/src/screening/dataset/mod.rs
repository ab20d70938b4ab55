//! Labeled candidate records for the offline training step.
//!
//! Records come either from the seeded synthetic generator or from a CSV file; both paths
//! produce validated [`CandidateProfile`]s so training sees exactly what requests would.

mod parser;
mod synthetic;

pub use synthetic::{generate, SyntheticOptions};

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use super::domain::{CandidateProfile, Decision};
use super::error::DatasetError;
use super::labeling;

/// Candidate profile paired with its training label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledCandidate {
    pub profile: CandidateProfile,
    pub decision: Decision,
}

impl LabeledCandidate {
    /// Labels the profile with the scoring rule.
    pub fn from_rule(profile: CandidateProfile) -> Self {
        let decision = labeling::label(profile.technical_score, profile.soft_skill_score);
        Self { profile, decision }
    }
}

/// Load labeled candidates from a CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledCandidate>, DatasetError> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Parse labeled candidates; rows without a decision are labeled by the scoring rule.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<LabeledCandidate>, DatasetError> {
    parser::parse_records(reader)
}

pub fn write_csv<W: Write>(writer: W, records: &[LabeledCandidate]) -> Result<(), DatasetError> {
    parser::write_records(writer, records)
}
