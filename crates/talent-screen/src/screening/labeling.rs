//! Rule used to label synthetic training records. Not consulted when classifying requests.

use super::domain::Decision;

/// Labels a record from its two score fields. Rules are tried in order and the first match
/// wins, so overlapping conditions resolve by position rather than strength.
pub fn label(technical_score: u8, soft_skill_score: u8) -> Decision {
    if technical_score >= 80 && soft_skill_score >= 4 {
        return Decision::Approved;
    }

    if (65..80).contains(&technical_score) || (3..4).contains(&soft_skill_score) {
        return Decision::PartiallyApproved;
    }

    if technical_score < 65 || soft_skill_score < 3 {
        return Decision::Rejected;
    }

    Decision::Rejected
}
