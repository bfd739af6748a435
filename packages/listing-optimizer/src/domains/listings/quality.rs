//! Quality gate for generated listings.
//!
//! Only the spam flag changes what happens downstream. Length issues are
//! reported and logged, and the rewrite is kept anyway.

use super::models::JobRecord;
use super::rewrite::contains_spam_marker;

pub const TITLE_TOO_SHORT: &str = "title too short";
pub const TITLE_TOO_LONG: &str = "title too long";
pub const DESCRIPTION_TOO_SHORT: &str = "description too short";
pub const DESCRIPTION_TOO_LONG: &str = "description too long";
pub const DESCRIPTION_OVER_TRUNCATED: &str = "description over-truncated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityVerdict {
    Accepted,
    FlaggedSpam,
    /// Advisory: the rewrite is still used
    Rejected { issues: Vec<String> },
}

impl QualityVerdict {
    pub fn is_spam(&self) -> bool {
        matches!(self, QualityVerdict::FlaggedSpam)
    }

    pub fn issues(&self) -> &[String] {
        match self {
            QualityVerdict::Rejected { issues } => issues,
            _ => &[],
        }
    }
}

/// Length limits, counted in characters.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityThresholds {
    pub title_min: usize,
    pub title_max: usize,
    pub description_min: usize,
    pub description_max: usize,
    /// Rewrite must keep at least this share of the original description...
    pub min_retained_ratio: f64,
    /// ...when the original is longer than this
    pub retention_floor: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            title_min: 30,
            title_max: 65,
            description_min: 800,
            description_max: 1700,
            min_retained_ratio: 0.5,
            retention_floor: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QualityGate {
    thresholds: QualityThresholds,
}

impl QualityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    pub fn evaluate(
        &self,
        original: &JobRecord,
        candidate_title: &str,
        candidate_description: &str,
    ) -> QualityVerdict {
        if contains_spam_marker(candidate_title) || contains_spam_marker(candidate_description) {
            return QualityVerdict::FlaggedSpam;
        }

        let t = &self.thresholds;
        let mut issues = Vec::new();

        let title_len = candidate_title.chars().count();
        if title_len < t.title_min {
            issues.push(TITLE_TOO_SHORT.to_string());
        } else if title_len > t.title_max {
            issues.push(TITLE_TOO_LONG.to_string());
        }

        let description_len = candidate_description.chars().count();
        if description_len < t.description_min {
            issues.push(DESCRIPTION_TOO_SHORT.to_string());
        } else if description_len > t.description_max {
            issues.push(DESCRIPTION_TOO_LONG.to_string());
        }

        let original_len = original.description.chars().count();
        if original_len > t.retention_floor
            && (description_len as f64) < (original_len as f64) * t.min_retained_ratio
        {
            issues.push(DESCRIPTION_OVER_TRUNCATED.to_string());
        }

        if issues.is_empty() {
            QualityVerdict::Accepted
        } else {
            QualityVerdict::Rejected { issues }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::listings::rewrite::SPAM_SENTINEL;
    use crate::testing::filler;

    fn original(description_len: usize) -> JobRecord {
        JobRecord::new("Kasiyer", filler(description_len))
    }

    #[test]
    fn well_sized_rewrite_is_accepted() {
        let verdict = QualityGate::new().evaluate(&original(400), &filler(55), &filler(1200));
        assert_eq!(verdict, QualityVerdict::Accepted);
    }

    #[test]
    fn short_fields_are_reported_in_order() {
        let verdict = QualityGate::new().evaluate(&original(50), &filler(20), &filler(500));

        assert_eq!(
            verdict,
            QualityVerdict::Rejected {
                issues: vec![TITLE_TOO_SHORT.to_string(), DESCRIPTION_TOO_SHORT.to_string()],
            }
        );
    }

    #[test]
    fn long_fields_are_reported() {
        let verdict = QualityGate::new().evaluate(&original(50), &filler(70), &filler(1800));
        assert_eq!(verdict.issues(), [TITLE_TOO_LONG, DESCRIPTION_TOO_LONG]);
    }

    #[test]
    fn over_truncation_needs_long_original() {
        let gate = QualityGate::new();

        let verdict = gate.evaluate(&original(2000), &filler(50), &filler(900));
        assert_eq!(verdict.issues(), [DESCRIPTION_OVER_TRUNCATED]);

        let verdict = gate.evaluate(&original(100), &filler(50), &filler(900));
        assert_eq!(verdict, QualityVerdict::Accepted);
    }

    #[test]
    fn spam_marker_overrides_length_checks() {
        let gate = QualityGate::new();

        assert!(gate.evaluate(&original(50), SPAM_SENTINEL, "x").is_spam());
        assert!(gate.evaluate(&original(50), "x", SPAM_SENTINEL).is_spam());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let title: String = "ş".repeat(30);
        let verdict = QualityGate::new().evaluate(&original(50), &title, &filler(900));
        assert_eq!(verdict, QualityVerdict::Accepted);
    }
}
