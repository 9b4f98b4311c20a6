//! Decision policy
//!
//! Maps a score vector to one of four labels. Any RU/UA signal decides the
//! label on its own; without it the entity stays `mixed` unless third-country
//! evidence is both strong enough and backed by at least one structured or
//! indirect hit. Text-only third-country mentions never yield `other`.

use super::types::{Label, PolicySnapshot, ScoreVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionPolicy {
    other_min_score: i64,
}

impl DecisionPolicy {
    pub fn new(other_min_score: i64) -> Self {
        Self { other_min_score }
    }

    pub fn other_min_score(&self) -> i64 {
        self.other_min_score
    }

    /// Total over every score vector
    pub fn decide(&self, scores: &ScoreVector) -> Label {
        decide_label(
            scores.ru(),
            scores.ua(),
            scores.other(),
            scores.other_is_grounded(),
            self.other_min_score,
        )
    }

    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            other_min_score: self.other_min_score,
            other_requires_grounded_hit: true,
        }
    }
}

/// The decision table on raw numbers
pub fn decide_label(ru: i64, ua: i64, other: i64, other_grounded: bool, other_min_score: i64) -> Label {
    match (ru > 0, ua > 0) {
        (true, true) => Label::Mixed,
        (true, false) => Label::Russian,
        (false, true) => Label::Ukraine,
        (false, false) if other >= other_min_score && other_grounded => Label::Other,
        (false, false) => Label::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_reference_countries_is_mixed() {
        assert_eq!(decide_label(1, 1, 0, false, 3), Label::Mixed);
        assert_eq!(decide_label(9, 3, 12, true, 3), Label::Mixed);
    }

    #[test]
    fn single_reference_country_wins_over_other() {
        assert_eq!(decide_label(3, 0, 8, true, 3), Label::Russian);
        assert_eq!(decide_label(0, 1, 8, true, 3), Label::Ukraine);
    }

    #[test]
    fn no_evidence_is_mixed() {
        assert_eq!(DecisionPolicy::new(3).decide(&ScoreVector::default()), Label::Mixed);
    }

    #[test]
    fn zero_threshold_still_needs_grounded_other() {
        assert_eq!(decide_label(0, 0, 0, false, 0), Label::Mixed);
        assert_eq!(decide_label(0, 0, 2, true, 0), Label::Other);
    }

    #[test]
    fn weak_grounded_other_is_mixed() {
        // one indirect third-country hit at weight 2, threshold 3
        assert_eq!(decide_label(0, 0, 2, true, 3), Label::Mixed);
    }

    #[test]
    fn strong_text_only_other_is_mixed() {
        assert_eq!(decide_label(0, 0, 10, false, 3), Label::Mixed);
    }

    #[test]
    fn strong_grounded_other_is_other() {
        assert_eq!(decide_label(0, 0, 3, true, 3), Label::Other);
    }
}
