//! Evidence scoring
//!
//! Sums tier weights per bucket and splits the totals into grounded
//! (structured + indirect) and text contributions.

use super::types::{EvidenceItem, ScoreVector, Tier};
use crate::config::TierWeights;

pub struct Scorer {
    weights: TierWeights,
}

impl Scorer {
    pub fn new(weights: TierWeights) -> Self {
        Self { weights }
    }

    /// Score a hit list. No hits yields all zeros.
    pub fn score(&self, hits: &[EvidenceItem]) -> ScoreVector {
        let mut vector = ScoreVector::default();

        for hit in hits {
            let weight = self.weights.weight(hit.tier);
            vector.scores.add(hit.bucket, weight);
            match hit.tier {
                Tier::Structured | Tier::Indirect => vector.structured_score.add(hit.bucket, weight),
                Tier::Text => vector.text_score.add(hit.bucket, weight),
            }
        }

        vector
    }
}
