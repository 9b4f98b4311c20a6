//! Classifier configuration
//!
//! Weights and thresholds are run parameters, not constants of the method.
//! Defaults reproduce the reference runs: structured 3 / indirect 2 / text 1,
//! resolver depth 3, and `other` only from a score of 3 or more.

use serde::{Deserialize, Serialize};

use crate::classify::{Tier, RU_COUNTRY, UA_COUNTRY};
use crate::error::ConfigError;

/// Per-tier evidence weights. Must satisfy structured > indirect > text > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWeights {
    pub structured: i64,
    pub indirect: i64,
    pub text: i64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            structured: 3,
            indirect: 2,
            text: 1,
        }
    }
}

impl TierWeights {
    pub fn new(structured: i64, indirect: i64, text: i64) -> Self {
        Self {
            structured,
            indirect,
            text,
        }
    }

    pub fn weight(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Structured => self.structured,
            Tier::Indirect => self.indirect,
            Tier::Text => self.text,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in Tier::ALL {
            let value = self.weight(tier);
            if value <= 0 {
                return Err(ConfigError::NonPositiveWeight {
                    tier: tier.as_str(),
                    value,
                });
            }
        }
        if !(self.structured > self.indirect && self.indirect > self.text) {
            return Err(ConfigError::WeightOrdering {
                structured: self.structured,
                indirect: self.indirect,
                text: self.text,
            });
        }
        Ok(())
    }
}

/// Everything a classification run can be tuned with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum located-in hops the indirect resolver walks (default: 3)
    pub max_depth: usize,
    pub weights: TierWeights,
    /// Minimum `other` score for the `other` label (default: 3)
    pub other_min_score: i64,
    /// Additional keys treated as third-country nodes
    pub extra_other_countries: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            weights: TierWeights::default(),
            other_min_score: 3,
            extra_other_countries: Vec::new(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_weights(mut self, weights: TierWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_other_min_score(mut self, score: i64) -> Self {
        self.other_min_score = score;
        self
    }

    pub fn with_other_country(mut self, qid: impl Into<String>) -> Self {
        self.extra_other_countries.push(qid.into());
        self
    }

    /// Reject settings that would break the decision policy's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        self.weights.validate()?;
        if self.other_min_score < 0 {
            return Err(ConfigError::NegativeThreshold(self.other_min_score));
        }
        for qid in &self.extra_other_countries {
            let trimmed = qid.trim();
            if trimmed.is_empty() || trimmed == RU_COUNTRY || trimmed == UA_COUNTRY {
                return Err(ConfigError::InvalidCountryKey(qid.clone()));
            }
        }
        Ok(())
    }
}
