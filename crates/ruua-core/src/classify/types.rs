//! Classification types

use serde::{Deserialize, Serialize};

use crate::record::EntityRecord;

/// Evidence strength class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Property value is itself a country
    Structured,
    /// Property value resolves to a country through the location graph
    Indirect,
    /// Regex match on labels, descriptions or aliases
    Text,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Structured, Tier::Indirect, Tier::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Indirect => "indirect",
            Self::Text => "text",
        }
    }

    /// Structured and indirect hits are backed by graph data, text hits are not
    pub fn is_grounded(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scoring target before the four-way label is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "RU")]
    Ru,
    #[serde(rename = "UA")]
    Ua,
    #[serde(rename = "OTHER")]
    Other,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ru => "RU",
            Self::Ua => "UA",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final attribution label. Exactly four values; there is no "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    Russian,
    Ukraine,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "other")]
    Other,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::Russian, Label::Ukraine, Label::Mixed, Label::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Russian => "Russian",
            Self::Ukraine => "Ukraine",
            Self::Mixed => "mixed",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an evidence item matched on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvidenceMatch {
    /// A property value, optionally resolved through the location graph
    Property {
        property: String,
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        country: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        depth: Option<usize>,
    },
    /// A text span in one language
    Text { lang: String, span: String },
}

/// One recorded hit. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub tier: Tier,
    pub bucket: Bucket,
    /// Audit identifier of the rule that fired
    pub rule_id: String,
    pub weight: i64,
    #[serde(rename = "match")]
    pub matched: EvidenceMatch,
}

/// Per-bucket totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BucketScores {
    pub ru: i64,
    pub ua: i64,
    pub other: i64,
}

impl BucketScores {
    pub fn get(&self, bucket: Bucket) -> i64 {
        match bucket {
            Bucket::Ru => self.ru,
            Bucket::Ua => self.ua,
            Bucket::Other => self.other,
        }
    }

    /// Saturates at `i64::MAX` so a positive total never wraps negative
    pub fn add(&mut self, bucket: Bucket, weight: i64) {
        let slot = match bucket {
            Bucket::Ru => &mut self.ru,
            Bucket::Ua => &mut self.ua,
            Bucket::Other => &mut self.other,
        };
        *slot = slot.saturating_add(weight);
    }
}

/// Aggregated scores with the grounded/text breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreVector {
    pub scores: BucketScores,
    /// Structured and indirect tiers
    pub structured_score: BucketScores,
    pub text_score: BucketScores,
}

impl ScoreVector {
    pub fn new(ru: i64, ua: i64, other: i64) -> Self {
        Self {
            scores: BucketScores { ru, ua, other },
            ..Self::default()
        }
    }

    pub fn ru(&self) -> i64 {
        self.scores.ru
    }

    pub fn ua(&self) -> i64 {
        self.scores.ua
    }

    pub fn other(&self) -> i64 {
        self.scores.other
    }

    /// Whether any structured or indirect hit landed in the `other` bucket
    pub fn other_is_grounded(&self) -> bool {
        self.structured_score.other > 0
    }

    pub fn is_empty(&self) -> bool {
        self.scores == BucketScores::default()
    }
}

/// Label, scores and the hits that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionResult {
    pub qid: String,
    pub label: Label,
    pub scores: ScoreVector,
    pub hits: Vec<EvidenceItem>,
}

/// Policy parameters echoed into every output record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub other_min_score: i64,
    pub other_requires_grounded_hit: bool,
}

/// `ru_ua_attribution_detail` as written to the output stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionDetail {
    #[serde(flatten)]
    pub scores: ScoreVector,
    pub hits: Vec<EvidenceItem>,
    pub policy: PolicySnapshot,
}

/// Output row: the merged record plus its attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: EntityRecord,
    pub ru_ua_attribution: Label,
    pub ru_ua_attribution_detail: AttributionDetail,
}

impl ClassifiedRecord {
    pub fn new(mut record: EntityRecord, result: AttributionResult, policy: PolicySnapshot) -> Self {
        // Re-classifying an already classified file must not duplicate keys
        record.extra.remove("ru_ua_attribution");
        record.extra.remove("ru_ua_attribution_detail");

        Self {
            record,
            ru_ua_attribution: result.label,
            ru_ua_attribution_detail: AttributionDetail {
                scores: result.scores,
                hits: result.hits,
                policy,
            },
        }
    }
}
