//! RU/UA attribution classification
//!
//! Turns a merged entity record into one of four labels with an audit trail:
//!
//! - **Russian**: RU evidence only
//! - **Ukraine**: UA evidence only
//! - **mixed**: both, or no usable evidence at all
//! - **other**: no RU/UA evidence and strong, structurally grounded third-country evidence
//!
//! # Evidence tiers
//!
//! ```text
//! structured (3) > indirect (2) > text (1)
//! ```
//!
//! # Example
//!
//! ```rust
//! use ruua_core::classify::{AttributionClassifier, Label, LocationGraph};
//! use ruua_core::{ClassifierConfig, EntityRecord};
//!
//! let classifier =
//!     AttributionClassifier::new(ClassifierConfig::default(), LocationGraph::new()).unwrap();
//! let record = EntityRecord::new("Q7747").with_property("P27", &["Q159"]);
//!
//! let result = classifier.classify_record(&record);
//! assert_eq!(result.label, Label::Russian);
//! assert_eq!(result.scores.ru(), 3);
//! ```

pub mod classifier;
pub mod extractor;
pub mod policy;
pub mod resolver;
mod scorer;
pub mod tables;
mod types;

pub use classifier::AttributionClassifier;
pub use extractor::EvidenceExtractor;
pub use policy::{decide_label, DecisionPolicy};
pub use resolver::{IndirectResolver, LocationGraph, Resolution, LOCATION_EDGE_PROPERTIES};
pub use scorer::Scorer;
pub use tables::{
    AttributionProperty, CountryTable, PatternSet, ReferenceTables, TextPattern,
    ATTRIBUTION_PROPERTIES, OTHER_COUNTRIES, RU_COUNTRY, UA_COUNTRY,
};
pub use types::{
    AttributionDetail, AttributionResult, Bucket, BucketScores, ClassifiedRecord, EvidenceItem,
    EvidenceMatch, Label, PolicySnapshot, ScoreVector, Tier,
};
