//! RU/UA Attribution Core
//!
//! Merges entity records harvested from several sources and labels each
//! merged entity as `Russian`, `Ukraine`, `mixed` or `other` from weighted,
//! auditable evidence, then reduces the run into a corpus report.
//!
//! # Features
//!
//! - `parallel` - Classify entities on the rayon thread pool (default)
//!
//! # Example
//!
//! ```rust
//! use ruua_core::record::SourceBatch;
//! use ruua_core::{pipeline, ClassifierConfig, EntityRecord, Label};
//!
//! let batch = SourceBatch::new(
//!     "wikidata",
//!     vec![EntityRecord::new("Q7747").with_property("P27", &["Q159"])],
//! );
//! let output = pipeline::run(vec![batch], None, &ClassifierConfig::default()).unwrap();
//!
//! assert_eq!(output.classified[0].ru_ua_attribution, Label::Russian);
//! assert_eq!(output.report.after_classify.attribution_counts[&Label::Russian], 1);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod record;
pub mod report;

// Re-export main types at crate root
pub use classify::{
    AttributionClassifier, AttributionResult, Bucket, ClassifiedRecord, EvidenceItem, Label,
    LocationGraph, ScoreVector, Tier,
};
pub use config::{ClassifierConfig, TierWeights};
pub use error::{ConfigError, Error, MalformedRecordError, Result};
pub use merge::{merge_sources, MergeOutcome, MergeStats, RecordMerger};
pub use pipeline::{run, RunOutput};
pub use record::{read_records, write_records, EntityRecord, SourceBatch, SourceInfo};
pub use report::{CorpusReport, PairOverlap, SourceTotals};
