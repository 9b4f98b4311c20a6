//! Error types

use thiserror::Error;

/// Invalid classifier configuration. Fatal at startup, before any record is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A tier weight is zero or negative
    #[error("weight for tier '{tier}' must be positive, got {value}")]
    NonPositiveWeight { tier: &'static str, value: i64 },

    /// Tier weights must be strictly ordered structured > indirect > text
    #[error(
        "tier weights must satisfy structured > indirect > text, got {structured} / {indirect} / {text}"
    )]
    WeightOrdering {
        structured: i64,
        indirect: i64,
        text: i64,
    },

    /// Resolver depth of zero would disable the indirect tier silently
    #[error("max_depth must be at least 1")]
    ZeroDepth,

    /// Threshold for the `other` label cannot be negative
    #[error("other_min_score must be non-negative, got {0}")]
    NegativeThreshold(i64),

    /// Extra other-country key is empty or collides with a reference country
    #[error("invalid other-country key '{0}'")]
    InvalidCountryKey(String),

    /// A text pattern failed to compile
    #[error("invalid text pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Input source declaration is unusable (empty tag)
    #[error("invalid input source: {0}")]
    InvalidSource(String),
}

/// A record that cannot be ingested. Skipped and counted, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed record from '{source_tag}' (line {line}): {reason}")]
pub struct MalformedRecordError {
    pub source_tag: String,
    /// 1-based line number within the source stream, 0 when not stream-backed
    pub line: usize,
    pub reason: String,
}

impl MalformedRecordError {
    pub fn new(source_tag: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self {
            source_tag: source_tag.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Top-level error for classification runs
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
