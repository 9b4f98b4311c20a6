//! Attribution classifier
//!
//! Orchestrates evidence extraction, scoring and the decision policy for every
//! merged record. Entities are independent of each other, so with the
//! `parallel` feature the set is classified on the rayon pool; results always
//! come back in input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use super::extractor::EvidenceExtractor;
use super::policy::DecisionPolicy;
use super::resolver::LocationGraph;
use super::scorer::Scorer;
use super::tables::ReferenceTables;
use super::types::{AttributionResult, ClassifiedRecord};
use crate::config::ClassifierConfig;
use crate::error::ConfigError;
use crate::record::EntityRecord;

/// Read-only classifier over a fixed configuration and location graph
pub struct AttributionClassifier {
    config: ClassifierConfig,
    tables: ReferenceTables,
    graph: LocationGraph,
    scorer: Scorer,
    policy: DecisionPolicy,
}

impl AttributionClassifier {
    /// Validate the configuration and build the lookup tables.
    /// Fails before any record is looked at.
    pub fn new(config: ClassifierConfig, graph: LocationGraph) -> Result<Self, ConfigError> {
        config.validate()?;
        let tables = ReferenceTables::new(&config)?;

        Ok(Self {
            scorer: Scorer::new(config.weights),
            policy: DecisionPolicy::new(config.other_min_score),
            config,
            tables,
            graph,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Classify a single record
    pub fn classify_record(&self, record: &EntityRecord) -> AttributionResult {
        let extractor = EvidenceExtractor::new(&self.tables, &self.graph, &self.config);
        let hits = extractor.extract(record);
        let scores = self.scorer.score(&hits);
        let label = self.policy.decide(&scores);

        debug!(
            qid = %record.qid,
            label = %label,
            ru = scores.ru(),
            ua = scores.ua(),
            other = scores.other(),
            hits = hits.len(),
            "classified"
        );

        AttributionResult {
            qid: record.qid.clone(),
            label,
            scores,
            hits,
        }
    }

    /// Classify every record, preserving input order
    #[cfg(feature = "parallel")]
    pub fn classify_all(&self, records: &[EntityRecord]) -> Vec<AttributionResult> {
        records
            .par_iter()
            .map(|record| self.classify_record(record))
            .collect()
    }

    /// Classify every record, preserving input order
    #[cfg(not(feature = "parallel"))]
    pub fn classify_all(&self, records: &[EntityRecord]) -> Vec<AttributionResult> {
        records
            .iter()
            .map(|record| self.classify_record(record))
            .collect()
    }

    /// Attach attribution to each record, producing output rows
    pub fn annotate(&self, records: Vec<EntityRecord>) -> Vec<ClassifiedRecord> {
        let results = self.classify_all(&records);
        let policy = self.policy.snapshot();

        records
            .into_iter()
            .zip(results)
            .map(|(record, result)| ClassifiedRecord::new(record, result, policy))
            .collect()
    }
}
