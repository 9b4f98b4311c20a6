//! End-to-end classification run
//!
//! Validate, merge, build the location graph, classify, report. The whole
//! merged set is held in memory; output rows come back in key order.

use tracing::info;

use crate::classify::{AttributionClassifier, ClassifiedRecord, LocationGraph};
use crate::config::ClassifierConfig;
use crate::error::{ConfigError, Result};
use crate::merge::merge_sources;
use crate::record::SourceBatch;
use crate::report::CorpusReport;

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// One row per merged entity, sorted by key
    pub classified: Vec<ClassifiedRecord>,
    pub report: CorpusReport,
}

/// Reject empty source tags. A repeated tag folds into the same source.
pub fn validate_tags(batches: &[SourceBatch]) -> std::result::Result<(), ConfigError> {
    if batches.iter().any(|b| b.tag.trim().is_empty()) {
        return Err(ConfigError::InvalidSource("empty source tag".to_string()));
    }
    Ok(())
}

/// Run the classifier over prioritised sources.
///
/// `places` only contributes located-in edges; its records are not merged,
/// classified or reported.
pub fn run(
    batches: Vec<SourceBatch>,
    places: Option<SourceBatch>,
    config: &ClassifierConfig,
) -> Result<RunOutput> {
    config.validate()?;
    validate_tags(&batches)?;

    let outcome = merge_sources(batches);
    info!(
        rows = outcome.stats.rows_loaded,
        merged = outcome.records.len(),
        malformed = outcome.stats.malformed.len(),
        "merged sources"
    );

    let mut graph = LocationGraph::from_records(&outcome.records);
    if let Some(places) = places {
        graph.extend_from_records(places.records.iter().filter(|r| r.has_identity()));
    }
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built location graph"
    );

    let classifier = AttributionClassifier::new(config.clone(), graph)?;
    let classified = classifier.annotate(outcome.records);
    let report = CorpusReport::build(&outcome.stats, &classified);

    info!(
        classified = classified.len(),
        counts = ?report.after_classify.attribution_counts,
        "classification complete"
    );

    Ok(RunOutput { classified, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Label;
    use crate::error::Error;
    use crate::record::EntityRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn places_stream_feeds_indirect_tier() {
        let batches = vec![SourceBatch::new(
            "wikidata",
            vec![EntityRecord::new("Q1").with_property("P19", &["Q1899"])],
        )];
        let places = SourceBatch::new(
            "places",
            vec![EntityRecord::new("Q1899").with_property("P17", &["Q212"])],
        );

        let output = run(batches, Some(places), &ClassifierConfig::default()).unwrap();

        assert_eq!(output.classified.len(), 1);
        assert_eq!(output.classified[0].ru_ua_attribution, Label::Ukraine);
        assert_eq!(output.report.pre_classify.unique_qids_merged, 1);
    }

    #[test]
    fn invalid_config_fails_before_merge() {
        let config = ClassifierConfig::default().with_max_depth(0);
        let err = run(Vec::new(), None, &config).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ZeroDepth)));
    }

    #[test]
    fn empty_tag_rejected() {
        let batches = vec![SourceBatch::new("  ", Vec::new())];
        assert!(matches!(
            validate_tags(&batches),
            Err(ConfigError::InvalidSource(_))
        ));
    }

    #[test]
    fn repeated_tag_is_idempotent() {
        let records = vec![
            EntityRecord::new("Q1").with_property("P27", &["Q159"]),
            EntityRecord::new("Q2").with_description("uk", "українське місто"),
        ];
        let config = ClassifierConfig::default();

        let once = run(vec![SourceBatch::new("a", records.clone())], None, &config).unwrap();
        let twice = run(
            vec![
                SourceBatch::new("a", records.clone()),
                SourceBatch::new("a", records),
            ],
            None,
            &config,
        )
        .unwrap();

        assert_eq!(once.classified, twice.classified);
        assert_eq!(twice.report.pre_classify.totals_by_source.len(), 1);
        assert_eq!(twice.report.pre_classify.totals_by_source["a"].unique_qids, 2);
        assert_eq!(twice.report.pre_classify.total_rows_loaded, 4);
    }

    #[test]
    fn empty_run_reports_zeroes() {
        let output = run(Vec::new(), None, &ClassifierConfig::default()).unwrap();
        assert!(output.classified.is_empty());
        assert_eq!(output.report.after_classify.attribution_counts.len(), 4);
    }
}
