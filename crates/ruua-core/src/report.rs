//! Corpus report
//!
//! A pure reduction over merge provenance and classified rows: per-source
//! totals, key-set overlap between sources, label distribution and which
//! sources each label's members came from. No evidence logic lives here.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{ClassifiedRecord, Label};
use crate::merge::MergeStats;
use crate::record::{EntityRecord, LANGUAGES};

/// Per-source ingestion totals. Unique-key statistics count each key once,
/// using the first record seen for it in that source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTotals {
    #[serde(skip)]
    pub tag: String,
    pub rows: usize,
    pub malformed: usize,
    pub unique_qids: usize,
    /// Records with a non-empty label or description, per language
    pub language_coverage: BTreeMap<String, usize>,
    pub category_hint_counts: BTreeMap<String, usize>,
    #[serde(skip)]
    keys: BTreeSet<String>,
}

impl SourceTotals {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            language_coverage: empty_coverage(),
            ..Self::default()
        }
    }

    /// Count a well-formed record seen in this source
    pub fn observe(&mut self, record: &EntityRecord) {
        if !self.keys.insert(record.qid.clone()) {
            return;
        }
        self.unique_qids += 1;
        for lang in LANGUAGES {
            if record.has_label_or_description(lang) {
                *self.language_coverage.entry(lang.to_string()).or_default() += 1;
            }
        }
        *self
            .category_hint_counts
            .entry(record.category_hint().to_string())
            .or_default() += 1;
    }

    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }
}

/// Key-set overlap between two sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairOverlap {
    pub a: String,
    pub b: String,
    pub a_unique: usize,
    pub b_unique: usize,
    pub a_only: usize,
    pub b_only: usize,
    pub intersection: usize,
    pub union: usize,
    pub jaccard: f64,
}

impl PairOverlap {
    pub fn between(a: &SourceTotals, b: &SourceTotals) -> Self {
        let intersection = a.keys.intersection(&b.keys).count();
        let union = a.keys.len() + b.keys.len() - intersection;

        Self {
            a: a.tag.clone(),
            b: b.tag.clone(),
            a_unique: a.keys.len(),
            b_unique: b.keys.len(),
            a_only: a.keys.len() - intersection,
            b_only: b.keys.len() - intersection,
            intersection,
            union,
            jaccard: jaccard(intersection, union),
        }
    }
}

/// |A ∩ B| / |A ∪ B|, defined as 0 for an empty union
pub fn jaccard(intersection: usize, union: usize) -> f64 {
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreClassify {
    pub total_rows_loaded: usize,
    pub unique_qids_merged: usize,
    pub malformed_dropped: usize,
    pub totals_by_source: BTreeMap<String, SourceTotals>,
    /// Keys present in every source
    pub intersection: usize,
    /// Keys present in any source
    pub union: usize,
    pub jaccard: f64,
    /// One entry per source pair, in priority order
    pub overlaps: Vec<PairOverlap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfterClassify {
    pub attribution_counts: BTreeMap<Label, usize>,
    /// label -> "tagA+tagB" source combination -> count
    pub composition: BTreeMap<Label, BTreeMap<String, usize>>,
}

/// Report consumed by the visualisation collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub pre_classify: PreClassify,
    pub after_classify: AfterClassify,
    /// Merged records with a non-empty label or description, per language
    pub language_coverage: BTreeMap<String, usize>,
    pub category_hint_counts: BTreeMap<String, usize>,
    /// First harvester page among merged records, in key order
    pub start_url: Option<String>,
}

impl CorpusReport {
    /// Reduce merge provenance and classified rows into the corpus report
    pub fn build(stats: &MergeStats, rows: &[ClassifiedRecord]) -> Self {
        let mut attribution_counts: BTreeMap<Label, usize> =
            Label::ALL.iter().map(|l| (*l, 0)).collect();
        let mut composition: BTreeMap<Label, BTreeMap<String, usize>> = BTreeMap::new();
        let mut language_coverage = empty_coverage();
        let mut category_hint_counts = BTreeMap::new();

        for row in rows {
            let label = row.ru_ua_attribution;
            *attribution_counts.entry(label).or_default() += 1;
            *composition
                .entry(label)
                .or_default()
                .entry(source_combination(&row.record))
                .or_default() += 1;

            for lang in LANGUAGES {
                if row.record.has_label_or_description(lang) {
                    *language_coverage.entry(lang.to_string()).or_default() += 1;
                }
            }
            *category_hint_counts
                .entry(row.record.category_hint().to_string())
                .or_default() += 1;
        }

        let start_url = rows.iter().find_map(|row| {
            row.record
                .source
                .as_ref()
                .and_then(|s| s.page.as_deref())
                .filter(|page| !page.is_empty())
                .map(str::to_string)
        });

        let (intersection, union) = all_source_overlap(&stats.sources);

        Self {
            pre_classify: PreClassify {
                total_rows_loaded: stats.rows_loaded,
                unique_qids_merged: rows.len(),
                malformed_dropped: stats.malformed.len(),
                totals_by_source: stats
                    .sources
                    .iter()
                    .map(|s| (s.tag.clone(), s.clone()))
                    .collect(),
                intersection,
                union,
                jaccard: jaccard(intersection, union),
                overlaps: pair_overlaps(&stats.sources),
            },
            after_classify: AfterClassify {
                attribution_counts,
                composition,
            },
            language_coverage,
            category_hint_counts,
            start_url,
        }
    }
}

/// Overlap for every unordered source pair, in priority order
pub fn pair_overlaps(sources: &[SourceTotals]) -> Vec<PairOverlap> {
    let mut overlaps = Vec::new();
    for (i, a) in sources.iter().enumerate() {
        for b in &sources[i + 1..] {
            overlaps.push(PairOverlap::between(a, b));
        }
    }
    overlaps
}

/// (keys in every source, keys in any source)
fn all_source_overlap(sources: &[SourceTotals]) -> (usize, usize) {
    let Some((first, rest)) = sources.split_first() else {
        return (0, 0);
    };

    let union: BTreeSet<&String> = sources.iter().flat_map(|s| s.keys.iter()).collect();
    let intersection = first
        .keys
        .iter()
        .filter(|k| rest.iter().all(|s| s.keys.contains(*k)))
        .count();

    (intersection, union.len())
}

fn source_combination(record: &EntityRecord) -> String {
    if record.sources.is_empty() {
        return "unknown_source".to_string();
    }
    record
        .sources
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("+")
}

fn empty_coverage() -> BTreeMap<String, usize> {
    LANGUAGES.iter().map(|l| (l.to_string(), 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{AttributionResult, PolicySnapshot, ScoreVector};
    use crate::merge::merge_sources;
    use crate::record::{SourceBatch, SourceInfo};
    use pretty_assertions::assert_eq;

    fn classified(record: EntityRecord, label: Label) -> ClassifiedRecord {
        let result = AttributionResult {
            qid: record.qid.clone(),
            label,
            scores: ScoreVector::default(),
            hits: Vec::new(),
        };
        ClassifiedRecord::new(
            record,
            result,
            PolicySnapshot {
                other_min_score: 3,
                other_requires_grounded_hit: true,
            },
        )
    }

    #[test]
    fn jaccard_of_empty_union_is_zero() {
        assert_eq!(jaccard(0, 0), 0.0);
        assert_eq!(jaccard(2, 4), 0.5);
    }

    #[test]
    fn two_source_overlap() {
        let outcome = merge_sources(vec![
            SourceBatch::new(
                "wikidata",
                vec![EntityRecord::new("Q1"), EntityRecord::new("Q2"), EntityRecord::new("Q3")],
            ),
            SourceBatch::new("navbox", vec![EntityRecord::new("Q2"), EntityRecord::new("Q4")]),
        ]);

        let overlaps = pair_overlaps(&outcome.stats.sources);

        assert_eq!(overlaps.len(), 1);
        let o = &overlaps[0];
        assert_eq!((o.a.as_str(), o.b.as_str()), ("wikidata", "navbox"));
        assert_eq!(o.intersection, 1);
        assert_eq!(o.union, 4);
        assert_eq!(o.a_only, 2);
        assert_eq!(o.b_only, 1);
        assert_eq!(o.jaccard, 0.25);
    }

    #[test]
    fn identical_sources_have_jaccard_one() {
        let records = vec![EntityRecord::new("Q1"), EntityRecord::new("Q2")];
        let outcome = merge_sources(vec![
            SourceBatch::new("a", records.clone()),
            SourceBatch::new("b", records),
        ]);
        let overlaps = pair_overlaps(&outcome.stats.sources);
        assert_eq!(overlaps[0].jaccard, 1.0);
    }

    #[test]
    fn report_counts_labels_and_composition() {
        let outcome = merge_sources(vec![
            SourceBatch::new(
                "wikidata",
                vec![
                    EntityRecord::new("Q1").with_label("en", "One").with_hint("people"),
                    EntityRecord::new("Q2").with_label("uk", "Два"),
                ],
            ),
            SourceBatch::new(
                "navbox",
                vec![EntityRecord::new("Q2"), EntityRecord::new("Q3").with_description("ru", "три")],
            ),
        ]);
        let labels = [Label::Russian, Label::Mixed, Label::Mixed];
        let rows: Vec<_> = outcome
            .records
            .iter()
            .cloned()
            .zip(labels)
            .map(|(r, l)| classified(r, l))
            .collect();

        let report = CorpusReport::build(&outcome.stats, &rows);

        assert_eq!(report.pre_classify.total_rows_loaded, 4);
        assert_eq!(report.pre_classify.unique_qids_merged, 3);
        assert_eq!(report.pre_classify.intersection, 1);
        assert_eq!(report.pre_classify.union, 3);
        assert_eq!(report.after_classify.attribution_counts[&Label::Russian], 1);
        assert_eq!(report.after_classify.attribution_counts[&Label::Mixed], 2);
        assert_eq!(report.after_classify.attribution_counts[&Label::Other], 0);
        assert_eq!(
            report.after_classify.composition[&Label::Mixed]["navbox+wikidata"],
            1
        );
        assert_eq!(report.after_classify.composition[&Label::Mixed]["navbox"], 1);
        assert_eq!(report.language_coverage["en"], 1);
        assert_eq!(report.language_coverage["uk"], 1);
        assert_eq!(report.language_coverage["ru"], 1);
        assert_eq!(report.category_hint_counts["people"], 1);
        assert_eq!(report.category_hint_counts["unknown"], 2);

        let wikidata = &report.pre_classify.totals_by_source["wikidata"];
        assert_eq!(wikidata.unique_qids, 2);
        assert_eq!(wikidata.language_coverage["en"], 1);
    }

    #[test]
    fn report_serializes_with_label_keys() {
        let report = CorpusReport::build(&MergeStats::default(), &[]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["after_classify"]["attribution_counts"]["Russian"], 0);
        assert_eq!(value["after_classify"]["attribution_counts"]["mixed"], 0);
        assert_eq!(value["pre_classify"]["jaccard"], 0.0);
        assert!(value["start_url"].is_null());
    }

    #[test]
    fn start_url_is_first_page_in_key_order() {
        let with_page = |qid: &str, page: &str| {
            let mut record = EntityRecord::new(qid);
            record.source = Some(SourceInfo {
                page: Some(page.to_string()),
                ..SourceInfo::default()
            });
            record
        };
        let outcome = merge_sources(vec![SourceBatch::new(
            "navbox",
            vec![
                with_page("Q9", "https://en.wikipedia.org/wiki/Template:Ukraine"),
                EntityRecord::new("Q1"),
                with_page("Q5", "https://en.wikipedia.org/wiki/Template:Russia"),
            ],
        )]);
        let rows: Vec<_> = outcome
            .records
            .iter()
            .cloned()
            .map(|r| classified(r, Label::Mixed))
            .collect();

        let report = CorpusReport::build(&outcome.stats, &rows);

        assert_eq!(
            report.start_url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Template:Russia")
        );
    }
}
