//! Record merging across harvest sources.
//!
//! Each source contributes a stream of records; the same entity may appear in
//! several sources (and several times in one). Merging collapses them into one
//! record per identity key:
//!
//! - multi-valued fields (aliases, sitelinks, instance_of, raw_attrib_qids) union
//! - scalar fields (per-language label/description, `source`, unknown fields)
//!   keep the first non-empty value in source priority order
//! - `_sources` records every tag the key was seen under
//!
//! Source priority is ingestion order. Output is sorted by key so the merged
//! set never depends on hash or arrival order.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::MalformedRecordError;
use crate::record::{EntityRecord, SourceBatch};
use crate::report::SourceTotals;

/// Provenance collected while merging
#[derive(Debug, Clone, Default)]
pub struct MergeStats {
    /// Per-source totals, in priority order
    pub sources: Vec<SourceTotals>,
    /// Every row that was dropped, decode failures included
    pub malformed: Vec<MalformedRecordError>,
    /// Rows seen across all sources (malformed included)
    pub rows_loaded: usize,
}

/// Result of merging all sources
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// One record per identity key, sorted by key
    pub records: Vec<EntityRecord>,
    pub stats: MergeStats,
}

impl MergeOutcome {
    pub fn get(&self, qid: &str) -> Option<&EntityRecord> {
        self.records
            .binary_search_by(|r| r.qid.as_str().cmp(qid))
            .ok()
            .map(|idx| &self.records[idx])
    }
}

/// Incremental merger; ingest sources highest priority first.
#[derive(Debug, Default)]
pub struct RecordMerger {
    merged: BTreeMap<String, EntityRecord>,
    stats: MergeStats,
}

impl RecordMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one source. Records without an identity key are dropped and
    /// counted; they never abort the run.
    pub fn ingest(&mut self, batch: SourceBatch) {
        let rows = batch.rows();
        let tag = batch.tag;
        let stats = &mut self.stats;
        let slot = match stats.sources.iter().position(|s| s.tag == tag) {
            Some(idx) => idx,
            None => {
                stats.sources.push(SourceTotals::new(&tag));
                stats.sources.len() - 1
            }
        };

        stats.rows_loaded += rows;
        stats.sources[slot].rows += rows;
        stats.sources[slot].malformed += batch.malformed.len();
        stats.malformed.extend(batch.malformed);

        for (idx, mut record) in batch.records.into_iter().enumerate() {
            if !record.has_identity() {
                let err = MalformedRecordError::new(&tag, 0, format!("record #{} has no qid", idx + 1));
                warn!("{}", err);
                stats.sources[slot].malformed += 1;
                stats.malformed.push(err);
                continue;
            }

            stats.sources[slot].observe(&record);

            // Provenance is this run's tags only; `_sources` read back from a
            // classified file is stale
            record.sources.clear();
            record.sources.insert(tag.clone());

            match self.merged.get_mut(&record.qid) {
                Some(existing) => merge_into(existing, record),
                None => {
                    self.merged.insert(record.qid.clone(), record);
                }
            }
        }

        debug!(
            source = %tag,
            merged = self.merged.len(),
            "ingested source"
        );
    }

    pub fn finish(self) -> MergeOutcome {
        MergeOutcome {
            records: self.merged.into_values().collect(),
            stats: self.stats,
        }
    }
}

/// Merge all batches, treating slice order as source priority.
pub fn merge_sources(batches: impl IntoIterator<Item = SourceBatch>) -> MergeOutcome {
    let mut merger = RecordMerger::new();
    for batch in batches {
        merger.ingest(batch);
    }
    merger.finish()
}

/// Fold a lower-priority record into an existing one with the same key.
fn merge_into(target: &mut EntityRecord, incoming: EntityRecord) {
    for (lang, label) in incoming.labels {
        target.labels.entry(lang).or_insert(label);
    }
    for (lang, desc) in incoming.descriptions {
        target.descriptions.entry(lang).or_insert(desc);
    }
    for (lang, aliases) in incoming.aliases {
        target.aliases.entry(lang).or_default().extend(aliases);
    }
    target.sitelinks.extend(incoming.sitelinks);
    target.instance_of.extend(incoming.instance_of);
    for (property, keys) in incoming.raw_attrib_qids {
        target
            .raw_attrib_qids
            .entry(property)
            .or_default()
            .extend(keys);
    }
    if target.source.is_none() {
        target.source = incoming.source;
    }
    target.sources.extend(incoming.sources);
    for (key, value) in incoming.extra {
        let slot = target.extra.entry(key).or_insert(serde_json::Value::Null);
        if is_blank(slot) {
            *slot = value;
        }
    }
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
