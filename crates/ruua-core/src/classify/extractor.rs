//! Evidence extraction
//!
//! Three independent tiers run in fixed order and all of their hits are kept:
//!
//! 1. structured direct: an attribution property points straight at a country
//! 2. structured indirect: a location-like property points at a place that
//!    resolves to a country through the location graph
//! 3. text: per-language regex rules over labels, descriptions and aliases
//!
//! The extractor never mutates the record. Hits come back ordered by tier,
//! then discovery order, so audit output is reproducible.

use super::resolver::{IndirectResolver, LocationGraph};
use super::tables::ReferenceTables;
use super::types::{Bucket, EvidenceItem, EvidenceMatch, Tier};
use crate::config::ClassifierConfig;
use crate::record::{EntityRecord, LANGUAGES};

pub struct EvidenceExtractor<'a> {
    tables: &'a ReferenceTables,
    resolver: IndirectResolver<'a>,
    config: &'a ClassifierConfig,
}

impl<'a> EvidenceExtractor<'a> {
    pub fn new(
        tables: &'a ReferenceTables,
        graph: &'a LocationGraph,
        config: &'a ClassifierConfig,
    ) -> Self {
        Self {
            tables,
            resolver: IndirectResolver::new(graph, &tables.countries, config.max_depth),
            config,
        }
    }

    /// All evidence for one record
    pub fn extract(&self, record: &EntityRecord) -> Vec<EvidenceItem> {
        let mut hits = Vec::new();
        self.structured_direct(record, &mut hits);
        self.structured_indirect(record, &mut hits);
        self.text_fallback(record, &mut hits);
        hits
    }

    fn item(&self, tier: Tier, bucket: Bucket, rule_id: String, matched: EvidenceMatch) -> EvidenceItem {
        EvidenceItem {
            tier,
            bucket,
            rule_id,
            weight: self.config.weights.weight(tier),
            matched,
        }
    }

    fn structured_direct(&self, record: &EntityRecord, hits: &mut Vec<EvidenceItem>) {
        for property in self.tables.properties {
            for key in record.referenced(property.id) {
                let Some(bucket) = self.tables.countries.bucket_of(key) else {
                    continue;
                };
                hits.push(self.item(
                    Tier::Structured,
                    bucket,
                    format!("{}:direct:{}:{}", property.id, bucket, key),
                    EvidenceMatch::Property {
                        property: property.id.to_string(),
                        key: key.to_string(),
                        country: None,
                        depth: None,
                    },
                ));
            }
        }
    }

    fn structured_indirect(&self, record: &EntityRecord, hits: &mut Vec<EvidenceItem>) {
        for property in self.tables.properties.iter().filter(|p| p.location_like) {
            for key in record.referenced(property.id) {
                if self.tables.countries.is_country(key) || key == record.qid {
                    continue;
                }
                let Some(resolution) = self.resolver.resolve(key) else {
                    continue;
                };
                hits.push(self.item(
                    Tier::Indirect,
                    resolution.bucket,
                    format!(
                        "{}:place_country:{}:{}->{}",
                        property.id, resolution.bucket, key, resolution.country
                    ),
                    EvidenceMatch::Property {
                        property: property.id.to_string(),
                        key: key.to_string(),
                        country: Some(resolution.country),
                        depth: Some(resolution.depth),
                    },
                ));
            }
        }
    }

    fn text_fallback(&self, record: &EntityRecord, hits: &mut Vec<EvidenceItem>) {
        for lang in LANGUAGES {
            let text = record.text_for(lang);
            if text.is_empty() {
                continue;
            }
            for pattern in self.tables.patterns.for_lang(lang) {
                let Some(found) = pattern.regex.find(&text) else {
                    continue;
                };
                hits.push(self.item(
                    Tier::Text,
                    pattern.bucket,
                    pattern.rule_id(),
                    EvidenceMatch::Text {
                        lang: lang.to_string(),
                        span: found.as_str().to_string(),
                    },
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(record: &EntityRecord, graph: &LocationGraph) -> Vec<EvidenceItem> {
        let config = ClassifierConfig::default();
        let tables = ReferenceTables::new(&config).unwrap();
        EvidenceExtractor::new(&tables, graph, &config).extract(record)
    }

    #[test]
    fn citizenship_is_structured_ru() {
        let record = EntityRecord::new("Q1").with_property("P27", &["Q159"]);
        let hits = extract(&record, &LocationGraph::new());

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tier, Tier::Structured);
        assert_eq!(hits[0].bucket, Bucket::Ru);
        assert_eq!(hits[0].weight, 3);
        assert_eq!(hits[0].rule_id, "P27:direct:RU:Q159");
    }

    #[test]
    fn unknown_property_ignored() {
        let record = EntityRecord::new("Q1").with_property("P999", &["Q159"]);
        assert!(extract(&record, &LocationGraph::new()).is_empty());
    }

    #[test]
    fn place_of_birth_resolves_indirectly() {
        let mut graph = LocationGraph::new();
        graph.add_edge("Q1899", "Q212"); // Kyiv
        let record = EntityRecord::new("Q1").with_property("P19", &["Q1899"]);

        let hits = extract(&record, &graph);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tier, Tier::Indirect);
        assert_eq!(hits[0].bucket, Bucket::Ua);
        assert_eq!(hits[0].weight, 2);
        assert_eq!(hits[0].rule_id, "P19:place_country:UA:Q1899->Q212");
    }

    #[test]
    fn non_location_property_not_resolved() {
        let mut graph = LocationGraph::new();
        graph.add_edge("Q1899", "Q212");
        let record = EntityRecord::new("Q1").with_property("P27", &["Q1899"]);
        assert!(extract(&record, &graph).is_empty());
    }

    #[test]
    fn country_values_not_resolved_twice() {
        let mut graph = LocationGraph::new();
        graph.add_edge("Q30", "Q30");
        let record = EntityRecord::new("Q1").with_property("P131", &["Q30"]);
        let hits = extract(&record, &graph);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tier, Tier::Structured);
    }

    #[test]
    fn text_hits_per_language() {
        let record = EntityRecord::new("Q1")
            .with_label("en", "Wagner Group")
            .with_description("en", "Russian private military company")
            .with_label("uk", "ПВК Вагнера")
            .with_description("uk", "російська приватна військова компанія");

        let hits = extract(&record, &LocationGraph::new());

        assert!(hits.iter().all(|h| h.tier == Tier::Text));
        assert!(hits.iter().all(|h| h.bucket == Bucket::Ru));
        let langs: Vec<_> = hits
            .iter()
            .map(|h| match &h.matched {
                EvidenceMatch::Text { lang, .. } => lang.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(langs, vec!["en", "uk", "uk"]);
    }

    #[test]
    fn text_match_is_case_insensitive_and_records_span() {
        let record = EntityRecord::new("Q1").with_description("en", "UKRAINIAN politician");
        let hits = extract(&record, &LocationGraph::new());
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].matched,
            EvidenceMatch::Text {
                lang: "en".into(),
                span: "UKRAIN".into()
            }
        );
    }

    #[test]
    fn tiers_are_ordered() {
        let mut graph = LocationGraph::new();
        graph.add_edge("Q656", "Q159"); // Saint Petersburg
        let record = EntityRecord::new("Q1")
            .with_description("en", "American businessman")
            .with_property("P19", &["Q656"])
            .with_property("P27", &["Q30"]);

        let tiers: Vec<_> = extract(&record, &graph).iter().map(|h| h.tier).collect();
        assert_eq!(tiers, vec![Tier::Structured, Tier::Indirect, Tier::Text]);
    }

    #[test]
    fn self_reference_skipped() {
        let mut graph = LocationGraph::new();
        graph.add_edge("Q1", "Q212");
        let record = EntityRecord::new("Q1").with_property("P131", &["Q1"]);
        assert!(extract(&record, &graph).is_empty());
    }
}
