//! Reference tables: country nodes, attribution properties, text patterns.
//!
//! Built once before classification starts and shared read-only by every
//! worker. Nothing here is global state; callers pass [`ReferenceTables`]
//! explicitly.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

use super::types::Bucket;
use crate::config::ClassifierConfig;
use crate::error::ConfigError;

/// Russia as a country node
pub const RU_COUNTRY: &str = "Q159";
/// Ukraine as a country node
pub const UA_COUNTRY: &str = "Q212";

/// Third-country anchors (USA, China, Germany, UK, France, Poland, Belarus, EU)
pub const OTHER_COUNTRIES: [&str; 8] = [
    "Q30", "Q148", "Q183", "Q145", "Q142", "Q36", "Q184", "Q458",
];

/// A property that carries attribution evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributionProperty {
    pub id: &'static str,
    pub name: &'static str,
    /// Values are places/admin units worth resolving through the location graph
    pub location_like: bool,
}

/// Attribution properties in evaluation order
pub const ATTRIBUTION_PROPERTIES: [AttributionProperty; 9] = [
    AttributionProperty { id: "P27", name: "citizenship", location_like: false },
    AttributionProperty { id: "P17", name: "country", location_like: false },
    AttributionProperty { id: "P495", name: "origin", location_like: false },
    AttributionProperty { id: "P159", name: "hq", location_like: true },
    AttributionProperty { id: "P131", name: "located_in_admin", location_like: true },
    AttributionProperty { id: "P276", name: "location", location_like: true },
    AttributionProperty { id: "P19", name: "place_of_birth", location_like: true },
    AttributionProperty { id: "P740", name: "location_of_formation", location_like: true },
    AttributionProperty { id: "P551", name: "residence", location_like: true },
];

/// Key -> bucket for every node that counts as a country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryTable {
    nodes: BTreeMap<String, Bucket>,
}

impl Default for CountryTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl CountryTable {
    /// RU, UA and the built-in third-country anchors
    pub fn reference() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(RU_COUNTRY.to_string(), Bucket::Ru);
        nodes.insert(UA_COUNTRY.to_string(), Bucket::Ua);
        for qid in OTHER_COUNTRIES {
            nodes.insert(qid.to_string(), Bucket::Other);
        }
        Self { nodes }
    }

    /// Register an extra third-country node. Reference countries keep their bucket.
    pub fn with_other(mut self, qid: &str) -> Self {
        self.nodes
            .entry(qid.trim().to_string())
            .or_insert(Bucket::Other);
        self
    }

    pub fn bucket_of(&self, qid: &str) -> Option<Bucket> {
        self.nodes.get(qid).copied()
    }

    pub fn is_country(&self, qid: &str) -> bool {
        self.nodes.contains_key(qid)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One compiled text rule
#[derive(Debug, Clone)]
pub struct TextPattern {
    pub lang: &'static str,
    pub bucket: Bucket,
    /// Third-country family ("American", "Chinese"); `None` for RU/UA
    pub family: Option<&'static str>,
    pub source: &'static str,
    pub regex: Regex,
}

impl TextPattern {
    pub fn rule_id(&self) -> String {
        match self.family {
            Some(family) => format!("text:{}:{}:{}:{}", self.lang, self.bucket, family, self.source),
            None => format!("text:{}:{}:{}", self.lang, self.bucket, self.source),
        }
    }
}

type PatternSpec = (&'static str, Bucket, Option<&'static str>, &'static str);

/// (lang, bucket, family, pattern) in evaluation order. RU/UA rules for a
/// language come before any third-country rule for that language.
const PATTERN_SPECS: &[PatternSpec] = &[
    ("en", Bucket::Ru, None, r"\brussian\b"),
    ("en", Bucket::Ru, None, r"\brussia\b"),
    ("en", Bucket::Ru, None, r"\brf\b"),
    ("en", Bucket::Ru, None, r"\brussian[- ]backed\b"),
    ("en", Bucket::Ua, None, r"\bukrain"),
    ("en", Bucket::Ua, None, r"\bukraine\b"),
    ("en", Bucket::Other, Some("American"), r"\bamerican\b"),
    ("en", Bucket::Other, Some("American"), r"\bu\.?s\.?\b"),
    ("en", Bucket::Other, Some("American"), r"\bunited states\b"),
    ("en", Bucket::Other, Some("Chinese"), r"\bchinese\b"),
    ("en", Bucket::Other, Some("Chinese"), r"\bchina\b"),
    ("en", Bucket::Other, Some("Chinese"), r"\bprc\b"),
    ("ru", Bucket::Ru, None, r"\bросси"),
    ("ru", Bucket::Ru, None, r"\bрусск"),
    ("ru", Bucket::Ru, None, r"\bрф\b"),
    ("ru", Bucket::Ua, None, r"\bукраин"),
    ("ru", Bucket::Ua, None, r"\bукраинец"),
    ("ru", Bucket::Ua, None, r"\bукраинка"),
    ("ru", Bucket::Other, Some("American"), r"\bамерикан"),
    ("ru", Bucket::Other, Some("Chinese"), r"\bкита"),
    ("ru", Bucket::Other, Some("Chinese"), r"\bкнр\b"),
    ("uk", Bucket::Ru, None, r"\bросі"),
    ("uk", Bucket::Ru, None, r"\bросійськ"),
    ("uk", Bucket::Ru, None, r"\bрф\b"),
    ("uk", Bucket::Ua, None, r"\bукраїн"),
    ("uk", Bucket::Ua, None, r"\bукраїнець"),
    ("uk", Bucket::Ua, None, r"\bукраїнка"),
    ("uk", Bucket::Other, Some("American"), r"\bамерикан"),
    ("uk", Bucket::Other, Some("Chinese"), r"\bкита"),
    ("uk", Bucket::Other, Some("Chinese"), r"\bкнр\b"),
];

/// Ordered text rules for all languages
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<TextPattern>,
}

impl PatternSet {
    /// Compile the built-in rule list
    pub fn reference() -> Result<Self, ConfigError> {
        let patterns = PATTERN_SPECS
            .iter()
            .map(|&(lang, bucket, family, source)| {
                let regex = RegexBuilder::new(source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: source.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(TextPattern {
                    lang,
                    bucket,
                    family,
                    source,
                    regex,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { patterns })
    }

    /// Rules for one language, in evaluation order
    pub fn for_lang<'a>(&'a self, lang: &'a str) -> impl Iterator<Item = &'a TextPattern> + 'a {
        self.patterns.iter().filter(move |p| p.lang == lang)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// All read-only lookup data a classification run needs
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub countries: CountryTable,
    pub properties: &'static [AttributionProperty],
    pub patterns: PatternSet,
}

impl ReferenceTables {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let countries = config
            .extra_other_countries
            .iter()
            .fold(CountryTable::reference(), |table, qid| table.with_other(qid));

        Ok(Self {
            countries,
            properties: &ATTRIBUTION_PROPERTIES,
            patterns: PatternSet::reference()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_countries() {
        let table = CountryTable::reference();
        assert_eq!(table.bucket_of("Q159"), Some(Bucket::Ru));
        assert_eq!(table.bucket_of("Q212"), Some(Bucket::Ua));
        assert_eq!(table.bucket_of("Q30"), Some(Bucket::Other));
        assert_eq!(table.bucket_of("Q1899"), None);
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn extra_other_cannot_override_reference() {
        let table = CountryTable::reference().with_other("Q159").with_other("Q40");
        assert_eq!(table.bucket_of("Q159"), Some(Bucket::Ru));
        assert_eq!(table.bucket_of("Q40"), Some(Bucket::Other));
    }

    #[test]
    fn all_patterns_compile() {
        let set = PatternSet::reference().unwrap();
        assert_eq!(set.len(), PATTERN_SPECS.len());
    }

    #[test]
    fn reference_buckets_precede_other_per_language() {
        let set = PatternSet::reference().unwrap();
        for lang in ["en", "ru", "uk"] {
            let buckets: Vec<_> = set.for_lang(lang).map(|p| p.bucket).collect();
            let first_other = buckets.iter().position(|b| *b == Bucket::Other).unwrap();
            assert!(buckets[first_other..].iter().all(|b| *b == Bucket::Other));
        }
    }

    #[test]
    fn cyrillic_word_boundaries() {
        let set = PatternSet::reference().unwrap();
        let rf = set
            .for_lang("ru")
            .find(|p| p.source == r"\bрф\b")
            .unwrap();
        assert!(rf.regex.is_match("вооружённые силы рф"));
        assert!(!rf.regex.is_match("рфкс"));
    }

    #[test]
    fn rule_ids_name_family() {
        let set = PatternSet::reference().unwrap();
        let ids: Vec<_> = set.for_lang("en").map(|p| p.rule_id()).collect();
        assert_eq!(ids[0], r"text:en:RU:\brussian\b");
        assert!(ids.contains(&r"text:en:OTHER:Chinese:\bprc\b".to_string()));
    }

    #[test]
    fn extra_countries_from_config() {
        let config = ClassifierConfig::default().with_other_country("Q17");
        let tables = ReferenceTables::new(&config).unwrap();
        assert!(tables.countries.is_country("Q17"));
        assert_eq!(tables.properties.len(), 9);
    }
}
