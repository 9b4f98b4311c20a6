//! Entity record type definitions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::de;

/// Category hint reported when a record carries none
pub const UNKNOWN_HINT: &str = "unknown";

/// Languages the inventory is harvested in, in scan order
pub const LANGUAGES: [&str; 3] = ["en", "ru", "uk"];

/// Harvester descriptor attached to each raw record
/// (e.g. `{"type": "wikidata_sparql", "page": "...", "hint": "people"}`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    /// Coarse category the harvester filed the entity under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SourceInfo {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.page.is_none() && self.hint.is_none() && self.extra.is_empty()
    }
}

/// One entity in the unified harvest schema.
///
/// Language maps drop `null` and empty values on read, so "present" always
/// means "non-empty". Fields this crate does not interpret (`uri`,
/// `wiki_titles`, ...) survive in `extra` and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Stable external identity key (e.g. "Q7747")
    #[serde(default, deserialize_with = "de::qid")]
    pub qid: String,

    #[serde(default, deserialize_with = "de::lang_text")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "de::lang_text")]
    pub descriptions: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "de::lang_sets")]
    pub aliases: BTreeMap<String, BTreeSet<String>>,

    #[serde(default, deserialize_with = "de::sitelinks")]
    pub sitelinks: BTreeSet<String>,

    /// Typed-category references (P31 values)
    #[serde(default, deserialize_with = "de::key_set")]
    pub instance_of: BTreeSet<String>,

    /// Attribution-relevant property id -> referenced entity keys
    #[serde(default, deserialize_with = "de::property_sets")]
    pub raw_attrib_qids: BTreeMap<String, BTreeSet<String>>,

    #[serde(default, deserialize_with = "de::source", skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,

    /// Source tags this record was merged from
    #[serde(rename = "_sources", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sources: BTreeSet<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EntityRecord {
    pub fn new(qid: impl Into<String>) -> Self {
        Self {
            qid: qid.into(),
            ..Self::default()
        }
    }

    /// Whether the identity key is usable for merging
    pub fn has_identity(&self) -> bool {
        !self.qid.trim().is_empty()
    }

    /// Referenced keys under a property, in set order
    pub fn referenced(&self, property: &str) -> impl Iterator<Item = &str> {
        self.raw_attrib_qids
            .get(property)
            .into_iter()
            .flat_map(|keys| keys.iter().map(String::as_str))
    }

    pub fn has_label_or_description(&self, lang: &str) -> bool {
        self.labels.contains_key(lang) || self.descriptions.contains_key(lang)
    }

    /// Harvester category hint, or [`UNKNOWN_HINT`]
    pub fn category_hint(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.hint.as_deref())
            .filter(|h| !h.is_empty())
            .unwrap_or(UNKNOWN_HINT)
    }

    /// Label, description and aliases of one language joined into a single
    /// searchable string. Empty when the language has no text.
    pub fn text_for(&self, lang: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(label) = self.labels.get(lang) {
            parts.push(label);
        }
        if let Some(desc) = self.descriptions.get(lang) {
            parts.push(desc);
        }
        if let Some(aliases) = self.aliases.get(lang) {
            parts.extend(aliases.iter().map(String::as_str));
        }
        parts.join(" | ")
    }

    pub fn with_label(mut self, lang: &str, label: &str) -> Self {
        self.labels.insert(lang.to_string(), label.to_string());
        self
    }

    pub fn with_description(mut self, lang: &str, description: &str) -> Self {
        self.descriptions
            .insert(lang.to_string(), description.to_string());
        self
    }

    pub fn with_alias(mut self, lang: &str, alias: &str) -> Self {
        self.aliases
            .entry(lang.to_string())
            .or_default()
            .insert(alias.to_string());
        self
    }

    pub fn with_property(mut self, property: &str, keys: &[&str]) -> Self {
        self.raw_attrib_qids
            .entry(property.to_string())
            .or_default()
            .extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.source.get_or_insert_with(SourceInfo::default).hint = Some(hint.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn harvester_line_is_read_leniently() {
        let line = json!({
            "qid": "Q7747",
            "uri": "http://www.wikidata.org/entity/Q7747",
            "source": {"type": "wikidata_sparql", "page": "https://query.wikidata.org/sparql", "hint": "people"},
            "labels": {"en": "Vladimir Putin", "uk": null, "ru": ""},
            "descriptions": {"en": "President of Russia"},
            "aliases": {"en": ["Putin"], "uk": null},
            "sitelinks": {"enwiki": "https://en.wikipedia.org/wiki/Vladimir_Putin", "ukwiki": null},
            "instance_of": ["Q5"],
            "raw_attrib_qids": {"P27": ["Q159", "Q15180"], "P19": []}
        });

        let record: EntityRecord = serde_json::from_value(line).unwrap();

        assert_eq!(record.qid, "Q7747");
        assert_eq!(record.labels.len(), 1);
        assert!(!record.labels.contains_key("ru"));
        assert_eq!(record.aliases["en"].len(), 1);
        assert!(!record.aliases.contains_key("uk"));
        assert_eq!(record.sitelinks.len(), 1);
        assert_eq!(record.category_hint(), "people");
        assert_eq!(record.referenced("P27").count(), 2);
        assert!(record.extra.contains_key("uri"));
    }

    #[test]
    fn sitelinks_accept_a_plain_list() {
        let record: EntityRecord =
            serde_json::from_value(json!({"qid": "Q1", "sitelinks": ["enwiki", null]})).unwrap();
        assert_eq!(record.sitelinks.len(), 1);
    }

    #[test]
    fn unknown_fields_are_written_back() {
        let record: EntityRecord =
            serde_json::from_value(json!({"qid": "Q1", "wiki_titles": {"en": "X"}})).unwrap();
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["wiki_titles"]["en"], "X");
    }

    #[test]
    fn missing_qid_is_not_an_identity() {
        let record: EntityRecord = serde_json::from_value(json!({"qid": null})).unwrap();
        assert!(!record.has_identity());
        let record: EntityRecord = serde_json::from_value(json!({"labels": {}})).unwrap();
        assert!(!record.has_identity());
    }

    #[test]
    fn text_for_joins_label_description_and_aliases() {
        let record = EntityRecord::new("Q1")
            .with_label("en", "Wagner Group")
            .with_description("en", "Russian private military company")
            .with_alias("en", "PMC Wagner");
        assert_eq!(
            record.text_for("en"),
            "Wagner Group | Russian private military company | PMC Wagner"
        );
        assert_eq!(record.text_for("uk"), "");
    }

    #[test]
    fn category_hint_defaults_to_unknown() {
        assert_eq!(EntityRecord::new("Q1").category_hint(), UNKNOWN_HINT);
    }
}
