//! Lenient field readers for harvester output.
//!
//! Harvesters emit `null` for missing languages, empty strings for absent
//! labels, and either a list or a `{site: title}` map for sitelinks. These
//! helpers normalise all of that into plain sets and maps.

use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};

use super::types::SourceInfo;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub fn qid<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()).unwrap_or_default())
}

pub fn lang_text<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(lang, text)| non_empty(text).map(|t| (lang, t)))
        .collect())
}

pub fn lang_sets<'de, D>(deserializer: D) -> Result<BTreeMap<String, BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<Vec<Option<String>>>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(lang, values)| {
            let set: BTreeSet<String> = values
                .unwrap_or_default()
                .into_iter()
                .filter_map(non_empty)
                .collect();
            (!set.is_empty()).then_some((lang, set))
        })
        .collect())
}

pub fn key_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(non_empty)
        .collect())
}

pub fn property_sets<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    // Same shape as aliases: key -> list of optional strings
    lang_sets(deserializer)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSitelinks {
    List(Vec<Option<String>>),
    Map(BTreeMap<String, Option<String>>),
}

pub fn sitelinks<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Option::<RawSitelinks>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawSitelinks::List(list)) => list,
        Some(RawSitelinks::Map(map)) => map.into_values().collect(),
    };
    Ok(values.into_iter().filter_map(non_empty).collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Tag(String),
    Info(SourceInfo),
}

pub fn source<'de, D>(deserializer: D) -> Result<Option<SourceInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let info = match Option::<RawSource>::deserialize(deserializer)? {
        None => None,
        Some(RawSource::Tag(kind)) => Some(SourceInfo {
            kind: non_empty(Some(kind)),
            ..SourceInfo::default()
        }),
        Some(RawSource::Info(info)) => Some(info),
    };
    Ok(info.filter(|i| !i.is_empty()))
}
