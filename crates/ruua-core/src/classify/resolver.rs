//! Bounded located-in resolution
//!
//! Places and administrative units point at their parents through
//! "located in" (P131) and "country" (P17) relations. The resolver walks those
//! edges breadth-first from a starting key until it reaches a country node or
//! runs out of depth. Harvested data is not guaranteed acyclic, so every walk
//! carries its own visited set.

use std::collections::{HashMap, HashSet};

use super::tables::CountryTable;
use super::types::Bucket;
use crate::record::EntityRecord;

/// Properties that become resolver edges, in edge insertion order
pub const LOCATION_EDGE_PROPERTIES: [&str; 2] = ["P17", "P131"];

/// Directed child -> parent relation map. Edge order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    parents: HashMap<String, Vec<String>>,
    edge_count: usize,
}

impl LocationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build edges from each record's located-in and country references
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a EntityRecord>) -> Self {
        let mut graph = Self::new();
        graph.extend_from_records(records);
        graph
    }

    pub fn extend_from_records<'a>(&mut self, records: impl IntoIterator<Item = &'a EntityRecord>) {
        for record in records {
            for property in LOCATION_EDGE_PROPERTIES {
                for parent in record.referenced(property) {
                    self.add_edge(&record.qid, parent);
                }
            }
        }
    }

    /// Add an edge unless it already exists
    pub fn add_edge(&mut self, child: &str, parent: &str) {
        let parents = self.parents.entry(child.to_string()).or_default();
        if !parents.iter().any(|p| p == parent) {
            parents.push(parent.to_string());
            self.edge_count += 1;
        }
    }

    pub fn parents(&self, child: &str) -> &[String] {
        self.parents.get(child).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.parents.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

/// A country reached from a place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub bucket: Bucket,
    pub country: String,
    /// Edges walked, the final country edge included; 0 when the start key
    /// is itself a country
    pub depth: usize,
}

/// Resolves places to countries within `max_depth` hops
#[derive(Debug, Clone, Copy)]
pub struct IndirectResolver<'a> {
    graph: &'a LocationGraph,
    countries: &'a CountryTable,
    max_depth: usize,
}

impl<'a> IndirectResolver<'a> {
    pub fn new(graph: &'a LocationGraph, countries: &'a CountryTable, max_depth: usize) -> Self {
        Self {
            graph,
            countries,
            max_depth,
        }
    }

    /// First country reachable from `start`, nearest level first, ties broken
    /// by edge insertion order. `None` when nothing is found within depth.
    pub fn resolve(&self, start: &str) -> Option<Resolution> {
        if let Some(bucket) = self.countries.bucket_of(start) {
            return Some(Resolution {
                bucket,
                country: start.to_string(),
                depth: 0,
            });
        }

        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut frontier: Vec<&str> = vec![start];

        for depth in 1..=self.max_depth {
            let mut next = Vec::new();

            for node in frontier {
                for parent in self.graph.parents(node) {
                    if let Some(bucket) = self.countries.bucket_of(parent) {
                        return Some(Resolution {
                            bucket,
                            country: parent.clone(),
                            depth,
                        });
                    }
                    if visited.insert(parent.as_str()) {
                        next.push(parent.as_str());
                    }
                }
            }

            if next.is_empty() {
                return None;
            }
            frontier = next;
        }

        None
    }
}
