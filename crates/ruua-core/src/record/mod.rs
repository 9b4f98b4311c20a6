//! Unified entity record schema
//!
//! Both harvesters (Wikidata SPARQL and Wikipedia navboxes) emit the same
//! JSONL shape. This module defines the typed record, the lenient readers
//! that normalise harvester quirks, and the line-oriented codec.

mod de;
pub mod jsonl;
mod types;

pub use jsonl::{read_records, write_records, SourceBatch};
pub use types::{EntityRecord, SourceInfo, LANGUAGES, UNKNOWN_HINT};
