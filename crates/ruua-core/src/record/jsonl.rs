//! JSON Lines codec for the record schema.
//!
//! One JSON object per line. Blank lines are skipped; lines that do not parse
//! as a record are reported as [`MalformedRecordError`] and skipped.

use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::warn;

use super::types::EntityRecord;
use crate::error::{MalformedRecordError, Result};

/// Records read from one tagged input stream
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    /// Source tag (also the merge priority position of the stream)
    pub tag: String,
    pub records: Vec<EntityRecord>,
    /// Lines that could not be decoded
    pub malformed: Vec<MalformedRecordError>,
}

impl SourceBatch {
    pub fn new(tag: impl Into<String>, records: Vec<EntityRecord>) -> Self {
        Self {
            tag: tag.into(),
            records,
            malformed: Vec::new(),
        }
    }

    /// Rows seen in the stream, decoded or not
    pub fn rows(&self) -> usize {
        self.records.len() + self.malformed.len()
    }
}

/// Read every record from a JSONL stream. Only I/O failures are errors.
pub fn read_records<R: BufRead>(reader: R, tag: &str) -> Result<SourceBatch> {
    let mut batch = SourceBatch {
        tag: tag.to_string(),
        ..SourceBatch::default()
    };

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<EntityRecord>(trimmed) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                let err = MalformedRecordError::new(tag, idx + 1, e.to_string());
                warn!("{}", err);
                batch.malformed.push(err);
            }
        }
    }

    Ok(batch)
}

/// Write rows as JSON Lines (UTF-8, no ASCII escaping)
pub fn write_records<'a, W, T, I>(mut writer: W, rows: I) -> Result<usize>
where
    W: Write,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut written = 0;
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
