//! Input/output plumbing for the `ruua-classify` binary
//!
//! Parses `[TAG=]PATH` source declarations, reads them as tagged JSONL
//! batches, and writes outputs through a temporary sibling file so an
//! interrupted run never leaves a partial file at the destination.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ruua_core::record::{read_records, SourceBatch};
use thiserror::Error;
use tracing::info;

/// CLI-level failures
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid input '{0}': expected [TAG=]PATH")]
    InvalidInput(String),

    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ruua_core::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: ruua_core::Error,
    },

    #[error(transparent)]
    Core(#[from] ruua_core::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// One `--in` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub tag: String,
    pub path: PathBuf,
}

impl FromStr for InputSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (tag, path) = match s.split_once('=') {
            Some((tag, path)) => (tag.trim().to_string(), PathBuf::from(path.trim())),
            None => {
                let path = PathBuf::from(s);
                let stem = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or_default()
                    .to_string();
                (stem, path)
            }
        };

        if tag.is_empty() || path.as_os_str().is_empty() {
            return Err(CliError::InvalidInput(s.to_string()));
        }
        Ok(Self { tag, path })
    }
}

/// Read one source file as a tagged batch
pub fn load_source(spec: &InputSpec) -> Result<SourceBatch> {
    let read = || -> ruua_core::Result<SourceBatch> {
        let file = File::open(&spec.path)?;
        read_records(BufReader::new(file), &spec.tag)
    };

    let batch = read().map_err(|source| CliError::Read {
        path: spec.path.clone(),
        source,
    })?;
    info!(
        tag = %spec.tag,
        path = %spec.path.display(),
        records = batch.records.len(),
        malformed = batch.malformed.len(),
        "loaded source"
    );
    Ok(batch)
}

/// `out.jsonl` -> `out.jsonl.tmp` in the same directory
pub fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write through a temporary sibling and rename into place. The temporary
/// file is removed if `write` fails.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> ruua_core::Result<()>,
{
    let tmp = temp_sibling(path);
    let result = (|| -> ruua_core::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&tmp)?);
        write(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    result.map_err(|source| {
        let _ = fs::remove_file(&tmp);
        CliError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_defaults_to_file_stem() {
        let spec: InputSpec = "data/wikidata_entities.jsonl".parse().unwrap();
        assert_eq!(spec.tag, "wikidata_entities");
        assert_eq!(spec.path, PathBuf::from("data/wikidata_entities.jsonl"));
    }

    #[test]
    fn explicit_tag() {
        let spec: InputSpec = "navbox=out/navbox.jsonl".parse().unwrap();
        assert_eq!(spec.tag, "navbox");
        assert_eq!(spec.path, PathBuf::from("out/navbox.jsonl"));
    }

    #[test]
    fn empty_parts_rejected() {
        assert!("=a.jsonl".parse::<InputSpec>().is_err());
        assert!("tag=".parse::<InputSpec>().is_err());
        assert!("".parse::<InputSpec>().is_err());
    }

    #[test]
    fn temp_sibling_keeps_directory() {
        assert_eq!(
            temp_sibling(Path::new("out/merged.jsonl")),
            PathBuf::from("out/merged.jsonl.tmp")
        );
    }
}
