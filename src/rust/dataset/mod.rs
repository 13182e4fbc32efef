//! FAQ datasets on disk.
//!
//! A dataset is a CSV file whose header contains at least the `question` and
//! `intent` columns. Extra columns are tolerated and ignored. Every pipeline
//! stage reads and writes this format.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod collect;
pub mod ingest;
pub mod preprocess;
pub mod stats;

pub use collect::{collect, collect_if_missing, seed_records};
pub use ingest::{ingest, IngestSource};
pub use preprocess::{preprocess, PreprocessSummary};
pub use stats::DatasetStats;

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["question", "intent"];

/// One question labelled with the intent it expresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    pub intent: String,
}

impl FaqRecord {
    pub fn new(question: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            intent: intent.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Data file not found: {0}")]
    MissingFile(PathBuf),
    #[error("Invalid schema: missing required columns {missing:?}")]
    InvalidSchema { missing: Vec<String> },
    #[error("Dataset is empty: {0}")]
    Empty(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Download error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Download of {url} failed with status {status}")]
    FetchStatus { url: String, status: u16 },
}

/// Shape information returned by [`validate_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Reads every record of a dataset file.
pub fn read_records(path: &Path) -> Result<Vec<FaqRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.to_path_buf()));
    }
    let file = fs::File::open(path)?;
    let (_, records) = read_table(file)?;
    Ok(records)
}

/// Parses a dataset from any reader, checking the header first.
pub fn read_from<R: io::Read>(reader: R) -> Result<Vec<FaqRecord>, DatasetError> {
    read_table(reader).map(|(_, records)| records)
}

fn read_table<R: io::Read>(reader: R) -> Result<(Vec<String>, Vec<FaqRecord>), DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let position = |name: &str| columns.iter().position(|c| c == name);
    let (Some(q_idx), Some(i_idx)) = (position("question"), position("intent")) else {
        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(|name| name.to_string())
            .collect();
        return Err(DatasetError::InvalidSchema { missing });
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(FaqRecord {
            question: row.get(q_idx).unwrap_or_default().to_string(),
            intent: row.get(i_idx).unwrap_or_default().to_string(),
        });
    }
    Ok((columns, records))
}

/// Writes records with a `question,intent` header, creating parent
/// directories as needed.
pub fn write_records(path: &Path, records: &[FaqRecord]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for record in records {
        writer.write_record([record.question.as_str(), record.intent.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Smoke checks on a dataset file: it exists, has at least one row and
/// carries the required columns.
pub fn validate_file(path: &Path) -> Result<DatasetSummary, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.to_path_buf()));
    }
    let (columns, records) = read_table(fs::File::open(path)?)?;
    if records.is_empty() {
        return Err(DatasetError::Empty(path.display().to_string()));
    }
    Ok(DatasetSummary {
        rows: records.len(),
        columns,
    })
}
