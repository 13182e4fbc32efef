use std::path::Path;

use log::info;

use super::{read_records, write_records, DatasetError, FaqRecord};

/// Row counts from one preprocessing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessSummary {
    pub read: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Normalizes one record, or returns `None` when a field is blank.
pub fn clean_record(record: &FaqRecord) -> Option<FaqRecord> {
    let question = record.question.trim().to_lowercase();
    let intent = record.intent.trim();
    if question.is_empty() || intent.is_empty() {
        return None;
    }
    Some(FaqRecord::new(question, intent))
}

/// Cleans a batch of records. Order is preserved.
pub fn clean_records(records: &[FaqRecord]) -> Vec<FaqRecord> {
    records.iter().filter_map(clean_record).collect()
}

/// Reads the raw dataset at `src`, lowercases and trims the questions, drops
/// incomplete rows and writes the result to `dest`.
pub fn preprocess(src: &Path, dest: &Path) -> Result<PreprocessSummary, DatasetError> {
    let raw = read_records(src)?;
    let cleaned = clean_records(&raw);
    if cleaned.is_empty() {
        return Err(DatasetError::Empty(src.display().to_string()));
    }

    write_records(dest, &cleaned)?;
    let summary = PreprocessSummary {
        read: raw.len(),
        kept: cleaned.len(),
        dropped: raw.len() - cleaned.len(),
    };
    info!(
        "{:?} created ({} rows kept, {} dropped)",
        dest, summary.kept, summary.dropped
    );
    Ok(summary)
}
