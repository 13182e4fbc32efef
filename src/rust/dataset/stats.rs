use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::{FaqRecord, REQUIRED_COLUMNS};

/// Shape and label balance of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    /// `(intent, count)` sorted by descending count, then label.
    pub intent_distribution: Vec<(String, usize)>,
}

impl DatasetStats {
    pub fn from_records(records: &[FaqRecord]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.intent.as_str()).or_insert(0) += 1;
        }
        let mut intent_distribution: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(intent, count)| (intent.to_string(), count))
            .collect();
        intent_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            rows: records.len(),
            columns: REQUIRED_COLUMNS.len(),
            intent_distribution,
        }
    }
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Shape: ({}, {})", self.rows, self.columns)?;
        writeln!(f)?;
        writeln!(f, "Intent Distribution:")?;
        let width = self
            .intent_distribution
            .iter()
            .map(|(intent, _)| intent.len())
            .max()
            .unwrap_or(0);
        for (intent, count) in &self.intent_distribution {
            writeln!(f, "{:<width$}  {}", intent, count, width = width)?;
        }
        Ok(())
    }
}
