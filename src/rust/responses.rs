use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

/// Answer given when the predicted intent has no canned response.
pub const FALLBACK_ANSWER: &str = "Sorry, I don't understand";

const DEFAULT_RESPONSES: &[(&str, &str)] = &[
    ("courses", "We offer B.Tech MBA MCA"),
    ("admission", "Admission is based on entrance exam"),
    ("fees", "Fee is 1.2 LPA"),
    ("hostel", "Yes hostel is available"),
    ("timings", "College runs from 9AM to 4PM"),
    ("placements", "Yes 95 percent placement"),
];

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("Response table not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid response table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Canned answer per intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseTable {
    answers: HashMap<String, String>,
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self {
            answers: DEFAULT_RESPONSES
                .iter()
                .map(|(intent, answer)| (intent.to_string(), answer.to_string()))
                .collect(),
        }
    }
}

impl ResponseTable {
    /// Loads a JSON object of `intent -> answer` pairs. Intents missing from
    /// the file keep their default answer.
    pub fn from_file(path: &Path) -> Result<Self, ResponseError> {
        if !path.exists() {
            return Err(ResponseError::NotFound(path.to_path_buf()));
        }
        let overrides: HashMap<String, String> = serde_json::from_str(&fs::read_to_string(path)?)?;
        info!("Loaded {} responses from {:?}", overrides.len(), path);

        let mut table = Self::default();
        table.answers.extend(overrides);
        Ok(table)
    }

    /// The canned answer for `intent`, or [`FALLBACK_ANSWER`].
    pub fn answer(&self, intent: &str) -> &str {
        self.answers
            .get(intent)
            .map(String::as_str)
            .unwrap_or(FALLBACK_ANSWER)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}
