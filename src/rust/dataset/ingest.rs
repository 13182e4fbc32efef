use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

use super::{read_from, write_records, DatasetError, FaqRecord};

/// Upper bound on a whole URL fetch, body included.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where raw FAQ data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestSource {
    Path(PathBuf),
    Url(String),
}

impl IngestSource {
    /// Anything starting with `http://` or `https://` is fetched, everything
    /// else is a local path.
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::Path(PathBuf::from(source))
        }
    }
}

impl fmt::Display for IngestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Loads raw data from `source`, checks its schema and stores it at `dest`.
///
/// Nothing is written unless the source parses and has at least one row.
pub async fn ingest(source: &IngestSource, dest: &Path) -> Result<usize, DatasetError> {
    info!("Ingesting raw data from {}", source);
    let records = load_source(source).await?;
    if records.is_empty() {
        return Err(DatasetError::Empty(source.to_string()));
    }

    let same_file = match source {
        IngestSource::Path(path) => same_path(path, dest),
        IngestSource::Url(_) => false,
    };
    if !same_file {
        write_records(dest, &records)?;
    }

    info!("Data ingestion successful ({} rows -> {:?})", records.len(), dest);
    Ok(records.len())
}

async fn load_source(source: &IngestSource) -> Result<Vec<FaqRecord>, DatasetError> {
    match source {
        IngestSource::Path(path) => {
            if !path.exists() {
                return Err(DatasetError::MissingFile(path.clone()));
            }
            read_from(fs::File::open(path)?)
        }
        IngestSource::Url(url) => fetch(url, FETCH_TIMEOUT).await,
    }
}

async fn fetch(url: &str, timeout: Duration) -> Result<Vec<FaqRecord>, DatasetError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;
    info!("Download response status: {}", response.status());
    if !response.status().is_success() {
        return Err(DatasetError::FetchStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    let bytes = response.bytes().await?;
    info!("Downloaded {} bytes", bytes.len());
    read_from(&bytes[..])
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
