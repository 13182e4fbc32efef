use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classifier::{Classifier, ClassifierError, LogisticRegression, TfidfVectorizer};
use crate::training::TrainingReport;

const VECTORIZER_FILE: &str = "vectorizer.json";
const MODEL_FILE: &str = "model.json";
const MANIFEST_FILE: &str = "manifest.json";
const REPORT_FILE: &str = "training_report.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("No trained artifacts in {0}; run `train` first")]
    NotTrained(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Hashes of the artifact pair, written after both files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub created_at: DateTime<Utc>,
    pub crate_version: String,
    pub vectorizer_hash: String,
    pub model_hash: String,
}

/// Directory holding the fitted vectorizer and model.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.dir.join(VECTORIZER_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE)
    }

    pub fn is_trained(&self) -> bool {
        let vectorizer_path = self.vectorizer_path();
        let model_path = self.model_path();
        let manifest_path = self.manifest_path();
        log::debug!("Checking for trained artifacts:");
        log::debug!("  Vectorizer path: {:?} (exists: {})", vectorizer_path, vectorizer_path.exists());
        log::debug!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        vectorizer_path.exists() && model_path.exists() && manifest_path.exists()
    }

    /// Writes both artifacts, then the manifest recording their hashes.
    pub fn save(&self, classifier: &Classifier) -> Result<Manifest, ArtifactError> {
        fs::create_dir_all(&self.dir)?;

        let vectorizer_bytes = serde_json::to_vec(classifier.vectorizer())?;
        let model_bytes = serde_json::to_vec(classifier.model())?;

        log::info!("Writing {} bytes to {:?}", vectorizer_bytes.len(), self.vectorizer_path());
        fs::write(self.vectorizer_path(), &vectorizer_bytes)?;
        log::info!("Writing {} bytes to {:?}", model_bytes.len(), self.model_path());
        fs::write(self.model_path(), &model_bytes)?;

        let manifest = Manifest {
            created_at: Utc::now(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            vectorizer_hash: sha256_hex(&vectorizer_bytes),
            model_hash: sha256_hex(&model_bytes),
        };
        fs::write(self.manifest_path(), serde_json::to_vec_pretty(&manifest)?)?;
        log::info!("Artifacts saved to {:?}", self.dir);
        Ok(manifest)
    }

    pub fn manifest(&self) -> Result<Manifest, ArtifactError> {
        if !self.manifest_path().exists() {
            return Err(ArtifactError::NotTrained(self.dir.clone()));
        }
        Ok(serde_json::from_slice(&fs::read(self.manifest_path())?)?)
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ArtifactError> {
        log::debug!("Verifying file: {:?}", path);
        let bytes = fs::read(path)?;
        let hash = sha256_hex(&bytes);
        log::debug!("Calculated hash: {}", hash);
        log::debug!("Expected hash:   {}", expected_hash);
        Ok(hash == expected_hash)
    }

    /// `Ok(false)` when artifacts are missing or do not match the manifest.
    pub fn verify(&self) -> Result<bool, ArtifactError> {
        if !self.is_trained() {
            log::info!("One or more artifact files do not exist");
            return Ok(false);
        }
        let manifest = self.manifest()?;
        let vectorizer_ok = self.verify_file(&self.vectorizer_path(), &manifest.vectorizer_hash)?;
        let model_ok = self.verify_file(&self.model_path(), &manifest.model_hash)?;

        log::info!("Verification results:");
        log::info!("  Vectorizer hash verification: {}", vectorizer_ok);
        log::info!("  Model hash verification: {}", model_ok);
        Ok(vectorizer_ok && model_ok)
    }

    /// Loads the artifact pair, refusing files that do not match the
    /// manifest.
    pub fn load(&self) -> Result<Classifier, ArtifactError> {
        if !self.is_trained() {
            return Err(ArtifactError::NotTrained(self.dir.clone()));
        }
        let manifest = self.manifest()?;

        let vectorizer_bytes = read_verified(&self.vectorizer_path(), &manifest.vectorizer_hash, "vectorizer")?;
        let model_bytes = read_verified(&self.model_path(), &manifest.model_hash, "model")?;

        let vectorizer: TfidfVectorizer = serde_json::from_slice(&vectorizer_bytes)?;
        let model: LogisticRegression = serde_json::from_slice(&model_bytes)?;
        let classifier = Classifier::from_parts(vectorizer, model)?;

        log::info!(
            "Loaded classifier from {:?} (written by v{} at {})",
            self.dir,
            manifest.crate_version,
            manifest.created_at
        );
        Ok(classifier)
    }

    pub fn save_report(&self, report: &TrainingReport) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.report_path(), serde_json::to_vec_pretty(report)?)?;
        Ok(())
    }

    pub fn load_report(&self) -> Result<TrainingReport, ArtifactError> {
        if !self.report_path().exists() {
            return Err(ArtifactError::NotTrained(self.dir.clone()));
        }
        Ok(serde_json::from_slice(&fs::read(self.report_path())?)?)
    }

    pub fn remove(&self) -> Result<(), ArtifactError> {
        for path in [
            self.vectorizer_path(),
            self.model_path(),
            self.manifest_path(),
            self.report_path(),
        ] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn read_verified(path: &Path, expected_hash: &str, file_type: &str) -> Result<Vec<u8>, ArtifactError> {
    let bytes = fs::read(path)?;
    let hash = sha256_hex(&bytes);
    if hash != expected_hash {
        log::error!("{} hash mismatch: expected {}, got {}", file_type, expected_hash, hash);
        return Err(ArtifactError::HashMismatch {
            file_type: file_type.to_string(),
            expected: expected_hash.to_string(),
            actual: hash,
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::builder()
            .add_example("what is the fee structure", "fees")
            .unwrap()
            .add_example("is hostel facility available", "hostel")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_save_and_load() -> Result<(), ArtifactError> {
        let dir = tempfile::tempdir()?;
        let store = ArtifactStore::new(dir.path().join("artifacts"))?;
        assert!(!store.is_trained());
        assert!(!store.verify()?);

        let original = classifier();
        let manifest = store.save(&original)?;
        assert_eq!(manifest.vectorizer_hash.len(), 64);
        assert!(store.is_trained());
        assert!(store.verify()?);

        let loaded = store.load()?;
        assert_eq!(loaded.info(), original.info());
        assert_eq!(
            loaded.predict_intent("hostel facility")?,
            original.predict_intent("hostel facility")?
        );
        Ok(())
    }

    #[test]
    fn test_load_untrained() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        assert!(matches!(store.load(), Err(ArtifactError::NotTrained(_))));
    }

    #[test]
    fn test_tampering_detected() -> Result<(), ArtifactError> {
        let dir = tempfile::tempdir()?;
        let store = ArtifactStore::new(dir.path())?;
        store.save(&classifier())?;

        let mut bytes = fs::read(store.model_path())?;
        bytes.push(b' ');
        fs::write(store.model_path(), bytes)?;

        assert!(!store.verify()?);
        match store.load() {
            Err(ArtifactError::HashMismatch { file_type, .. }) => assert_eq!(file_type, "model"),
            other => panic!("expected hash mismatch, got {:?}", other.map(|c| c.info())),
        }
        Ok(())
    }

    #[test]
    fn test_remove() -> Result<(), ArtifactError> {
        let dir = tempfile::tempdir()?;
        let store = ArtifactStore::new(dir.path())?;
        store.save(&classifier())?;
        store.remove()?;
        assert!(!store.is_trained());
        Ok(())
    }
}
