//! Training runs: split the cleaned dataset, fit a classifier on the
//! training rows and score it on the held-out rows.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, ClassifierError, FitParams};
use crate::dataset::{read_records, DatasetError, FaqRecord};

/// Hyper-parameters of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for scoring
    pub test_size: f32,
    /// Seed of the shuffle that precedes the split
    pub seed: u64,
    /// Inverse L2 regularization strength
    pub c: f32,
    pub learning_rate: f32,
    pub max_iter: usize,
    pub tolerance: f32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            c: 1.0,
            learning_rate: 0.5,
            max_iter: 500,
            tolerance: 1e-4,
        }
    }
}

impl TrainingConfig {
    pub fn fit_params(&self) -> FitParams {
        FitParams {
            c: self.c,
            learning_rate: self.learning_rate,
            max_iter: self.max_iter,
            tolerance: self.tolerance,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Summary of a training run, persisted next to the artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub labels: Vec<String>,
    pub vocabulary_size: usize,
    /// Held-out accuracy; `None` when nothing was held out
    pub accuracy: Option<f32>,
    pub config: TrainingConfig,
}

/// Shuffles `records` with a seeded RNG and splits off `ceil(test_size * n)`
/// rows for testing, always leaving at least one row for training.
pub fn train_test_split(
    records: &[FaqRecord],
    test_size: f32,
    seed: u64,
) -> Result<(Vec<FaqRecord>, Vec<FaqRecord>), TrainingError> {
    if !(0.0..1.0).contains(&test_size) {
        return Err(TrainingError::InvalidConfig(format!(
            "test_size must be in [0, 1), got {}",
            test_size
        )));
    }
    let mut shuffled = records.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let n = shuffled.len();
    let test_rows = ((test_size * n as f32).ceil() as usize).min(n.saturating_sub(1));
    let train = shuffled.split_off(test_rows);
    Ok((train, shuffled))
}

/// Fraction of records whose predicted intent matches the label.
pub fn accuracy(classifier: &Classifier, records: &[FaqRecord]) -> Result<Option<f32>, ClassifierError> {
    if records.is_empty() {
        return Ok(None);
    }
    let mut correct = 0;
    for record in records {
        if classifier.predict_intent(&record.question)? == record.intent {
            correct += 1;
        }
    }
    Ok(Some(correct as f32 / records.len() as f32))
}

/// Splits, fits and scores. The returned classifier was fitted on the
/// training rows only.
pub fn run_training(
    records: &[FaqRecord],
    config: &TrainingConfig,
) -> Result<(Classifier, TrainingReport), TrainingError> {
    config.fit_params().validate()?;
    let (train, test) = train_test_split(records, config.test_size, config.seed)?;
    info!("Training on {} rows, holding out {}", train.len(), test.len());

    let distinct: BTreeSet<&str> = train.iter().map(|r| r.intent.as_str()).collect();
    if distinct.len() < 2 {
        return Err(TrainingError::Classifier(ClassifierError::BuildError(format!(
            "Training split holds {} distinct intent(s); at least two are required",
            distinct.len()
        ))));
    }

    let classifier = Classifier::builder()
        .with_training_config(*config)
        .add_examples(train.iter().cloned())?
        .build()?;

    let accuracy = accuracy(&classifier, &test)?;
    match accuracy {
        Some(acc) => info!("Holdout accuracy: {:.3}", acc),
        None => info!("No rows held out; accuracy not computed"),
    }

    let info = classifier.info();
    let report = TrainingReport {
        trained_at: Utc::now(),
        train_rows: train.len(),
        test_rows: test.len(),
        labels: info.class_labels,
        vocabulary_size: info.vocabulary_size,
        accuracy,
        config: *config,
    };
    Ok((classifier, report))
}

/// Reads a cleaned dataset and trains on it.
pub fn train_from_file(
    path: &Path,
    config: &TrainingConfig,
) -> Result<(Classifier, TrainingReport), TrainingError> {
    let records = read_records(path)?;
    if records.is_empty() {
        return Err(DatasetError::Empty(path.display().to_string()).into());
    }
    info!("Loaded {} rows from {:?}", records.len(), path);
    run_training(&records, config)
}
