mod error;
mod model;
mod utils;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;
pub mod vectorizer;

pub use builder::ClassifierBuilder;
pub use classifier::Classifier;
pub use error::ClassifierError;
pub use model::{FitParams, LogisticRegression};
pub use vectorizer::TfidfVectorizer;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierInfo {
    /// Number of intents the classifier was trained on
    pub num_classes: usize,
    /// Intent labels, sorted
    pub class_labels: Vec<String>,
    /// Number of terms in the TF-IDF vocabulary
    pub vocabulary_size: usize,
}
