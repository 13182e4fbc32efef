use std::collections::HashMap;
use std::sync::Arc;

use super::error::ClassifierError;
use super::model::LogisticRegression;
use super::vectorizer::TfidfVectorizer;

/// A fitted intent classifier: a TF-IDF vectorizer feeding a multinomial
/// logistic regression.
///
/// # Thread Safety
///
/// This type is `Send + Sync`; both fitted parts are immutable and shared
/// through `Arc`, so a loaded classifier can serve concurrent requests:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use faq_intent::Classifier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::builder()
///     .add_example("what is the fee structure", "fees")?
///     .add_example("is hostel facility available", "hostel")?
///     .build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.predict("hostel rooms").unwrap();
/// }).join().unwrap();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    vectorizer: Arc<TfidfVectorizer>,
    model: Arc<LogisticRegression>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Pairs a fitted vectorizer with a fitted model, checking that the
    /// model was trained on the vectorizer's feature space.
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        model: LogisticRegression,
    ) -> Result<Self, ClassifierError> {
        if vectorizer.vocabulary_size() != model.num_features() {
            return Err(ClassifierError::BuildError(format!(
                "Vectorizer has {} terms but the model expects {} features",
                vectorizer.vocabulary_size(),
                model.num_features()
            )));
        }
        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            model: Arc::new(model),
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.model.labels().len(),
            class_labels: self.model.labels().to_vec(),
            vocabulary_size: self.vectorizer.vocabulary_size(),
        }
    }

    /// Makes a prediction for the given text.
    ///
    /// Returns the most probable intent together with the probability of
    /// every intent.
    pub fn predict(&self, text: &str) -> Result<(String, HashMap<String, f32>), ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let features = self.vectorizer.transform(text);
        let probabilities = self.model.predict_proba(features.view())?;
        let best = self.model.predict(features.view())?.to_string();

        let scores = self
            .model
            .labels()
            .iter()
            .cloned()
            .zip(probabilities.iter().cloned())
            .collect();

        Ok((best, scores))
    }

    /// Returns only the most probable intent.
    pub fn predict_intent(&self, text: &str) -> Result<String, ClassifierError> {
        self.predict(text).map(|(intent, _)| intent)
    }
}
