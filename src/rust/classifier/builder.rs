use std::collections::BTreeSet;

use log::info;

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::model::LogisticRegression;
use super::vectorizer::TfidfVectorizer;
use crate::dataset::FaqRecord;
use crate::training::TrainingConfig;

const MAX_QUESTION_LENGTH: usize = 1000;
const MAX_INTENTS: usize = 100;

/// A builder for constructing a Classifier with a fluent interface.
///
/// Examples are collected first; [`ClassifierBuilder::build`] fits the
/// TF-IDF vectorizer and the logistic regression on all of them.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    examples: Vec<FaqRecord>,
    intents: BTreeSet<String>,
    training_config: TrainingConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use faq_intent::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            examples: Vec::new(),
            intents: BTreeSet::new(),
            training_config: TrainingConfig::default(),
        }
    }

    /// Sets the optimizer configuration used by `build`
    ///
    /// # Example
    /// ```
    /// use faq_intent::{ClassifierBuilder, TrainingConfig};
    ///
    /// let config = TrainingConfig { c: 10.0, ..TrainingConfig::default() };
    /// let builder = ClassifierBuilder::new()
    ///     .with_training_config(config);
    /// ```
    pub fn with_training_config(mut self, config: TrainingConfig) -> Self {
        self.training_config = config;
        self
    }

    /// Validates one labelled question:
    /// - Question must not be blank and must not exceed 1000 characters
    /// - Intent must not be blank
    fn validate_example(question: &str, intent: &str) -> Result<(), ClassifierError> {
        if question.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Question cannot be empty".into()));
        }
        if intent.trim().is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Intent for question '{}' cannot be empty",
                question
            )));
        }
        let length = question.chars().count();
        if length > MAX_QUESTION_LENGTH {
            return Err(ClassifierError::ValidationError(format!(
                "Question is too long ({} chars, max is {})",
                length, MAX_QUESTION_LENGTH
            )));
        }
        Ok(())
    }

    /// Adds one labelled question
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The question or intent is empty
    ///   - The question is too long
    ///   - Maximum number of intents (100) is exceeded
    ///
    /// # Example
    /// ```
    /// use faq_intent::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .add_example("Is hostel facility available?", "hostel");
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_example(
        mut self,
        question: impl Into<String>,
        intent: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        let question = question.into();
        let intent = intent.into();
        Self::validate_example(&question, &intent)?;

        let intent = intent.trim().to_string();
        if !self.intents.contains(&intent) && self.intents.len() >= MAX_INTENTS {
            return Err(ClassifierError::ValidationError(format!(
                "Maximum number of intents ({}) exceeded",
                MAX_INTENTS
            )));
        }
        self.intents.insert(intent.clone());
        self.examples.push(FaqRecord { question, intent });
        Ok(self)
    }

    /// Adds every record, stopping at the first invalid one
    pub fn add_examples<I>(self, records: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = FaqRecord>,
    {
        records
            .into_iter()
            .try_fold(self, |builder, record| builder.add_example(record.question, record.intent))
    }

    /// Fits the vectorizer and the model and returns the final Classifier
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The fitted Classifier if successful, or an error if:
    ///   - No examples have been added
    ///   - Fewer than two distinct intents were seen
    ///   - The questions contain no usable tokens
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use faq_intent::ClassifierBuilder;
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .add_example("what is the fee structure", "fees")?
    ///     .add_example("is hostel facility available", "hostel")?
    ///     .build()?;
    /// assert_eq!(classifier.info().num_classes, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        if self.examples.is_empty() {
            return Err(ClassifierError::BuildError("At least one example must be added".into()));
        }
        if self.intents.len() < 2 {
            return Err(ClassifierError::BuildError(format!(
                "At least two distinct intents are required, found {}",
                self.intents.len()
            )));
        }

        let questions: Vec<&str> = self.examples.iter().map(|e| e.question.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(questions.as_slice())?;
        info!(
            "Vectorizer fitted on {} questions ({} terms)",
            questions.len(),
            vectorizer.vocabulary_size()
        );

        let labels: Vec<String> = self.intents.into_iter().collect();
        let targets = self
            .examples
            .iter()
            .map(|e| {
                labels
                    .binary_search(&e.intent)
                    .map_err(|_| ClassifierError::BuildError(format!("Unknown intent '{}'", e.intent)))
            })
            .collect::<Result<Vec<usize>, _>>()?;

        let features = vectorizer.transform_batch(questions.as_slice());
        let model = LogisticRegression::fit(
            &features,
            &targets,
            labels,
            &self.training_config.fit_params(),
        )?;

        Classifier::from_parts(vectorizer, model)
    }
}
