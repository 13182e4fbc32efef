use crate::classifier::{Classifier, ClassifierError};
use crate::responses::ResponseTable;

/// Shared state for all HTTP handlers. Loaded once at startup and never
/// mutated.
#[derive(Debug, Clone)]
pub struct AppState {
    pub classifier: Classifier,
    pub responses: ResponseTable,
}

impl AppState {
    pub fn new(classifier: Classifier, responses: ResponseTable) -> Self {
        Self {
            classifier,
            responses,
        }
    }

    /// Classifies `question` and looks up the canned answer.
    ///
    /// Returns `(intent, answer, confidence)`.
    pub fn answer(&self, question: &str) -> Result<(String, String, f32), ClassifierError> {
        let (intent, scores) = self.classifier.predict(question)?;
        let confidence = scores.get(&intent).copied().unwrap_or(0.0);
        let answer = self.responses.answer(&intent).to_string();
        Ok((intent, answer, confidence))
    }
}
