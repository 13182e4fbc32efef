use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use ndarray::{Array1, Array2};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::normalize_vector;

lazy_static! {
    // Runs of two or more word characters; single letters are dropped.
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern is valid");
}

/// Splits text into lowercase tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A fitted TF-IDF vectorizer.
///
/// Columns follow the alphabetical order of the vocabulary. Weights use the
/// smoothed inverse document frequency
///
/// ```text
/// idf(t) = ln((1 + n) / (1 + df(t))) + 1
/// ```
///
/// and every transformed row is L2-normalized. Terms that were not seen
/// during fitting are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Array1<f32>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and document frequencies of `corpus`.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Result<Self, ClassifierError> {
        if corpus.is_empty() {
            return Err(ClassifierError::BuildError(
                "Cannot fit a vectorizer on an empty corpus".into(),
            ));
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for document in corpus {
            let unique: HashSet<String> = tokenize(document.as_ref()).into_iter().collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }
        if document_frequency.is_empty() {
            return Err(ClassifierError::BuildError(
                "Empty vocabulary; the documents contain no usable tokens".into(),
            ));
        }

        let mut terms: Vec<String> = document_frequency.keys().cloned().collect();
        terms.sort();

        let n = corpus.len() as f32;
        let idf = Array1::from_iter(terms.iter().map(|term| {
            let df = document_frequency[term] as f32;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        }));
        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();

        Ok(Self { vocabulary, idf })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of `term`, if it is part of the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self) -> &Array1<f32> {
        &self.idf
    }

    /// Maps one document to its normalized TF-IDF row.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        let mut row = Array1::<f32>::zeros(self.vocabulary.len());
        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                row[column] += 1.0;
            }
        }
        row *= &self.idf;
        normalize_vector(&row)
    }

    /// Maps documents to a `documents x vocabulary` matrix.
    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Array2<f32> {
        let mut matrix = Array2::<f32>::zeros((texts.len(), self.vocabulary.len()));
        for (i, text) in texts.iter().enumerate() {
            matrix.row_mut(i).assign(&self.transform(text.as_ref()));
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Is a B.Tech seat available?"),
            vec!["is", "tech", "seat", "available"]
        );
        assert!(tokenize("a ? !").is_empty());
    }

    #[test]
    fn test_vocabulary_is_sorted() -> Result<(), ClassifierError> {
        let vectorizer = TfidfVectorizer::fit(&["hostel fees", "admission fees"])?;
        assert_eq!(vectorizer.vocabulary_size(), 3);
        assert_eq!(vectorizer.index_of("admission"), Some(0));
        assert_eq!(vectorizer.index_of("fees"), Some(1));
        assert_eq!(vectorizer.index_of("hostel"), Some(2));
        Ok(())
    }

    #[test]
    fn test_smoothed_idf() -> Result<(), ClassifierError> {
        let vectorizer = TfidfVectorizer::fit(&["hostel fees", "admission fees"])?;
        let fees = vectorizer.idf()[vectorizer.index_of("fees").unwrap()];
        let hostel = vectorizer.idf()[vectorizer.index_of("hostel").unwrap()];
        assert!((fees - 1.0).abs() < 1e-6);
        assert!((hostel - ((3.0f32 / 2.0).ln() + 1.0)).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_transform_is_normalized() -> Result<(), ClassifierError> {
        let vectorizer = TfidfVectorizer::fit(&["hostel fees", "admission fees"])?;
        let row = vectorizer.transform("Hostel hostel FEES");
        let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(row[vectorizer.index_of("admission").unwrap()], 0.0);
        assert!(row[vectorizer.index_of("hostel").unwrap()] > row[vectorizer.index_of("fees").unwrap()]);
        Ok(())
    }

    #[test]
    fn test_unknown_tokens_ignored() -> Result<(), ClassifierError> {
        let vectorizer = TfidfVectorizer::fit(&["hostel fees"])?;
        let row = vectorizer.transform("completely unrelated words");
        assert!(row.iter().all(|&x| x == 0.0));
        Ok(())
    }

    #[test]
    fn test_fit_errors() {
        let empty: [&str; 0] = [];
        assert!(matches!(TfidfVectorizer::fit(&empty), Err(ClassifierError::BuildError(_))));
        assert!(matches!(TfidfVectorizer::fit(&["a", "?"]), Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_transform_batch_shape() -> Result<(), ClassifierError> {
        let vectorizer = TfidfVectorizer::fit(&["hostel fees", "admission fees"])?;
        let matrix = vectorizer.transform_batch(&["fees", "hostel", "nothing"]);
        assert_eq!(matrix.dim(), (3, 3));
        Ok(())
    }
}
