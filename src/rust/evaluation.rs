use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::classifier::{Classifier, ClassifierError};
use crate::dataset::FaqRecord;

/// Precision, recall and F1 for one intent (or one average).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMetrics {
    pub label: String,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub support: usize,
}

/// Per-intent metrics plus accuracy and the macro / weighted averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub labels: Vec<LabelMetrics>,
    pub accuracy: f32,
    pub macro_avg: LabelMetrics,
    pub weighted_avg: LabelMetrics,
    pub total: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

fn f1(precision: f32, recall: f32) -> f32 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    /// Builds the report from aligned `truth` / `predicted` label slices.
    ///
    /// Labels are the sorted union of both slices. Any zero division yields
    /// 0.0.
    ///
    /// # Panics
    ///
    /// Panics if `truth` and `predicted` differ in length.
    pub fn from_predictions<S: AsRef<str>>(truth: &[S], predicted: &[S]) -> Self {
        assert_eq!(truth.len(), predicted.len(), "truth and predictions must align");

        let all: BTreeSet<&str> = truth
            .iter()
            .chain(predicted.iter())
            .map(|s| s.as_ref())
            .collect();

        let pairs: Vec<(&str, &str)> = truth
            .iter()
            .zip(predicted.iter())
            .map(|(t, p)| (t.as_ref(), p.as_ref()))
            .collect();

        let labels: Vec<LabelMetrics> = all
            .into_iter()
            .map(|label| {
                let tp = pairs.iter().filter(|(t, p)| *t == label && *p == label).count();
                let predicted_as = pairs.iter().filter(|(_, p)| *p == label).count();
                let support = pairs.iter().filter(|(t, _)| *t == label).count();
                let precision = ratio(tp, predicted_as);
                let recall = ratio(tp, support);
                LabelMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support,
                }
            })
            .collect();

        let total = pairs.len();
        let correct = pairs.iter().filter(|(t, p)| t == p).count();

        let count = labels.len().max(1) as f32;
        let macro_avg = LabelMetrics {
            label: "macro avg".into(),
            precision: labels.iter().map(|m| m.precision).sum::<f32>() / count,
            recall: labels.iter().map(|m| m.recall).sum::<f32>() / count,
            f1: labels.iter().map(|m| m.f1).sum::<f32>() / count,
            support: total,
        };

        let weight = |value: fn(&LabelMetrics) -> f32| -> f32 {
            if total == 0 {
                return 0.0;
            }
            labels.iter().map(|m| value(m) * m.support as f32).sum::<f32>() / total as f32
        };
        let weighted_avg = LabelMetrics {
            label: "weighted avg".into(),
            precision: weight(|m: &LabelMetrics| m.precision),
            recall: weight(|m: &LabelMetrics| m.recall),
            f1: weight(|m: &LabelMetrics| m.f1),
            support: total,
        };

        Self {
            labels,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
            total,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|m| m.label.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support",
            width = width
        )?;
        writeln!(f)?;
        for metrics in &self.labels {
            write_row(f, metrics, width)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total,
            width = width
        )?;
        write_row(f, &self.macro_avg, width)?;
        write_row(f, &self.weighted_avg, width)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, m: &LabelMetrics, width: usize) -> fmt::Result {
    writeln!(
        f,
        "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        m.label, m.precision, m.recall, m.f1, m.support,
        width = width
    )
}

/// Predicts every question in `records` and scores the predictions.
pub fn evaluate(
    classifier: &Classifier,
    records: &[FaqRecord],
) -> Result<ClassificationReport, ClassifierError> {
    let truth: Vec<String> = records.iter().map(|r| r.intent.clone()).collect();
    let predicted = records
        .iter()
        .map(|r| classifier.predict_intent(&r.question))
        .collect::<Result<Vec<String>, _>>()?;
    Ok(ClassificationReport::from_predictions(truth.as_slice(), predicted.as_slice()))
}
