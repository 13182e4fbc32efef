use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::softmax;

/// Optimizer settings for [`LogisticRegression::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Inverse L2 regularization strength
    pub c: f32,
    /// Initial gradient step
    pub learning_rate: f32,
    pub max_iter: usize,
    /// Stop once the largest gradient component falls below this
    pub tolerance: f32,
}

impl FitParams {
    /// Rejects settings under which gradient descent cannot make progress.
    /// Each check is written so that NaN fails it.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(ClassifierError::ValidationError(format!(
                "Regularization strength C must be positive and finite, got {}",
                self.c
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ClassifierError::ValidationError(format!(
                "Learning rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.max_iter == 0 {
            return Err(ClassifierError::ValidationError(
                "max_iter must be at least 1".into(),
            ));
        }
        if !(self.tolerance >= 0.0) {
            return Err(ClassifierError::ValidationError(format!(
                "Tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Multinomial (softmax) logistic regression with an L2 penalty.
///
/// Minimizes
///
/// ```text
/// mean_i(-ln p(y_i | x_i)) + ||W||^2 / (2 * C * n)
/// ```
///
/// by full-batch gradient descent with a backtracking line search. The
/// intercepts are not penalized. Weights start at zero, so fitting is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    labels: Vec<String>,
    /// `classes x features`
    weights: Array2<f32>,
    intercepts: Array1<f32>,
}

impl LogisticRegression {
    /// Fits the model on the rows of `x` with `y[i]` indexing into `labels`.
    pub fn fit(
        x: &Array2<f32>,
        y: &[usize],
        labels: Vec<String>,
        params: &FitParams,
    ) -> Result<Self, ClassifierError> {
        let (n, features) = x.dim();
        let classes = labels.len();
        if classes < 2 {
            return Err(ClassifierError::BuildError(format!(
                "At least two distinct intents are required, found {}",
                classes
            )));
        }
        if n == 0 || n != y.len() {
            return Err(ClassifierError::BuildError(format!(
                "Expected one label per row ({} rows, {} labels)",
                n,
                y.len()
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= classes) {
            return Err(ClassifierError::BuildError(format!(
                "Label index {} out of range for {} classes",
                bad, classes
            )));
        }
        params.validate()?;

        let mut targets = Array2::<f32>::zeros((n, classes));
        for (row, &label) in y.iter().enumerate() {
            targets[[row, label]] = 1.0;
        }
        let penalty = 1.0 / (params.c * n as f32);

        let mut weights = Array2::<f32>::zeros((classes, features));
        let mut intercepts = Array1::<f32>::zeros(classes);
        let mut step = params.learning_rate;
        let (mut loss, mut probabilities) = objective(x, &targets, &weights, &intercepts, penalty);

        let mut iterations = 0;
        while iterations < params.max_iter {
            let residual = (&probabilities - &targets) / n as f32;
            let grad_w = residual.t().dot(x) + &weights * penalty;
            let grad_b = residual.sum_axis(Axis(0));

            let largest = grad_w
                .iter()
                .chain(grad_b.iter())
                .fold(0.0f32, |acc, g| acc.max(g.abs()));
            if largest < params.tolerance {
                debug!("Gradient below tolerance after {} iterations", iterations);
                break;
            }
            let grad_norm2 = grad_w.mapv(|g| g * g).sum() + grad_b.mapv(|g| g * g).sum();

            // Armijo backtracking
            let mut accepted = false;
            while step > 1e-8 {
                let candidate_w = &weights - &(&grad_w * step);
                let candidate_b = &intercepts - &(&grad_b * step);
                let (candidate_loss, candidate_p) =
                    objective(x, &targets, &candidate_w, &candidate_b, penalty);
                if candidate_loss <= loss - 0.5 * step * grad_norm2 {
                    weights = candidate_w;
                    intercepts = candidate_b;
                    loss = candidate_loss;
                    probabilities = candidate_p;
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }
            iterations += 1;
            if !accepted {
                debug!("Line search stalled after {} iterations", iterations);
                break;
            }
            step *= 2.0;
        }

        info!(
            "Logistic regression fitted: {} classes, {} features, {} iterations, loss {:.4}",
            classes, features, iterations, loss
        );

        Ok(Self {
            labels,
            weights,
            intercepts,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_features(&self) -> usize {
        self.weights.ncols()
    }

    /// Class probabilities for one feature row, in label order.
    pub fn predict_proba(&self, x: ArrayView1<f32>) -> Result<Array1<f32>, ClassifierError> {
        if x.len() != self.num_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Feature size mismatch: got {}, model expects {}",
                x.len(),
                self.num_features()
            )));
        }
        let logits = self.weights.dot(&x) + &self.intercepts;
        Ok(softmax(logits.view()))
    }

    /// Most probable label for one feature row. Ties go to the earlier label.
    pub fn predict(&self, x: ArrayView1<f32>) -> Result<&str, ClassifierError> {
        let probabilities = self.predict_proba(x)?;
        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[best] {
                best = i;
            }
        }
        Ok(self.labels[best].as_str())
    }
}

/// Returns the penalized mean cross-entropy and the row-wise probabilities.
fn objective(
    x: &Array2<f32>,
    targets: &Array2<f32>,
    weights: &Array2<f32>,
    intercepts: &Array1<f32>,
    penalty: f32,
) -> (f32, Array2<f32>) {
    let mut probabilities = x.dot(&weights.t()) + intercepts;
    for mut row in probabilities.rows_mut() {
        let p = softmax(row.view());
        row.assign(&p);
    }
    let n = x.nrows() as f32;
    let cross_entropy = probabilities
        .iter()
        .zip(targets.iter())
        .filter_map(|(&p, &t)| if t > 0.0 { Some(-p.max(1e-12).ln()) } else { None })
        .sum::<f32>()
        / n;
    let l2 = 0.5 * penalty * weights.mapv(|w| w * w).sum();
    (cross_entropy + l2, probabilities)
}
