use log::debug;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::loss::naive::softmax_loss_naive;
use crate::loss::realization::Realization;
use crate::loss::vectorized::softmax_loss_vectorized;
use crate::math::matrix::Matrix;

/// Result of one loss evaluation.
///
/// `grad` has the shape of the weight matrix it was computed for and is a
/// fresh allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossAndGrad {
    pub loss: f64,
    pub grad: Matrix,
}

/// Softmax cross-entropy loss of a linear classifier with L2 regularization.
///
/// For weights `W` (D×C), a batch `X` (N×D) and labels `y` (N):
///
///   L  = -1/N · Σᵢ log softmax(Xᵢ·W)[yᵢ] + 0.5 · reg · ‖W‖²
///   dW = Xᵀ · (P - onehot(y)) / N + reg · W
///
/// where `P` holds the per-example class probabilities.
///
/// ```
/// use softmax_loss::{Matrix, Realization, SoftmaxLoss};
///
/// let w = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
/// let x = Matrix::from_data(vec![vec![1.0, 0.0]]);
///
/// let out = SoftmaxLoss::new(0.0)
///     .with_realization(Realization::Naive)
///     .evaluate(&w, &x, &[0])
///     .unwrap();
/// assert!((out.loss - 0.3133).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxLoss {
    /// Regularization strength; must be finite and non-negative.
    pub reg: f64,
    #[serde(default)]
    pub realization: Realization,
}

impl SoftmaxLoss {
    pub fn new(reg: f64) -> Self {
        SoftmaxLoss { reg, realization: Realization::default() }
    }

    pub fn with_realization(mut self, realization: Realization) -> Self {
        self.realization = realization;
        self
    }

    /// Evaluates the loss and its gradient with respect to `w`.
    pub fn evaluate(&self, w: &Matrix, x: &Matrix, y: &[usize]) -> Result<LossAndGrad> {
        debug!(
            "softmax loss ({:?}): W {}x{}, X {}x{}, reg {}",
            self.realization, w.rows, w.cols, x.rows, x.cols, self.reg
        );
        match self.realization {
            Realization::Naive      => softmax_loss_naive(w, x, y, self.reg),
            Realization::Vectorized => softmax_loss_vectorized(w, x, y, self.reg),
        }
    }
}

/// Shared precondition check for both realizations.
pub(crate) fn check_inputs(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<()> {
    w.check_rectangular("W")?;
    x.check_rectangular("X")?;

    if !reg.is_finite() || reg < 0.0 {
        return Err(Error::invalid(format!(
            "regularization strength must be finite and non-negative, got {reg}"
        )));
    }
    if x.cols != w.rows {
        return Err(Error::ShapeMismatch { what: "X columns vs W rows", expected: w.rows, got: x.cols });
    }
    if y.len() != x.rows {
        return Err(Error::ShapeMismatch { what: "labels vs X rows", expected: x.rows, got: y.len() });
    }
    if x.rows == 0 {
        return Err(Error::invalid("batch must contain at least one example"));
    }
    if w.cols == 0 {
        return Err(Error::invalid("W must have at least one class column"));
    }
    if let Some((i, &label)) = y.iter().enumerate().find(|(_, &label)| label >= w.cols) {
        return Err(Error::invalid(format!(
            "label {label} of example {i} is out of range for {} classes",
            w.cols
        )));
    }
    Ok(())
}
