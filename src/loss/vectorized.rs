use ndarray::{Array1, Array2, Axis};

use crate::error::Result;
use crate::loss::softmax::{check_inputs, LossAndGrad};
use crate::math::matrix::Matrix;

/// Softmax loss and gradient computed as whole-batch array expressions.
///
/// Same contract and numerics as `softmax_loss_naive`; per-row broadcasts
/// (max subtraction, normalization) go through `insert_axis` and the
/// per-example true-class lookups are built with `from_shape_fn`.
pub fn softmax_loss_vectorized(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<LossAndGrad> {
    check_inputs(w, x, y, reg)?;

    let w = w.to_array2();
    let x = x.to_array2();
    let (num_train, num_classes) = (x.nrows(), w.ncols());
    let n = num_train as f64;

    // N×C scores, shifted so every row's maximum is zero.
    let scores = x.dot(&w);
    let row_max = scores.fold_axis(Axis(1), f64::NEG_INFINITY, |&a, &b| a.max(b));
    let shifted = scores - &row_max.insert_axis(Axis(1));

    let exp_scores = shifted.mapv(f64::exp);
    let sum_exp = exp_scores.sum_axis(Axis(1));
    let probs = &exp_scores / &sum_exp.view().insert_axis(Axis(1));

    let correct_shifted = Array1::from_shape_fn(num_train, |i| shifted[[i, y[i]]]);
    let data_loss = (sum_exp.mapv(f64::ln) - &correct_shifted).sum() / n;
    let loss = data_loss + 0.5 * reg * w.mapv(|v| v * v).sum();

    // dL/dscores = P - onehot(y)
    let one_hot = Array2::from_shape_fn((num_train, num_classes), |(i, k)| {
        if y[i] == k { 1.0 } else { 0.0 }
    });
    let dscores = probs - one_hot;

    let grad = x.t().dot(&dscores) / n + &w * reg;

    Ok(LossAndGrad { loss, grad: Matrix::from(grad) })
}
