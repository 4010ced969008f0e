use crate::error::Result;
use crate::loss::softmax::{check_inputs, LossAndGrad};
use crate::math::matrix::Matrix;

/// Softmax loss and gradient computed with explicit loops.
///
/// One example at a time: score it against every class, shift the scores by
/// their maximum so `exp()` cannot overflow, then accumulate the
/// cross-entropy and the per-class gradient contribution
/// `Xᵢ · (p_k - [k == yᵢ])` into column `k` of `dW`.
///
/// The cross-entropy term is taken as `log Σ exp(s - max) - (s_y - max)`
/// rather than `-log(p_y)`, so a true-class probability that underflows to
/// zero still yields a finite loss.
pub fn softmax_loss_naive(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<LossAndGrad> {
    check_inputs(w, x, y, reg)?;

    let num_train = x.rows;
    let num_features = w.rows;
    let num_classes = w.cols;

    let mut loss = 0.0;
    let mut grad = Matrix::zeros(num_features, num_classes);
    let mut scores = vec![0.0; num_classes];

    for i in 0..num_train {
        let xi = &x.data[i];
        let label = y[i];

        for k in 0..num_classes {
            let mut s = 0.0;
            for d in 0..num_features {
                s += xi[d] * w.data[d][k];
            }
            scores[k] = s;
        }

        let max = scores.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let correct_shifted = scores[label] - max;

        let mut sum_exp = 0.0;
        for s in scores.iter_mut() {
            *s = (*s - max).exp();
            sum_exp += *s;
        }

        loss += sum_exp.ln() - correct_shifted;

        for k in 0..num_classes {
            let p = scores[k] / sum_exp;
            let coeff = if k == label { p - 1.0 } else { p };
            for d in 0..num_features {
                grad.data[d][k] += xi[d] * coeff;
            }
        }
    }

    let n = num_train as f64;
    loss /= n;
    loss += 0.5 * reg * w.sum_squares();

    let grad = grad.map(|g| g / n) + w.map(|v| reg * v);

    Ok(LossAndGrad { loss, grad })
}
