use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// One sampled coordinate of a sparse gradient check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradCheck {
    pub row: usize,
    pub col: usize,
    pub numerical: f64,
    pub analytic: f64,
    pub rel_error: f64,
}

impl GradCheck {
    /// Worst relative error over a run; 0.0 for an empty run.
    pub fn max_rel_error(checks: &[GradCheck]) -> f64 {
        checks.iter().map(|c| c.rel_error).fold(0.0, f64::max)
    }
}

/// |a - b| / (|a| + |b|), defined as 0 when both are 0.
pub fn relative_error(a: f64, b: f64) -> f64 {
    let denom = a.abs() + b.abs();
    if denom == 0.0 {
        0.0
    } else {
        (a - b).abs() / denom
    }
}

/// Centered difference (f(w + h) - f(w - h)) / 2h at a single entry.
/// `probe` is restored to its original value before returning.
fn centered_difference<F>(f: &mut F, probe: &mut Matrix, row: usize, col: usize, h: f64) -> Result<f64>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let old = probe.data[row][col];

    probe.data[row][col] = old + h;
    let plus = f(probe);
    probe.data[row][col] = old - h;
    let minus = f(probe);
    probe.data[row][col] = old;

    Ok((plus? - minus?) / (2.0 * h))
}

/// Numerical gradient of `f` at `w`, one centered difference per entry.
///
/// Costs two evaluations of `f` per entry of `w`; meant for small matrices.
pub fn numerical_gradient<F>(mut f: F, w: &Matrix, h: f64) -> Result<Matrix>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    if !(h > 0.0) {
        return Err(Error::invalid(format!("step size must be positive, got {h}")));
    }
    w.check_rectangular("W")?;

    let mut probe = w.clone();
    let mut grad = Matrix::zeros(w.rows, w.cols);
    for i in 0..w.rows {
        for j in 0..w.cols {
            grad.data[i][j] = centered_difference(&mut f, &mut probe, i, j, h)?;
        }
    }
    Ok(grad)
}

/// Compares `analytic` against centered differences of `f` at `num_checks`
/// randomly drawn coordinates of `w`.
pub fn grad_check_sparse<F, R>(
    mut f: F,
    w: &Matrix,
    analytic: &Matrix,
    num_checks: usize,
    h: f64,
    rng: &mut R,
) -> Result<Vec<GradCheck>>
where
    F: FnMut(&Matrix) -> Result<f64>,
    R: Rng + ?Sized,
{
    if !(h > 0.0) {
        return Err(Error::invalid(format!("step size must be positive, got {h}")));
    }
    w.check_rectangular("W")?;
    analytic.check_rectangular("analytic gradient")?;
    if analytic.rows != w.rows {
        return Err(Error::ShapeMismatch { what: "analytic gradient rows", expected: w.rows, got: analytic.rows });
    }
    if analytic.cols != w.cols {
        return Err(Error::ShapeMismatch { what: "analytic gradient columns", expected: w.cols, got: analytic.cols });
    }
    if num_checks > 0 && (w.rows == 0 || w.cols == 0) {
        return Err(Error::invalid("cannot sample coordinates of an empty matrix"));
    }

    let mut probe = w.clone();
    let mut checks = Vec::with_capacity(num_checks);
    for _ in 0..num_checks {
        let row = rng.gen_range(0..w.rows);
        let col = rng.gen_range(0..w.cols);

        let numerical = centered_difference(&mut f, &mut probe, row, col, h)?;
        let expected = analytic.data[row][col];
        let rel_error = relative_error(numerical, expected);
        debug!(
            "grad check ({row}, {col}): numerical {numerical:.6e} analytic {expected:.6e} relative error {rel_error:.3e}"
        );

        checks.push(GradCheck { row, col, numerical, analytic: expected, rel_error });
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sum_of_cubes(m: &Matrix) -> Result<f64> {
        Ok(m.data.iter().flatten().map(|v| v * v * v).sum())
    }

    #[test]
    fn relative_error_handles_zero() {
        assert_eq!(relative_error(0.0, 0.0), 0.0);
        assert_eq!(relative_error(1.0, -1.0), 1.0);
        assert_relative_eq!(relative_error(1.0, 1.1), 0.1 / 2.1);
    }

    #[test]
    fn numerical_gradient_of_cubes() {
        let w = Matrix::from_data(vec![vec![1.0, -2.0], vec![0.5, 3.0]]);
        let grad = numerical_gradient(sum_of_cubes, &w, 1e-5).unwrap();
        for (g, v) in grad.data.iter().flatten().zip(w.data.iter().flatten()) {
            assert_relative_eq!(*g, 3.0 * v * v, max_relative = 1e-8);
        }
    }

    #[test]
    fn numerical_gradient_leaves_input_untouched() {
        let w = Matrix::from_data(vec![vec![0.1, 0.2, 0.3]]);
        let before = w.clone();
        numerical_gradient(sum_of_cubes, &w, 1e-3).unwrap();
        assert_eq!(w, before);
    }

    #[test]
    fn sparse_check_reports_every_sample() {
        let mut rng = StdRng::seed_from_u64(3);
        // Entries in [1, 1.5] keep the derivative away from zero.
        let w = Matrix::random_with(4, 3, &mut rng).map(|v| 1.0 + v.abs() / 2.0);
        let analytic = w.map(|v| 3.0 * v * v);

        let checks = grad_check_sparse(sum_of_cubes, &w, &analytic, 10, 1e-5, &mut rng).unwrap();
        assert_eq!(checks.len(), 10);
        assert!(checks.iter().all(|c| c.row < 4 && c.col < 3));
        assert!(GradCheck::max_rel_error(&checks) < 1e-6);
    }

    #[test]
    fn sparse_check_flags_wrong_gradient() {
        let mut rng = StdRng::seed_from_u64(11);
        let w = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let wrong = Matrix::from_data(vec![vec![-3.0, -12.0]]);

        let checks = grad_check_sparse(sum_of_cubes, &w, &wrong, 4, 1e-5, &mut rng).unwrap();
        assert!(GradCheck::max_rel_error(&checks) > 0.99);
    }

    #[test]
    fn sparse_check_rejects_mismatched_gradient() {
        let mut rng = StdRng::seed_from_u64(0);
        let w = Matrix::zeros(2, 2);
        let err = grad_check_sparse(sum_of_cubes, &w, &Matrix::zeros(2, 3), 1, 1e-5, &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 2, got: 3, .. }));
    }

    #[test]
    fn rejects_non_positive_step() {
        let w = Matrix::zeros(1, 1);
        assert!(numerical_gradient(sum_of_cubes, &w, 0.0).is_err());
    }
}
