use serde::{Serialize, Deserialize};

/// Selects which realization of the softmax loss `SoftmaxLoss::evaluate` runs.
///
/// - `Naive`      — explicit loops over examples, classes and features on
///   `Matrix` rows. Easy to audit; slow for large batches.
/// - `Vectorized` — whole-batch `ndarray` expressions: one product for the
///   scores, axis reductions for the row max and row sum, one product for
///   the gradient.
///
/// Both return the same loss and gradient up to floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realization {
    Naive,
    #[default]
    Vectorized,
}
