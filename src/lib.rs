pub mod error;
pub mod math;
pub mod loss;
pub mod check;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use loss::naive::softmax_loss_naive;
pub use loss::vectorized::softmax_loss_vectorized;
pub use loss::realization::Realization;
pub use loss::softmax::{LossAndGrad, SoftmaxLoss};
pub use check::gradient_check::{grad_check_sparse, numerical_gradient, relative_error, GradCheck};
