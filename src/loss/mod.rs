pub mod naive;
pub mod realization;
pub mod softmax;
pub mod vectorized;

pub use naive::softmax_loss_naive;
pub use realization::Realization;
pub use softmax::{LossAndGrad, SoftmaxLoss};
pub use vectorized::softmax_loss_vectorized;
