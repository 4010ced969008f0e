pub mod gradient_check;

pub use gradient_check::{grad_check_sparse, numerical_gradient, relative_error, GradCheck};
