/// Everything that can go wrong when evaluating the loss.
///
/// The evaluator is a pure function, so every failure is a bad input caught
/// before any arithmetic runs. Nothing here is retried or recovered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Two dimensions that must agree do not (e.g. X has 3 features but W
    /// has 4 rows, or y is shorter than the batch).
    #[error("shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A value outside its domain: negative regularization, a label that is
    /// not a valid class, an empty batch.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
