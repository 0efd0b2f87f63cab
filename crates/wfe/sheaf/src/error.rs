//! Sheaf error types.

use thiserror::Error;

/// Structural misuse of the belief sheaf. Incompatibility is not an error:
/// [`compatible`](crate::compatible) returns `false` and
/// [`glue`](crate::glue) returns `None`.
#[derive(Debug, Error)]
pub enum SheafError {
    /// Confidence outside `[0, 1]` or not a number.
    #[error("invalid confidence {0}: must lie in [0, 1]")]
    InvalidConfidence(f64),

    /// A handle that was never issued by this sheaf.
    #[error("unknown belief handle: {0}")]
    UnknownHandle(usize),

    /// Restriction decay outside `(0, 1]`.
    #[error("invalid restriction decay {0}: must lie in (0, 1]")]
    InvalidDecay(f64),
}
