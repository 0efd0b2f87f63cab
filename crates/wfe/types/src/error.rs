use crate::hash::ContentHash;

/// Errors from hash parsing and trace verification.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("invalid hex length: {0} (expected 64)")]
    InvalidLength(usize),
    #[error("invalid hex character")]
    InvalidHex,
    #[error("mark id mismatch at position {position}: stored {stored}, computed {computed}")]
    MarkIdMismatch {
        position: usize,
        stored: ContentHash,
        computed: ContentHash,
    },
}
