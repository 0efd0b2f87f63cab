//! Fusion error types.

use thiserror::Error;

/// Structural misuse of the fusion engine. Impasse and veto are results,
/// not errors.
#[derive(Debug, Error)]
pub enum FusionError {
    #[error("unknown proposal handle: {0}")]
    UnknownProposal(usize),

    #[error("n-way fusion needs at least two proposals, got {0}")]
    TooFewProposals(usize),

    #[error("resolution attempt cap must be at least 1")]
    ZeroAttemptCap,
}
