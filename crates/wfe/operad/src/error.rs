//! Operad error types.

use thiserror::Error;

/// Errors from composing or verifying composition trees.
#[derive(Debug, Error)]
pub enum OperadError {
    /// Plugging position (or the inner operations it covers) lies outside
    /// the outer operation's holes. Always a caller bug.
    #[error("arity mismatch: position {position} with {supplied} inner operation(s) exceeds arity {arity}")]
    ArityMismatch {
        arity: usize,
        position: usize,
        supplied: usize,
    },

    /// A node was built with the wrong number of children for its operator.
    #[error("operator {operator} takes {expected} child(ren), got {actual}")]
    ChildCountMismatch {
        operator: String,
        expected: usize,
        actual: usize,
    },

    /// A property check found a counterexample. Verification only.
    #[error("law violation: {law} failed in {failures} of {cases} case(s): {detail}")]
    LawViolation {
        law: String,
        failures: usize,
        cases: usize,
        detail: String,
    },
}
