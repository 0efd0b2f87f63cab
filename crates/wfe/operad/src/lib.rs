#![deny(unsafe_code)]
//! # maple-wfe-operad
//!
//! A small operad of composition operators over witnessed reasoning steps,
//! an interpreter that executes composition trees into
//! [`Witnessed<i64>`](maple_wfe_witness::Witnessed), and a seeded verifier
//! that checks the operad laws empirically.
//!
//! ## Vocabulary
//!
//! | Operator | Arity | Behavior |
//! |----------|-------|----------|
//! | `Sequence` | 2 | run left, feed its value to right |
//! | `Parallel` | 2 | run both on the same input, add the results |
//! | `ConditionalBranch` | 2 | run left if the guard holds, else right |
//! | `FixedPointIterate` | 1 | repeat until the value stops changing (bounded) |
//! | `TraceAnnotate` | 1 | run child, then append a labelled mark |
//! | `Identity` | 1 | run child unchanged (the designated unit) |
//!
//! A [`CompositionTree`] with `n` holes is an `n`-ary operation;
//! [`compose`] plugs trees into holes. Laws are checked by execution, not by
//! inspecting tree shapes. The operator laws (sequence and parallel
//! associativity, the sequence unit) compare structurally different trees,
//! so interpreter regressions surface as [`OperadError::LawViolation`].

pub mod error;
pub mod interpreter;
pub mod laws;
pub mod operators;
pub mod tree;

pub use error::OperadError;
pub use interpreter::{Interpreter, TreeExecutor};
pub use laws::{
    associativity_sides, interchange_sides, left_identity_sides, parallel_associativity_sides,
    right_identity_sides, sequence_associativity_sides, sequence_unit_sides, verify_operad_laws,
    verify_with, Counterexample, LawCheckConfig, LawOutcome, LawReport, LawVerifier, OperadLaw,
};
pub use operators::{Guard, Operator, Step};
pub use tree::{compose, CompositionTree};
