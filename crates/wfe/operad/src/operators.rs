//! Operator vocabulary and atomic steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate deciding which arm a `ConditionalBranch` takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Guard {
    Even,
    Positive,
    Below(i64),
}

impl Guard {
    pub fn holds(&self, x: i64) -> bool {
        match self {
            Self::Even => x % 2 == 0,
            Self::Positive => x > 0,
            Self::Below(bound) => x < *bound,
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => write!(f, "even"),
            Self::Positive => write!(f, "positive"),
            Self::Below(bound) => write!(f, "below({})", bound),
        }
    }
}

/// Composition operators. The first five are the generators; `Identity`
/// is the designated unit used by the identity laws.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Sequence,
    Parallel,
    ConditionalBranch { guard: Guard },
    FixedPointIterate { max_iterations: u32 },
    TraceAnnotate { label: String },
    Identity,
}

impl Operator {
    /// Declared number of inputs.
    pub fn arity(&self) -> usize {
        match self {
            Self::Sequence | Self::Parallel | Self::ConditionalBranch { .. } => 2,
            Self::FixedPointIterate { .. } | Self::TraceAnnotate { .. } | Self::Identity => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequence => "Sequence",
            Self::Parallel => "Parallel",
            Self::ConditionalBranch { .. } => "ConditionalBranch",
            Self::FixedPointIterate { .. } => "FixedPointIterate",
            Self::TraceAnnotate { .. } => "TraceAnnotate",
            Self::Identity => "Identity",
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConditionalBranch { guard } => write!(f, "ConditionalBranch[{}]", guard),
            Self::FixedPointIterate { max_iterations } => {
                write!(f, "FixedPointIterate[max={}]", max_iterations)
            }
            Self::TraceAnnotate { label } => write!(f, "TraceAnnotate[{}]", label),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// An atomic reasoning step on an integer state. Arithmetic wraps so that
/// every step is total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Add(i64),
    Mul(i64),
    Halve,
    Negate,
    Clamp { lo: i64, hi: i64 },
}

impl Step {
    pub fn apply(&self, x: i64) -> i64 {
        match self {
            Self::Add(n) => x.wrapping_add(*n),
            Self::Mul(n) => x.wrapping_mul(*n),
            Self::Halve => x / 2,
            Self::Negate => x.wrapping_neg(),
            Self::Clamp { lo, hi } => {
                let (lo, hi) = if lo <= hi { (*lo, *hi) } else { (*hi, *lo) };
                x.clamp(lo, hi)
            }
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(n) => write!(f, "add({})", n),
            Self::Mul(n) => write!(f, "mul({})", n),
            Self::Halve => write!(f, "halve"),
            Self::Negate => write!(f, "negate"),
            Self::Clamp { lo, hi } => write!(f, "clamp({}, {})", lo, hi),
        }
    }
}
