//! Composition trees and operadic plugging.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::OperadError;
use crate::operators::{Operator, Step};

/// An operation built from the operator vocabulary.
///
/// Holes are the open inputs; a tree with `n` holes is an `n`-ary
/// operation. Holes are numbered left to right in depth-first order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionTree {
    Hole,
    Step(Step),
    Node {
        op: Operator,
        children: Vec<CompositionTree>,
    },
}

impl CompositionTree {
    pub fn hole() -> Self {
        Self::Hole
    }

    pub fn step(step: Step) -> Self {
        Self::Step(step)
    }

    /// Build a node, checking the child count against the operator's arity.
    pub fn node(op: Operator, children: Vec<CompositionTree>) -> Result<Self, OperadError> {
        if children.len() != op.arity() {
            return Err(OperadError::ChildCountMismatch {
                operator: op.name().to_string(),
                expected: op.arity(),
                actual: children.len(),
            });
        }
        Ok(Self::Node { op, children })
    }

    /// The bare generator: `op` applied to one hole per declared input.
    pub fn generator(op: Operator) -> Self {
        let children = vec![Self::Hole; op.arity()];
        Self::Node { op, children }
    }

    /// The unit operation `Identity(_)`.
    pub fn identity() -> Self {
        Self::generator(Operator::Identity)
    }

    /// Check every node's child count against its operator's arity.
    ///
    /// `Node` is a public variant and deserializable, so trees built
    /// without [`CompositionTree::node`] may be malformed.
    pub fn validate(&self) -> Result<(), OperadError> {
        match self {
            Self::Hole | Self::Step(_) => Ok(()),
            Self::Node { op, children } => {
                if children.len() != op.arity() {
                    return Err(OperadError::ChildCountMismatch {
                        operator: op.name().to_string(),
                        expected: op.arity(),
                        actual: children.len(),
                    });
                }
                children.iter().try_for_each(Self::validate)
            }
        }
    }

    /// Number of holes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Hole => 1,
            Self::Step(_) => 0,
            Self::Node { children, .. } => children.iter().map(Self::arity).sum(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::Hole | Self::Step(_) => 0,
            Self::Node { children, .. } => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }

    /// Total number of tree positions.
    pub fn size(&self) -> usize {
        match self {
            Self::Hole | Self::Step(_) => 1,
            Self::Node { children, .. } => 1 + children.iter().map(Self::size).sum::<usize>(),
        }
    }

    fn substitute(
        &self,
        next_hole: &mut usize,
        position: usize,
        inner: &[CompositionTree],
    ) -> CompositionTree {
        match self {
            Self::Hole => {
                let index = *next_hole;
                *next_hole += 1;
                if index >= position && index < position + inner.len() {
                    inner[index - position].clone()
                } else {
                    Self::Hole
                }
            }
            Self::Step(step) => Self::Step(*step),
            Self::Node { op, children } => Self::Node {
                op: op.clone(),
                children: children
                    .iter()
                    .map(|c| c.substitute(next_hole, position, inner))
                    .collect(),
            },
        }
    }
}

impl fmt::Display for CompositionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hole => write!(f, "_"),
            Self::Step(step) => write!(f, "{}", step),
            Self::Node { op, children } => {
                write!(f, "{}(", op)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Plug `inner` into consecutive holes of `outer`, starting at hole
/// `position`. Hole indices refer to `outer` before plugging.
///
/// Fails with [`OperadError::ArityMismatch`] when `position` is not a hole
/// of `outer` or the inner operations would run past its last hole.
pub fn compose(
    outer: &CompositionTree,
    inner: &[CompositionTree],
    position: usize,
) -> Result<CompositionTree, OperadError> {
    let arity = outer.arity();
    if position >= arity || position + inner.len() > arity {
        return Err(OperadError::ArityMismatch {
            arity,
            position,
            supplied: inner.len(),
        });
    }
    let mut next_hole = 0;
    Ok(outer.substitute(&mut next_hole, position, inner))
}
