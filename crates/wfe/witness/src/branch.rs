//! Branching exploration: several witnessed paths carried side by side.

use serde::{Deserialize, Serialize};

use crate::witnessed::Witnessed;

/// A set of simultaneous exploration paths, each with its own trace.
///
/// This is list non-determinism layered over [`Witnessed`]: `bind` expands
/// every path into zero or more children and flattens them in path order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch<A> {
    paths: Vec<Witnessed<A>>,
}

impl<A> Branch<A> {
    /// A single path with an empty trace.
    pub fn pure(value: A) -> Self {
        Self {
            paths: vec![Witnessed::pure(value)],
        }
    }

    /// No paths at all (a dead end).
    pub fn empty() -> Self {
        Self { paths: Vec::new() }
    }

    /// A single, already witnessed path.
    pub fn lift(path: Witnessed<A>) -> Self {
        Self { paths: vec![path] }
    }

    pub fn from_paths(paths: Vec<Witnessed<A>>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[Witnessed<A>] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<Witnessed<A>> {
        self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn values(&self) -> Vec<&A> {
        self.paths.iter().map(Witnessed::value).collect()
    }

    /// Expand every path with `f`. Each child's trace is grafted after its
    /// parent's trace; children keep `f`'s order, parents keep theirs.
    pub fn bind<B, F>(self, mut f: F) -> Branch<B>
    where
        F: FnMut(A) -> Branch<B>,
    {
        let mut paths = Vec::new();
        for parent in self.paths {
            let (value, parent_trace) = parent.into_parts();
            for child in f(value).paths {
                let (child_value, child_trace) = child.into_parts();
                paths.push(Witnessed::new(
                    child_value,
                    parent_trace.clone().concat(child_trace),
                ));
            }
        }
        Branch { paths }
    }

    pub fn map<B, F>(self, mut f: F) -> Branch<B>
    where
        F: FnMut(A) -> B,
    {
        Branch {
            paths: self.paths.into_iter().map(|p| p.map(&mut f)).collect(),
        }
    }

    /// Drop paths whose value fails `keep`. Surviving paths are untouched.
    pub fn prune<P>(self, keep: P) -> Self
    where
        P: Fn(&A) -> bool,
    {
        Self {
            paths: self
                .paths
                .into_iter()
                .filter(|p| keep(p.value()))
                .collect(),
        }
    }

    /// The maximal-scoring path. Ties go to the lowest path index.
    ///
    /// Paths that score `NaN` are never selected; `None` when no path
    /// has a comparable score.
    pub fn best<S>(self, score: S) -> Option<Witnessed<A>>
    where
        S: Fn(&A) -> f64,
    {
        let mut best: Option<(f64, Witnessed<A>)> = None;
        for path in self.paths {
            let s = score(path.value());
            if s.is_nan() {
                continue;
            }
            let improves = match &best {
                Some((top, _)) => s > *top,
                None => true,
            };
            if improves {
                best = Some((s, path));
            }
        }
        best.map(|(_, path)| path)
    }

    /// Path concatenation (`mplus`).
    pub fn plus(mut self, other: Branch<A>) -> Self {
        self.paths.extend(other.paths);
        self
    }
}

impl<A> From<Witnessed<A>> for Branch<A> {
    fn from(path: Witnessed<A>) -> Self {
        Self::lift(path)
    }
}
