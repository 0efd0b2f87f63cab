//! Belief contexts and their refinement order.
//!
//! A [`Context`] names a [`Scope`]: the time window and the evidence a belief
//! was formed over. `a` refines `b` when everything `a` admits, `b` admits too.
//! Two contexts overlap when the intersection of their scopes admits anything.

use std::collections::BTreeSet;
use std::fmt;

use maple_wfe_types::ContentHash;
use serde::{Deserialize, Serialize};

/// Inclusive millisecond window. Construction orders the endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    start_ms: u64,
    end_ms: u64,
}

impl TimeWindow {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self {
            start_ms: start_ms.min(end_ms),
            end_ms: start_ms.max(end_ms),
        }
    }

    /// The window covering all of time.
    pub fn unbounded() -> Self {
        Self::new(0, u64::MAX)
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn contains_ms(&self, at_ms: u64) -> bool {
        self.start_ms <= at_ms && at_ms <= self.end_ms
    }

    pub fn within(&self, other: &TimeWindow) -> bool {
        other.start_ms <= self.start_ms && self.end_ms <= other.end_ms
    }

    pub fn intersect(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let start = self.start_ms.max(other.start_ms);
        let end = self.end_ms.min(other.end_ms);
        (start <= end).then(|| TimeWindow::new(start, end))
    }

    /// Smallest window containing both.
    pub fn hull(&self, other: &TimeWindow) -> TimeWindow {
        TimeWindow::new(
            self.start_ms.min(other.start_ms),
            self.end_ms.max(other.end_ms),
        )
    }
}

/// Evidence a scope admits: everything, or an explicit tag set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceSet {
    Any,
    Only(BTreeSet<String>),
}

impl EvidenceSet {
    pub fn of<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EvidenceSet::Only(tags.into_iter().map(Into::into).collect())
    }

    pub fn admits(&self, tag: &str) -> bool {
        match self {
            EvidenceSet::Any => true,
            EvidenceSet::Only(tags) => tags.contains(tag),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EvidenceSet::Only(tags) if tags.is_empty())
    }

    pub fn within(&self, other: &EvidenceSet) -> bool {
        match (self, other) {
            (_, EvidenceSet::Any) => true,
            (EvidenceSet::Any, EvidenceSet::Only(_)) => false,
            (EvidenceSet::Only(a), EvidenceSet::Only(b)) => a.is_subset(b),
        }
    }

    pub fn intersect(&self, other: &EvidenceSet) -> EvidenceSet {
        match (self, other) {
            (EvidenceSet::Any, x) | (x, EvidenceSet::Any) => x.clone(),
            (EvidenceSet::Only(a), EvidenceSet::Only(b)) => {
                EvidenceSet::Only(a.intersection(b).cloned().collect())
            }
        }
    }

    pub fn union(&self, other: &EvidenceSet) -> EvidenceSet {
        match (self, other) {
            (EvidenceSet::Any, _) | (_, EvidenceSet::Any) => EvidenceSet::Any,
            (EvidenceSet::Only(a), EvidenceSet::Only(b)) => {
                EvidenceSet::Only(a.union(b).cloned().collect())
            }
        }
    }
}

/// Time window × evidence set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub window: TimeWindow,
    pub evidence: EvidenceSet,
}

impl Scope {
    pub fn new(window: TimeWindow, evidence: EvidenceSet) -> Self {
        Self { window, evidence }
    }

    pub fn universal() -> Self {
        Self::new(TimeWindow::unbounded(), EvidenceSet::Any)
    }

    pub fn admits(&self, at_ms: u64, tag: &str) -> bool {
        self.window.contains_ms(at_ms) && self.evidence.admits(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }

    pub fn within(&self, other: &Scope) -> bool {
        self.window.within(&other.window) && self.evidence.within(&other.evidence)
    }

    /// Non-empty intersection, or `None` when nothing is admitted by both.
    pub fn intersect(&self, other: &Scope) -> Option<Scope> {
        let window = self.window.intersect(&other.window)?;
        let evidence = self.evidence.intersect(&other.evidence);
        if evidence.is_empty() {
            return None;
        }
        Some(Scope::new(window, evidence))
    }

    pub fn cover(&self, other: &Scope) -> Scope {
        Scope::new(
            self.window.hull(&other.window),
            self.evidence.union(&other.evidence),
        )
    }

    pub fn digest(&self) -> ContentHash {
        ContentHash::of_json(self)
    }
}

/// A named scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    id: String,
    scope: Scope,
}

impl Context {
    pub fn new(id: impl Into<String>, scope: Scope) -> Self {
        Self {
            id: id.into(),
            scope,
        }
    }

    pub fn universal(id: impl Into<String>) -> Self {
        Self::new(id, Scope::universal())
    }

    /// Context over all of time, admitting only the given evidence tags.
    pub fn of_evidence<I, S>(id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, Scope::new(TimeWindow::unbounded(), EvidenceSet::of(tags)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// `self ≤ other`: `self` is at least as specific as `other`.
    pub fn refines(&self, other: &Context) -> bool {
        self.scope.within(&other.scope)
    }

    pub fn overlaps(&self, other: &Context) -> bool {
        self.scope.intersect(&other.scope).is_some()
    }

    /// The intersection context, named by its scope digest so that the
    /// result does not depend on argument order.
    pub fn overlap(&self, other: &Context) -> Option<Context> {
        let scope = self.scope.intersect(&other.scope)?;
        Some(Context::derived("overlap", scope))
    }

    /// Smallest context every input refines. `None` for no inputs.
    pub fn covering<'a, I>(contexts: I) -> Option<Context>
    where
        I: IntoIterator<Item = &'a Context>,
    {
        let mut iter = contexts.into_iter();
        let first = iter.next()?.scope.clone();
        let scope = iter.fold(first, |acc, c| acc.cover(&c.scope));
        Some(Context::derived("cover", scope))
    }

    fn derived(kind: &str, scope: Scope) -> Context {
        let digest = scope.digest().to_hex();
        Context::new(format!("{}:{}", kind, &digest[..12]), scope)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
