//! Non-negotiable rejection of candidate syntheses.

use std::collections::BTreeMap;

use maple_wfe_types::ContentHash;
use serde::{Deserialize, Serialize};

use crate::types::{Synthesis, VetoRecord};

/// External authority consulted before a synthesis is accepted.
///
/// A returned record ends the run in `VETOED`; no argument can overturn it.
/// Closures `Fn(&Synthesis) -> Option<String>` are predicates that issue
/// records as `"veto"`.
pub trait VetoPredicate: Send + Sync {
    fn veto(&self, synthesis: &Synthesis) -> Option<VetoRecord>;
}

impl<F> VetoPredicate for F
where
    F: Fn(&Synthesis) -> Option<String> + Send + Sync,
{
    fn veto(&self, synthesis: &Synthesis) -> Option<VetoRecord> {
        self(synthesis).map(|reason| VetoRecord {
            target_synthesis_id: synthesis.id.clone(),
            reason,
            issuer: "veto".into(),
        })
    }
}

/// Never vetoes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVeto;

impl VetoPredicate for NoVeto {
    fn veto(&self, _synthesis: &Synthesis) -> Option<VetoRecord> {
        None
    }
}

/// A predicate with a named issuer.
pub struct AuthorityVeto<F> {
    issuer: String,
    check: F,
}

impl<F> AuthorityVeto<F>
where
    F: Fn(&Synthesis) -> Option<String> + Send + Sync,
{
    pub fn new(issuer: impl Into<String>, check: F) -> Self {
        Self {
            issuer: issuer.into(),
            check,
        }
    }
}

impl<F> VetoPredicate for AuthorityVeto<F>
where
    F: Fn(&Synthesis) -> Option<String> + Send + Sync,
{
    fn veto(&self, synthesis: &Synthesis) -> Option<VetoRecord> {
        (self.check)(synthesis).map(|reason| VetoRecord {
            target_synthesis_id: synthesis.id.clone(),
            reason,
            issuer: self.issuer.clone(),
        })
    }
}

/// First veto among several predicates, consulted in order.
#[derive(Default)]
pub struct AnyVeto<'a> {
    predicates: Vec<&'a dyn VetoPredicate>,
}

impl<'a> AnyVeto<'a> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    pub fn or(mut self, predicate: &'a dyn VetoPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl VetoPredicate for AnyVeto<'_> {
    fn veto(&self, synthesis: &Synthesis) -> Option<VetoRecord> {
        self.predicates.iter().find_map(|p| p.veto(synthesis))
    }
}

/// Issued vetoes, keyed by synthesis content hash.
///
/// The ledger is itself a predicate: a synthesis whose hash has been vetoed
/// once is vetoed again with the original record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VetoLedger {
    records: BTreeMap<ContentHash, VetoRecord>,
}

impl VetoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the first record for a target; later records for the same
    /// synthesis are ignored.
    pub fn record(&mut self, record: VetoRecord) {
        self.records
            .entry(record.target_synthesis_id.clone())
            .or_insert(record);
    }

    pub fn is_vetoed(&self, synthesis_id: &ContentHash) -> bool {
        self.records.contains_key(synthesis_id)
    }

    pub fn get(&self, synthesis_id: &ContentHash) -> Option<&VetoRecord> {
        self.records.get(synthesis_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &VetoRecord> {
        self.records.values()
    }
}

impl VetoPredicate for VetoLedger {
    fn veto(&self, synthesis: &Synthesis) -> Option<VetoRecord> {
        self.records.get(&synthesis.id).cloned()
    }
}
