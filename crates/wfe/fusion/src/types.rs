use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use maple_wfe_sheaf::Context;
use maple_wfe_types::ContentHash;
use serde::{Deserialize, Serialize};

/// Stance per decision dimension.
pub type PositionMap = BTreeMap<String, String>;

/// Dimension a proposal without explicit positions takes its stance on.
pub const CONTENT_DIMENSION: &str = "content";

/// Caller-assigned proposal identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(pub String);

impl ProposalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a proposal registered with a [`FusionEngine`](crate::FusionEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalHandle(pub(crate) usize);

impl ProposalHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A position submitted for fusion. Read-only to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub source: String,
    pub content: String,
    pub reasoning: String,
    pub supporting_principles: Vec<String>,
    /// Stance on named decision dimensions.
    pub positions: PositionMap,
}

impl Proposal {
    pub fn new(id: ProposalId, source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            source: source.into(),
            content: content.into(),
            reasoning: String::new(),
            supporting_principles: Vec::new(),
            positions: PositionMap::new(),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_principle(mut self, principle: impl Into<String>) -> Self {
        self.supporting_principles.push(principle.into());
        self
    }

    pub fn with_principles<I, S>(mut self, principles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supporting_principles
            .extend(principles.into_iter().map(Into::into));
        self
    }

    pub fn with_position(mut self, dimension: impl Into<String>, stance: impl Into<String>) -> Self {
        self.positions.insert(dimension.into(), stance.into());
        self
    }

    /// Explicit positions, or the content on [`CONTENT_DIMENSION`] when the
    /// proposal names none.
    pub fn stances(&self) -> PositionMap {
        if self.positions.is_empty() {
            PositionMap::from([(CONTENT_DIMENSION.to_string(), self.content.clone())])
        } else {
            self.positions.clone()
        }
    }

    pub fn principles(&self) -> BTreeSet<String> {
        self.supporting_principles.iter().cloned().collect()
    }
}

/// One point of divergence inside the overlap of two proposals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tension {
    pub proposal_a: ProposalId,
    pub proposal_b: ProposalId,
    pub divergent_dimension: String,
    pub overlap_context: Context,
    pub stance_a: String,
    pub stance_b: String,
}

/// Objections raised against `target` on behalf of `advocate_for`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub target: ProposalId,
    pub advocate_for: ProposalId,
    pub objections: Vec<String>,
}

/// A stance for one divergent dimension, together with the stances of each
/// side it embeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub dimension: String,
    pub stance: String,
    pub from_a: String,
    pub from_b: String,
}

impl Resolution {
    /// True when both sides' stances map into the resolved stance.
    pub fn embeds(&self, tension: &Tension) -> bool {
        self.dimension == tension.divergent_dimension
            && self.from_a == tension.stance_a
            && self.from_b == tension.stance_b
            && self.stance.contains(&self.from_a)
            && self.stance.contains(&self.from_b)
    }
}

/// Fused decision both proposals factor through.
///
/// Only the engine constructs these; a failed construction yields no value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synthesis {
    pub id: ContentHash,
    pub content: PositionMap,
    pub preserves_a: bool,
    pub preserves_b: bool,
    pub incorporated_from_a: Vec<String>,
    pub incorporated_from_b: Vec<String>,
    pub transcends: Vec<String>,
    /// Principles of both inputs, carried forward when the synthesis is
    /// fused again.
    pub principles: BTreeSet<String>,
}

impl Synthesis {
    pub(crate) fn digest(content: &PositionMap) -> ContentHash {
        ContentHash::of_json(content)
    }

    /// Structural equality with a proposal's stances.
    pub fn coincides_with(&self, proposal: &Proposal) -> bool {
        self.content == proposal.stances()
    }

    pub fn stance(&self, dimension: &str) -> Option<&str> {
        self.content.get(dimension).map(String::as_str)
    }

    /// `dimension: stance` clauses joined with `; `.
    pub fn summary(&self) -> String {
        self.content
            .iter()
            .map(|(d, s)| format!("{}: {}", d, s))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Re-enter the synthesis as a proposal, e.g. to fuse it with a third.
    pub fn into_proposal(self, id: ProposalId, source: impl Into<String>) -> Proposal {
        let content = self.summary();
        Proposal {
            id,
            source: source.into(),
            content,
            reasoning: format!("synthesis {}", self.id),
            supporting_principles: self.principles.into_iter().collect(),
            positions: self.content,
        }
    }
}

/// Permanent rejection of one synthesis content hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetoRecord {
    pub target_synthesis_id: ContentHash,
    pub reason: String,
    pub issuer: String,
}

/// Fusion run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FusionState {
    Articulated,
    Challenged,
    OverlapFound,
    SynthesisConstructed,
    Verified,
    Impasse,
    Vetoed,
}

impl FusionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FusionState::Verified | FusionState::Impasse | FusionState::Vetoed
        )
    }

    /// Whether `self -> next` is an edge of the run state machine.
    pub fn can_transition_to(&self, next: FusionState) -> bool {
        use FusionState::*;
        matches!(
            (self, next),
            (Articulated, Challenged)
                | (Challenged, OverlapFound)
                | (Challenged, Impasse)
                | (OverlapFound, SynthesisConstructed)
                | (OverlapFound, Impasse)
                | (SynthesisConstructed, Verified)
                | (SynthesisConstructed, Impasse)
                | (SynthesisConstructed, Vetoed)
        )
    }
}

impl fmt::Display for FusionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FusionState::Articulated => "ARTICULATED",
            FusionState::Challenged => "CHALLENGED",
            FusionState::OverlapFound => "OVERLAP_FOUND",
            FusionState::SynthesisConstructed => "SYNTHESIS_CONSTRUCTED",
            FusionState::Verified => "VERIFIED",
            FusionState::Impasse => "IMPASSE",
            FusionState::Vetoed => "VETOED",
        };
        write!(f, "{}", s)
    }
}

/// Why a run ended in [`FusionState::Impasse`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpasseReason {
    NoSharedContext,
    UnresolvableTension(String),
    UniversalPropertyViolated,
    TrivialSynthesis,
}

impl fmt::Display for ImpasseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpasseReason::NoSharedContext => write!(f, "no_shared_context"),
            ImpasseReason::UnresolvableTension(dim) => write!(f, "unresolvable_tension:{}", dim),
            ImpasseReason::UniversalPropertyViolated => write!(f, "universal_property_violated"),
            ImpasseReason::TrivialSynthesis => write!(f, "trivial_synthesis"),
        }
    }
}

/// Terminal outcome of a fusion run. Impasse may be retried with another
/// resolution strategy; a veto may not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionResult {
    Synthesis(Synthesis),
    Impasse { reason: ImpasseReason },
    Vetoed { reason: String, record: VetoRecord },
}

impl FusionResult {
    pub fn state(&self) -> FusionState {
        match self {
            FusionResult::Synthesis(_) => FusionState::Verified,
            FusionResult::Impasse { .. } => FusionState::Impasse,
            FusionResult::Vetoed { .. } => FusionState::Vetoed,
        }
    }

    pub fn synthesis(&self) -> Option<&Synthesis> {
        match self {
            FusionResult::Synthesis(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, FusionResult::Synthesis(_))
    }
}
