//! The fusion run state machine.

use std::collections::BTreeMap;

use maple_wfe_sheaf::{
    compatible, glue, Belief, ConsistentMapComparator, ContentComparator, MapUnionSynthesizer,
    SheafConfig,
};
use maple_wfe_types::{MarkClock, MarkRecorder, SystemClock, Trace};
use maple_wfe_witness::{Branch, Witnessed};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::FusionConfig;
use crate::dialectic::{
    challenge, check_universal_property, construct_synthesis, find_tensions, proposal_context,
    shared_context,
};
use crate::error::FusionError;
use crate::strategy::{ResolutionStrategy, TimeboxedFallbackStrategy};
use crate::types::{
    FusionResult, FusionState, ImpasseReason, PositionMap, Proposal, ProposalHandle, ProposalId,
    Resolution, Tension,
};
use crate::veto::{VetoLedger, VetoPredicate};

/// Outcome of [`FusionEngine::reconcile`].
#[derive(Clone, Debug, PartialEq)]
pub enum Reconciliation {
    /// The proposals were compatible and glued without argument.
    Glued(Belief<PositionMap>),
    /// The proposals conflicted and went through a fusion run.
    Fused(FusionResult),
}

/// Dialectical fusion engine.
///
/// Run pipeline:
/// 1. Challenge each proposal on behalf of the other
/// 2. Find the shared context (impasse when there is none)
/// 3. Resolve every tension (impasse on the first unresolvable one)
/// 4. Construct the synthesis
/// 5. Veto check, then the universal property
///
/// Every transition appends exactly one mark, `"FROM -> TO: rationale"`.
/// Vetoes are recorded in the engine's [`VetoLedger`] and apply to every
/// later run that constructs the same synthesis.
pub struct FusionEngine {
    config: FusionConfig,
    clock: Box<dyn MarkClock>,
    strategy: Box<dyn ResolutionStrategy>,
    sheaf_config: SheafConfig,
    proposals: Vec<Proposal>,
    ledger: VetoLedger,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            clock: Box::new(SystemClock),
            strategy: Box::new(TimeboxedFallbackStrategy::default()),
            sheaf_config: SheafConfig::default(),
            proposals: Vec::new(),
            ledger: VetoLedger::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl MarkClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_strategy(mut self, strategy: impl ResolutionStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn with_sheaf_config(mut self, config: SheafConfig) -> Self {
        self.sheaf_config = config;
        self
    }

    /// Seed the ledger, e.g. with records persisted by an earlier process.
    pub fn with_veto_ledger(mut self, ledger: VetoLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn veto_ledger(&self) -> &VetoLedger {
        &self.ledger
    }

    /// Register a proposal. No side effects beyond assigning a handle.
    pub fn submit_proposal(&mut self, proposal: Proposal) -> ProposalHandle {
        debug!(proposal = %proposal.id, source = %proposal.source, "Proposal submitted");
        self.proposals.push(proposal);
        ProposalHandle(self.proposals.len() - 1)
    }

    pub fn proposal(&self, handle: ProposalHandle) -> Result<&Proposal, FusionError> {
        self.proposals
            .get(handle.0)
            .ok_or(FusionError::UnknownProposal(handle.0))
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Fuse two registered proposals.
    pub fn fuse(
        &mut self,
        a: ProposalHandle,
        b: ProposalHandle,
        veto: &dyn VetoPredicate,
    ) -> Result<Witnessed<FusionResult>, FusionError> {
        let a = self.proposal(a)?.clone();
        let b = self.proposal(b)?.clone();
        Ok(self.fuse_proposals(&a, &b, veto))
    }

    /// Fuse two proposals without registering them.
    pub fn fuse_proposals(
        &mut self,
        a: &Proposal,
        b: &Proposal,
        veto: &dyn VetoPredicate,
    ) -> Witnessed<FusionResult> {
        let outcome = {
            let mut rec = MarkRecorder::new(self.clock.as_ref(), self.config.actor.clone());
            self.run(a, b, veto, &mut rec)
        };
        self.absorb(outcome.value());
        outcome
    }

    /// Fold `handles` left to right: each verified synthesis re-enters as a
    /// proposal and is fused with the next. Stops at the first impasse or
    /// veto. Traces of all runs are concatenated in order.
    pub fn fuse_all(
        &mut self,
        handles: &[ProposalHandle],
        veto: &dyn VetoPredicate,
    ) -> Result<Witnessed<FusionResult>, FusionError> {
        if handles.len() < 2 {
            return Err(FusionError::TooFewProposals(handles.len()));
        }
        let proposals = handles
            .iter()
            .map(|h| self.proposal(*h).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        let outcome = {
            let mut rec = MarkRecorder::new(self.clock.as_ref(), self.config.actor.clone());
            let mut acc = self.run(&proposals[0], &proposals[1], veto, &mut rec);
            for (round, next) in proposals.iter().enumerate().skip(2) {
                let current = match acc.value() {
                    FusionResult::Synthesis(s) => s.clone().into_proposal(
                        ProposalId::new(format!("synthesis-{}", round - 1)),
                        self.config.actor.clone(),
                    ),
                    _ => break,
                };
                acc = acc.bind(|_| self.run(&current, next, veto, &mut rec));
            }
            acc
        };
        self.absorb(outcome.value());
        info!(
            proposals = handles.len(),
            result = %outcome.value().state(),
            marks = outcome.trace().len(),
            "N-way fusion finished"
        );
        Ok(outcome)
    }

    /// Try the sheaf first: compatible proposals glue directly; conflicting
    /// ones go through a fusion run. One mark records the decision.
    ///
    /// Proposals that take different stances on a shared dimension never
    /// glue, even when their principle contexts are disjoint and the sheaf
    /// has no overlap to compare them on.
    pub fn reconcile(
        &mut self,
        a: ProposalHandle,
        b: ProposalHandle,
        veto: &dyn VetoPredicate,
    ) -> Result<Witnessed<Reconciliation>, FusionError> {
        let a = self.proposal(a)?.clone();
        let b = self.proposal(b)?.clone();
        let belief_a = as_belief(&a);
        let belief_b = as_belief(&b);
        let beliefs = [&belief_a, &belief_b];

        let outcome = {
            let mut rec = MarkRecorder::new(self.clock.as_ref(), self.config.actor.clone());
            let ids = (&a.id, &b.id);
            let consistent = ConsistentMapComparator.agree(belief_a.content(), belief_b.content());
            let glued = if consistent
                && compatible(&beliefs, &ConsistentMapComparator, &self.sheaf_config)
            {
                glue(
                    &beliefs,
                    &ConsistentMapComparator,
                    &MapUnionSynthesizer,
                    &self.sheaf_config,
                )
            } else {
                None
            };
            match glued {
                Some(belief) => {
                    let mark = rec.record_payload(
                        format!("sheaf: {} and {} compatible, glued", a.id, b.id),
                        &ids,
                    );
                    Witnessed::marked(Reconciliation::Glued(belief), mark)
                }
                None => {
                    let mark = rec.record_payload(
                        format!("sheaf: {} and {} incompatible, fusing", a.id, b.id),
                        &ids,
                    );
                    Witnessed::marked((), mark).bind(|_| {
                        self.run(&a, &b, veto, &mut rec)
                            .map(Reconciliation::Fused)
                    })
                }
            }
        };
        if let Reconciliation::Fused(result) = outcome.value() {
            self.absorb(result);
        }
        Ok(outcome)
    }

    fn run(
        &self,
        a: &Proposal,
        b: &Proposal,
        veto: &dyn VetoPredicate,
        rec: &mut MarkRecorder<'_>,
    ) -> Witnessed<FusionResult> {
        let mut run = Run::new(rec);

        let against_a = challenge(a, b);
        let against_b = challenge(b, a);
        run.advance(
            FusionState::Challenged,
            format!(
                "{} objections against {}, {} against {}",
                against_a.objections.len(),
                a.id,
                against_b.objections.len(),
                b.id
            ),
            &(&against_a, &against_b),
        );

        let Some(overlap) = shared_context(a, b) else {
            return run.impasse(ImpasseReason::NoSharedContext, &(&a.id, &b.id));
        };
        run.advance(
            FusionState::OverlapFound,
            format!("shared context {}", overlap),
            overlap.scope(),
        );

        let tensions = find_tensions(a, b, &overlap);
        let mut resolutions = BTreeMap::new();
        for tension in &tensions {
            match self.resolve(tension) {
                Some(resolution) => {
                    resolutions.insert(tension.divergent_dimension.clone(), resolution);
                }
                None => {
                    let dimension = tension.divergent_dimension.clone();
                    return run.impasse(ImpasseReason::UnresolvableTension(dimension), tension);
                }
            }
        }

        let synthesis = construct_synthesis(a, b, &resolutions);
        run.advance(
            FusionState::SynthesisConstructed,
            format!(
                "{} tension(s) resolved by {}, synthesis {}",
                tensions.len(),
                self.strategy.name(),
                synthesis.id
            ),
            &resolutions,
        );

        let vetoed = self
            .ledger
            .veto(&synthesis)
            .or_else(|| veto.veto(&synthesis));
        if let Some(record) = vetoed {
            run.advance(
                FusionState::Vetoed,
                format!("vetoed by {}: {}", record.issuer, record.reason),
                &record,
            );
            let reason = record.reason.clone();
            return run.finish(FusionResult::Vetoed { reason, record });
        }

        if let Err(reason) = check_universal_property(&synthesis, a, b) {
            return run.impasse(reason, &synthesis.id);
        }

        run.advance(
            FusionState::Verified,
            "synthesis embeds both proposals and transcends each".to_string(),
            &synthesis.id,
        );
        info!(a = %a.id, b = %b.id, synthesis = %synthesis.id, "Fusion verified");
        run.finish(FusionResult::Synthesis(synthesis))
    }

    /// First embedding resolution in attempt order, within the attempt cap.
    fn resolve(&self, tension: &Tension) -> Option<Resolution> {
        let candidates = (0..self.config.max_resolution_attempts)
            .filter_map(|attempt| self.strategy.propose(tension, attempt))
            .map(Witnessed::pure)
            .collect();
        Branch::from_paths(candidates)
            .prune(|r: &Resolution| r.embeds(tension))
            .best(|_| 0.0)
            .map(Witnessed::into_value)
    }

    fn absorb(&mut self, result: &FusionResult) {
        if let FusionResult::Vetoed { record, .. } = result {
            self.ledger.record(record.clone());
        }
    }
}

fn as_belief(proposal: &Proposal) -> Belief<PositionMap> {
    let justification = if proposal.reasoning.is_empty() {
        proposal.content.clone()
    } else {
        proposal.reasoning.clone()
    };
    Belief::certain(proposal.stances(), justification, proposal_context(proposal))
}

/// One fusion run: current state plus the marks of its transitions.
struct Run<'r, 'c> {
    rec: &'r mut MarkRecorder<'c>,
    state: FusionState,
    trace: Trace,
}

impl<'r, 'c> Run<'r, 'c> {
    fn new(rec: &'r mut MarkRecorder<'c>) -> Self {
        Self {
            rec,
            state: FusionState::Articulated,
            trace: Trace::new(),
        }
    }

    fn advance<P: Serialize + ?Sized>(&mut self, to: FusionState, rationale: String, payload: &P) {
        debug_assert!(self.state.can_transition_to(to));
        let description = format!("{} -> {}: {}", self.state, to, rationale);
        debug!(from = %self.state, to = %to, rationale = %rationale, "Fusion transition");
        self.trace.push(self.rec.record_payload(description, payload));
        self.state = to;
    }

    fn impasse<P: Serialize + ?Sized>(
        mut self,
        reason: ImpasseReason,
        payload: &P,
    ) -> Witnessed<FusionResult> {
        self.advance(FusionState::Impasse, reason.to_string(), payload);
        info!(reason = %reason, "Fusion impasse");
        self.finish(FusionResult::Impasse { reason })
    }

    fn finish(self, result: FusionResult) -> Witnessed<FusionResult> {
        Witnessed::new(result, self.trace)
    }
}
