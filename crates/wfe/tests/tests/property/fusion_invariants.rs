//! Property tests: fusion is non-trivial, vetoes are absolute, and every
//! transition leaves exactly one mark.

use maple_wfe_fusion::{
    FusionEngine, FusionResult, FusionState, ImpasseReason, NoVeto, Proposal, ProposalId,
    Synthesis,
};
use maple_wfe_tests::deterministic_engine;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_proposal(id: &'static str) -> impl Strategy<Value = Proposal> {
    (
        prop::collection::vec(
            prop::sample::select(vec!["safety", "speed", "cost", "clarity"]),
            0..3,
        ),
        prop::collection::btree_map(
            prop::sample::select(vec!["approach", "storage", "rollout"]),
            prop::sample::select(vec!["reuse", "rebuild", "defer", "pilot"]),
            0..3,
        ),
    )
        .prop_map(move |(principles, positions)| {
            let mut p = Proposal::new(ProposalId::new(id), id, format!("{} plan", id))
                .with_principles(principles);
            for (dimension, stance) in positions {
                p = p.with_position(dimension, stance);
            }
            p
        })
}

fn veto_everything(_: &Synthesis) -> Option<String> {
    Some("frozen by policy".to_string())
}

/// The state the run's last mark moved into.
fn last_target(description: &str) -> Option<&str> {
    let (_, rest) = description.split_once(" -> ")?;
    rest.split(':').next()
}

/// Transitions a run takes to reach `result`.
fn expected_marks(result: &FusionResult) -> usize {
    match result {
        FusionResult::Impasse {
            reason: ImpasseReason::NoSharedContext,
        } => 2,
        FusionResult::Impasse {
            reason: ImpasseReason::UnresolvableTension(_),
        } => 3,
        _ => 4,
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A verified synthesis embeds both inputs and equals neither.
    #[test]
    fn verified_synthesis_is_non_trivial(a in arb_proposal("a"), b in arb_proposal("b")) {
        let w = deterministic_engine(4).fuse_proposals(&a, &b, &NoVeto);
        if let FusionResult::Synthesis(s) = w.value() {
            prop_assert!(s.preserves_a && s.preserves_b);
            prop_assert!(!s.coincides_with(&a));
            prop_assert!(!s.coincides_with(&b));
        }
    }

    /// One mark per transition, ending in the reported terminal state.
    #[test]
    fn one_mark_per_transition(a in arb_proposal("a"), b in arb_proposal("b")) {
        let w = deterministic_engine(4).fuse_proposals(&a, &b, &NoVeto);
        let descriptions = w.trace().descriptions();
        prop_assert!(!descriptions.is_empty());
        prop_assert!(descriptions[0].starts_with("ARTICULATED -> CHALLENGED: "));
        prop_assert_eq!(descriptions.len(), expected_marks(w.value()));

        let terminal = w.value().state().to_string();
        prop_assert_eq!(last_target(descriptions[descriptions.len() - 1]), Some(terminal.as_str()));
        prop_assert!(w.trace().verify().is_ok());
        prop_assert!(w
            .trace()
            .marks()
            .windows(2)
            .all(|m| m[0].timestamp().precedes(&m[1].timestamp())));
    }

    /// Once vetoed, the same synthesis is vetoed again with any predicate,
    /// including in a fresh engine seeded with the ledger.
    #[test]
    fn veto_is_absolute(a in arb_proposal("a"), b in arb_proposal("b")) {
        let mut engine = deterministic_engine(4);
        let first = engine.fuse_proposals(&a, &b, &veto_everything);
        if first.value().state() == FusionState::Vetoed {
            let again = engine.fuse_proposals(&a, &b, &NoVeto);
            prop_assert_eq!(again.value().state(), FusionState::Vetoed);

            let mut fresh = FusionEngine::new(engine.config().clone())
                .with_veto_ledger(engine.veto_ledger().clone());
            let replay = fresh.fuse_proposals(&a, &b, &NoVeto);
            prop_assert_eq!(replay.value(), first.value());
        }
    }

    /// Identical inputs under a fixed clock give identical witnessed results.
    #[test]
    fn fusion_is_deterministic(a in arb_proposal("a"), b in arb_proposal("b")) {
        let x = deterministic_engine(4).fuse_proposals(&a, &b, &NoVeto);
        let y = deterministic_engine(4).fuse_proposals(&a, &b, &NoVeto);
        prop_assert!(x.same_witness(&y));
    }
}
