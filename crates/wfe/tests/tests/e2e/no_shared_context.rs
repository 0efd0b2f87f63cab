//! End-to-end test: proposals with nothing in common reach an immediate impasse.

use maple_wfe_fusion::{FusionResult, ImpasseReason, NoVeto};
use maple_wfe_tests::{deterministic_engine, proposal};

#[test]
fn empty_overlap_is_immediate_impasse() {
    let mut engine = deterministic_engine(2);
    let a = engine.submit_proposal(proposal(
        "ship-now",
        &["market timing"],
        &[("release", "ship this quarter")],
    ));
    let b = engine.submit_proposal(proposal(
        "research-first",
        &["scientific rigor"],
        &[("release", "publish findings first")],
    ));

    let witnessed = engine.fuse(a, b, &NoVeto).unwrap();
    match witnessed.value() {
        FusionResult::Impasse { reason } => {
            assert_eq!(reason, &ImpasseReason::NoSharedContext);
            assert_eq!(reason.to_string(), "no_shared_context");
        }
        other => panic!("expected impasse, got {:?}", other),
    }
    assert_eq!(witnessed.trace().len(), 2);
    assert_eq!(
        witnessed.trace().last().unwrap().description(),
        "CHALLENGED -> IMPASSE: no_shared_context"
    );
}

#[test]
fn proposals_without_principles_share_nothing() {
    let mut engine = deterministic_engine(2);
    let a = engine.submit_proposal(proposal("a", &[], &[("k", "1")]));
    let b = engine.submit_proposal(proposal("b", &[], &[("k", "2")]));
    let witnessed = engine.fuse(a, b, &NoVeto).unwrap();
    assert!(matches!(
        witnessed.value(),
        FusionResult::Impasse {
            reason: ImpasseReason::NoSharedContext
        }
    ));
}

#[test]
fn impasse_is_not_a_veto() {
    let mut engine = deterministic_engine(2);
    let a = engine.submit_proposal(proposal("a", &["x"], &[("k", "1")]));
    let b = engine.submit_proposal(proposal("b", &["y"], &[("k", "2")]));
    engine.fuse(a, b, &NoVeto).unwrap();
    assert!(engine.veto_ledger().is_empty());
}
