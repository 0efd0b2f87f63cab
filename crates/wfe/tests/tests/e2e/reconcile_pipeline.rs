//! End-to-end test: the sheaf-first pipeline, N-way folding, and
//! handle-based submission.

use maple_wfe_fusion::{
    FusionError, FusionResult, FusionState, ImpasseReason, NoVeto, Reconciliation,
    CONTENT_DIMENSION,
};
use maple_wfe_tests::{deterministic_engine, existing_vs_novel, proposal};

#[test]
fn compatible_proposals_glue_without_fusion() {
    let mut engine = deterministic_engine(2);
    let a = engine.submit_proposal(proposal(
        "storage",
        &["durability"],
        &[("storage", "postgres")],
    ));
    let b = engine.submit_proposal(proposal(
        "rollout",
        &["durability"],
        &[("rollout", "canary")],
    ));

    let witnessed = engine.reconcile(a, b, &NoVeto).unwrap();
    assert_eq!(witnessed.trace().len(), 1);
    match witnessed.value() {
        Reconciliation::Glued(belief) => {
            assert_eq!(belief.content().get("storage").map(String::as_str), Some("postgres"));
            assert_eq!(belief.content().get("rollout").map(String::as_str), Some("canary"));
            assert!(belief.content().get(CONTENT_DIMENSION).is_none());
        }
        other => panic!("expected glue, got {:?}", other),
    }
    assert!(witnessed.trace().marks()[0]
        .description()
        .ends_with("compatible, glued"));
}

#[test]
fn conflicting_proposals_go_through_fusion() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let ha = engine.submit_proposal(a);
    let hb = engine.submit_proposal(b);

    let witnessed = engine.reconcile(ha, hb, &NoVeto).unwrap();
    match witnessed.value() {
        Reconciliation::Fused(result) => assert!(result.is_verified()),
        other => panic!("expected fusion, got {:?}", other),
    }
    let descriptions = witnessed.trace().descriptions();
    assert_eq!(descriptions.len(), 5);
    assert!(descriptions[0].ends_with("incompatible, fusing"));
    assert!(descriptions[1].starts_with("ARTICULATED -> CHALLENGED"));
    assert!(witnessed.trace().verify().is_ok());
}

#[test]
fn conflicting_proposals_without_shared_principles_are_not_glued() {
    let mut engine = deterministic_engine(2);
    let a = engine.submit_proposal(proposal(
        "existing",
        &["speed"],
        &[("approach", "use existing framework")],
    ));
    let b = engine.submit_proposal(proposal(
        "novel",
        &["flexibility"],
        &[("approach", "build novel system")],
    ));

    let witnessed = engine.reconcile(a, b, &NoVeto).unwrap();
    assert_eq!(
        witnessed.value(),
        &Reconciliation::Fused(FusionResult::Impasse {
            reason: ImpasseReason::NoSharedContext
        })
    );
    let descriptions = witnessed.trace().descriptions();
    assert_eq!(descriptions.len(), 3);
    assert!(descriptions[0].ends_with("incompatible, fusing"));
    assert!(descriptions[2].ends_with("IMPASSE: no_shared_context"));
}

#[test]
fn three_way_fusion_folds_left() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let c = proposal(
        "managed",
        &["timely delivery"],
        &[("approach", "buy managed service")],
    );
    let handles = [
        engine.submit_proposal(a),
        engine.submit_proposal(b),
        engine.submit_proposal(c),
    ];
    assert_eq!(engine.proposal_count(), 3);

    let witnessed = engine.fuse_all(&handles, &NoVeto).unwrap();
    assert_eq!(witnessed.value().state(), FusionState::Verified);
    assert_eq!(witnessed.trace().len(), 8);

    let approach = witnessed.value().synthesis().unwrap().stance("approach").unwrap();
    assert!(approach.contains("buy managed service"), "{}", approach);
    assert!(approach.contains("build novel system"), "{}", approach);
    assert!(approach.contains("use existing framework"), "{}", approach);
}

#[test]
fn fold_stops_at_first_impasse() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let stranger = proposal("stranger", &["unrelated goal"], &[("approach", "do nothing")]);
    let handles = [
        engine.submit_proposal(a),
        engine.submit_proposal(stranger),
        engine.submit_proposal(b),
    ];

    let witnessed = engine.fuse_all(&handles, &NoVeto).unwrap();
    assert!(matches!(witnessed.value(), FusionResult::Impasse { .. }));
    assert_eq!(witnessed.trace().len(), 2);
}

#[test]
fn handles_are_checked() {
    let mut engine = deterministic_engine(2);
    let (a, _) = existing_vs_novel();
    let only = engine.submit_proposal(a.clone());
    assert_eq!(engine.proposal(only).unwrap(), &a);

    let mut other = deterministic_engine(2);
    other.submit_proposal(a.clone());
    let foreign = other.submit_proposal(a);
    assert!(matches!(
        engine.fuse(only, foreign, &NoVeto),
        Err(FusionError::UnknownProposal(1))
    ));
    assert!(matches!(
        engine.fuse_all(&[only], &NoVeto),
        Err(FusionError::TooFewProposals(1))
    ));
}
