//! End-to-end test: a veto overrides a synthesis that satisfies the
//! universal property, and a revised proposal passes.
//!
//! Verifies that:
//! - has_ambient_tracking rejects the synthesis regardless of its merits
//! - The veto is recorded and blocks the identical synthesis later
//! - Removing the tracking stance yields VERIFIED

use maple_wfe_fusion::{
    AnyVeto, AuthorityVeto, FusionResult, FusionState, NoVeto, Synthesis, VetoPredicate,
};
use maple_wfe_tests::{deterministic_engine, existing_vs_novel, has_ambient_tracking};

#[test]
fn tracking_synthesis_is_vetoed_and_revision_verifies() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let tracked = a
        .clone()
        .with_position("telemetry", "ambient tracking of user sessions");
    let ha = engine.submit_proposal(tracked);
    let hb = engine.submit_proposal(b.clone());

    let vetoed = engine.fuse(ha, hb, &has_ambient_tracking).unwrap();
    match vetoed.value() {
        FusionResult::Vetoed { reason, record } => {
            assert_eq!(reason, "ambient tracking on telemetry");
            assert_eq!(record.issuer, "veto");
        }
        other => panic!("expected VETOED, got {:?}", other),
    }
    assert!(vetoed
        .trace()
        .last()
        .unwrap()
        .description()
        .starts_with("SYNTHESIS_CONSTRUCTED -> VETOED: vetoed by veto"));

    let revised = a.with_position("telemetry", "opt-in usage reporting");
    let hr = engine.submit_proposal(revised);
    let verified = engine.fuse(hr, hb, &has_ambient_tracking).unwrap();
    assert_eq!(verified.value().state(), FusionState::Verified);
    let synthesis = verified.value().synthesis().unwrap();
    assert!(synthesis.preserves_a && synthesis.preserves_b);
    assert_eq!(synthesis.stance("telemetry"), Some("opt-in usage reporting"));
}

#[test]
fn vetoed_synthesis_stays_vetoed() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let ha = engine.submit_proposal(a.with_position("telemetry", "ambient tracking"));
    let hb = engine.submit_proposal(b);

    let board = AuthorityVeto::new("privacy-board", has_ambient_tracking);
    let first = engine.fuse(ha, hb, &board).unwrap();
    let target = match first.value() {
        FusionResult::Vetoed { record, .. } => record.target_synthesis_id.clone(),
        other => panic!("expected VETOED, got {:?}", other),
    };
    assert!(engine.veto_ledger().is_vetoed(&target));

    // No predicate this time; the ledger alone rejects the same synthesis.
    let second = engine.fuse(ha, hb, &NoVeto).unwrap();
    match second.value() {
        FusionResult::Vetoed { record, .. } => {
            assert_eq!(record.issuer, "privacy-board");
            assert_eq!(record.target_synthesis_id, target);
        }
        other => panic!("expected VETOED, got {:?}", other),
    }
}

#[test]
fn composed_predicates_report_first_issuer() {
    let (a, b) = existing_vs_novel();
    let mut engine = deterministic_engine(2);
    let ha = engine.submit_proposal(a.clone());
    let hb = engine.submit_proposal(b.clone());

    let freeze = AuthorityVeto::new("change-freeze", |_: &Synthesis| {
        Some("release freeze".to_string())
    });
    let tracking = AuthorityVeto::new("privacy-board", has_ambient_tracking);
    let any = AnyVeto::new().or(&tracking).or(&freeze);

    let w = engine.fuse(ha, hb, &any).unwrap();
    match w.value() {
        FusionResult::Vetoed { record, .. } => {
            assert_eq!(record.issuer, "change-freeze");
            assert_eq!(record.reason, "release freeze");
        }
        other => panic!("expected VETOED, got {:?}", other),
    }

    // The privacy board alone has nothing against the clean synthesis.
    let clean = deterministic_engine(2).fuse_proposals(&a, &b, &NoVeto);
    let synthesis = clean.value().synthesis().unwrap();
    assert!(tracking.veto(synthesis).is_none());
    assert!(freeze.veto(synthesis).is_some());
}
