//! End-to-end test: reuse-versus-rebuild fuses into a hedged plan.
//!
//! Verifies that:
//! - Two proposals sharing "working system" and "timely delivery" reach VERIFIED
//! - The synthesis carries a fallback clause and a time-boxed validation clause
//! - Both proposals embed into the synthesis and neither equals it
//! - The run leaves one mark per transition, in transition order

use maple_wfe_fusion::{FusionResult, FusionState, NoVeto};
use maple_wfe_tests::{deterministic_engine, existing_vs_novel};

#[test]
fn existing_framework_and_novel_system_fuse() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let ha = engine.submit_proposal(a.clone());
    let hb = engine.submit_proposal(b.clone());

    let witnessed = engine.fuse(ha, hb, &NoVeto).unwrap();
    let synthesis = match witnessed.value() {
        FusionResult::Synthesis(s) => s,
        other => panic!("expected VERIFIED, got {:?}", other),
    };

    let approach = synthesis.stance("approach").unwrap();
    assert!(approach.contains("fallback"), "{}", approach);
    assert!(approach.contains("time-boxed validation"), "{}", approach);
    assert!(synthesis.preserves_a);
    assert!(synthesis.preserves_b);
    assert!(!synthesis.coincides_with(&a));
    assert!(!synthesis.coincides_with(&b));
    assert_eq!(synthesis.transcends.len(), 1);
    assert!(synthesis.principles.contains("working system"));
    assert!(synthesis.principles.contains("long-term flexibility"));
}

#[test]
fn run_is_witnessed_transition_by_transition() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let ha = engine.submit_proposal(a);
    let hb = engine.submit_proposal(b);
    let witnessed = engine.fuse(ha, hb, &NoVeto).unwrap();

    assert_eq!(witnessed.value().state(), FusionState::Verified);
    let states: Vec<&str> = witnessed
        .trace()
        .iter()
        .map(|m| m.description().split(':').next().unwrap())
        .collect();
    assert_eq!(
        states,
        vec![
            "ARTICULATED -> CHALLENGED",
            "CHALLENGED -> OVERLAP_FOUND",
            "OVERLAP_FOUND -> SYNTHESIS_CONSTRUCTED",
            "SYNTHESIS_CONSTRUCTED -> VERIFIED",
        ]
    );
    assert!(witnessed.trace().marks()[1]
        .description()
        .contains("shared context overlap:"));
    assert!(witnessed.trace().verify().is_ok());
}

#[test]
fn synthesis_reenters_as_a_proposal() {
    let mut engine = deterministic_engine(2);
    let (a, b) = existing_vs_novel();
    let ha = engine.submit_proposal(a);
    let hb = engine.submit_proposal(b);
    let witnessed = engine.fuse(ha, hb, &NoVeto).unwrap();
    let synthesis = witnessed.value().synthesis().unwrap().clone();

    let reentered = synthesis
        .clone()
        .into_proposal(maple_wfe_fusion::ProposalId::new("hedged"), "mediator");
    assert!(synthesis.coincides_with(&reentered));
    assert!(reentered.content.contains("approach: "));

    let json = serde_json::to_string(&synthesis).unwrap();
    let restored: maple_wfe_fusion::Synthesis = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, synthesis);
}
