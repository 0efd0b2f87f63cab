//! Canned disputes for the demo.

use maple_wfe_fusion::{Proposal, ProposalId, Synthesis};

pub struct Scenario {
    pub name: &'static str,
    pub a: Proposal,
    pub b: Proposal,
}

fn proposal(id: &str, principles: &[&str], positions: &[(&str, &str)], reasoning: &str) -> Proposal {
    let content = positions
        .first()
        .map(|(_, s)| s.to_string())
        .unwrap_or_default();
    let mut p = Proposal::new(ProposalId::new(id), format!("{}-team", id), content)
        .with_principles(principles.iter().copied())
        .with_reasoning(reasoning);
    for (dimension, stance) in positions {
        p = p.with_position(*dimension, *stance);
    }
    p
}

/// Reuse the framework or build anew.
pub fn framework_vs_novel() -> Scenario {
    Scenario {
        name: "framework vs novel",
        a: proposal(
            "existing",
            &["working system", "timely delivery", "low risk"],
            &[("approach", "use existing framework")],
            "proven in production",
        ),
        b: proposal(
            "novel",
            &["working system", "timely delivery", "long-term flexibility"],
            &[("approach", "build novel system")],
            "the framework will not scale",
        ),
    }
}

/// Two camps with no common commitment.
pub fn disjoint_goals() -> Scenario {
    Scenario {
        name: "disjoint goals",
        a: proposal(
            "ship",
            &["market timing"],
            &[("release", "ship this quarter")],
            "competitors are close",
        ),
        b: proposal(
            "research",
            &["scientific rigor"],
            &[("release", "publish findings first")],
            "results are not reproduced yet",
        ),
    }
}

/// A plan that quietly tracks users.
pub fn ambient_tracking() -> Scenario {
    let base = framework_vs_novel();
    Scenario {
        name: "ambient tracking",
        a: base
            .a
            .with_position("telemetry", "ambient tracking of user sessions"),
        b: base.b,
    }
}

/// Same plan with consented telemetry.
pub fn revised_tracking() -> Scenario {
    let base = framework_vs_novel();
    Scenario {
        name: "revised telemetry",
        a: base.a.with_position("telemetry", "opt-in usage reporting"),
        b: base.b,
    }
}

pub fn all() -> Vec<Scenario> {
    vec![
        framework_vs_novel(),
        disjoint_goals(),
        ambient_tracking(),
        revised_tracking(),
    ]
}

pub fn privacy_board(synthesis: &Synthesis) -> Option<String> {
    synthesis
        .content
        .iter()
        .find(|(_, stance)| stance.contains("ambient tracking"))
        .map(|(dimension, _)| format!("ambient tracking on {}", dimension))
}
