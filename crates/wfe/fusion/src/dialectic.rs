//! Pure steps of a fusion run: challenge, overlap, tensions and cocone
//! construction. The engine sequences these and witnesses each transition.

use std::collections::BTreeMap;

use maple_wfe_sheaf::Context;

use crate::types::{
    Challenge, ImpasseReason, PositionMap, Proposal, Resolution, Synthesis, Tension,
};

/// The context a proposal argues from: its supporting principles.
pub fn proposal_context(proposal: &Proposal) -> Context {
    Context::of_evidence(proposal.id.as_str(), proposal.supporting_principles.iter().cloned())
}

/// Shared commitments of two proposals, or `None` when they share none.
pub fn shared_context(a: &Proposal, b: &Proposal) -> Option<Context> {
    proposal_context(a).overlap(&proposal_context(b))
}

/// Objections against `target` raised on behalf of `advocate_for`.
pub fn challenge(target: &Proposal, advocate_for: &Proposal) -> Challenge {
    let target_stances = target.stances();
    let advocate_stances = advocate_for.stances();
    let target_principles = target.principles();

    let mut objections = Vec::new();
    for (dim, advocated) in &advocate_stances {
        match target_stances.get(dim) {
            Some(held) if held != advocated => {
                objections.push(format!("{}: '{}' rather than '{}'", dim, advocated, held))
            }
            None => objections.push(format!("silent on {}: '{}'", dim, advocated)),
            _ => {}
        }
    }
    for principle in advocate_for.principles() {
        if !target_principles.contains(&principle) {
            objections.push(format!("unaddressed principle: {}", principle));
        }
    }

    Challenge {
        target: target.id.clone(),
        advocate_for: advocate_for.id.clone(),
        objections,
    }
}

/// Dimensions on which both proposals take different stances, in
/// dimension order.
pub fn find_tensions(a: &Proposal, b: &Proposal, overlap: &Context) -> Vec<Tension> {
    let sb = b.stances();
    a.stances()
        .into_iter()
        .filter_map(|(dim, stance_a)| {
            let stance_b = sb.get(&dim)?;
            (stance_a != *stance_b).then(|| Tension {
                proposal_a: a.id.clone(),
                proposal_b: b.id.clone(),
                divergent_dimension: dim,
                overlap_context: overlap.clone(),
                stance_a,
                stance_b: stance_b.clone(),
            })
        })
        .collect()
}

/// Build the cocone: agreed and one-sided stances carried over, divergent
/// dimensions replaced by their resolutions.
pub fn construct_synthesis(
    a: &Proposal,
    b: &Proposal,
    resolutions: &BTreeMap<String, Resolution>,
) -> Synthesis {
    let sa = a.stances();
    let sb = b.stances();

    let mut content = PositionMap::new();
    let mut incorporated_from_a = Vec::new();
    let mut incorporated_from_b = Vec::new();
    let mut transcends = Vec::new();

    for (dim, stance) in &sa {
        if let Some(r) = resolutions.get(dim) {
            incorporated_from_a.push(format!("{}: {}", dim, r.from_a));
            incorporated_from_b.push(format!("{}: {}", dim, r.from_b));
            transcends.push(format!("{}: {}", dim, r.stance));
            content.insert(dim.clone(), r.stance.clone());
        } else {
            if !sb.contains_key(dim) {
                incorporated_from_a.push(format!("{}: {}", dim, stance));
            }
            content.insert(dim.clone(), stance.clone());
        }
    }
    for (dim, stance) in &sb {
        if !content.contains_key(dim) {
            incorporated_from_b.push(format!("{}: {}", dim, stance));
            content.insert(dim.clone(), stance.clone());
        }
    }

    let mut principles = a.principles();
    principles.extend(b.principles());

    Synthesis {
        id: Synthesis::digest(&content),
        preserves_a: embeds(&sa, &content),
        preserves_b: embeds(&sb, &content),
        content,
        incorporated_from_a,
        incorporated_from_b,
        transcends,
        principles,
    }
}

/// Every stance of `from` survives, possibly qualified, in `into`.
fn embeds(from: &PositionMap, into: &PositionMap) -> bool {
    from.iter()
        .all(|(dim, stance)| into.get(dim).is_some_and(|s| s.contains(stance.as_str())))
}

/// Both inputs embed and the synthesis is neither input alone.
pub fn check_universal_property(
    synthesis: &Synthesis,
    a: &Proposal,
    b: &Proposal,
) -> Result<(), ImpasseReason> {
    if !(synthesis.preserves_a && synthesis.preserves_b) {
        return Err(ImpasseReason::UniversalPropertyViolated);
    }
    if synthesis.coincides_with(a) || synthesis.coincides_with(b) {
        return Err(ImpasseReason::TrivialSynthesis);
    }
    Ok(())
}
