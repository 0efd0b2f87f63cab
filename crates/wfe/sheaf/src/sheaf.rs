//! Restriction, compatibility and gluing.

use tracing::{debug, info};

use crate::belief::Belief;
use crate::collaborators::{ContentComparator, ContentSynthesizer};
use crate::config::SheafConfig;
use crate::context::Context;
use crate::error::SheafError;

/// Project `belief` onto `target`.
///
/// Defined only when `target` refines the belief's context. The restricted
/// belief keeps its content, its confidence is multiplied by the configured
/// decay, and its justification gains a note naming the target context.
pub fn restrict<T: Clone>(
    belief: &Belief<T>,
    target: &Context,
    config: &SheafConfig,
) -> Option<Belief<T>> {
    if !target.refines(belief.context()) {
        debug!(
            from = %belief.context(),
            to = %target,
            "Restriction refused: target does not refine source"
        );
        return None;
    }
    let confidence = belief.confidence() * config.restriction_decay;
    let justification = format!(
        "{} [restricted {} -> {}]",
        belief.justification(),
        belief.context(),
        target
    );
    Some(Belief::assemble(
        belief.content().clone(),
        confidence,
        justification,
        target.clone(),
    ))
}

/// True when every pair of beliefs whose contexts overlap agrees on content
/// after both are restricted to the overlap. Pairs with disjoint contexts
/// impose no constraint.
pub fn compatible<T, C>(beliefs: &[&Belief<T>], comparator: &C, config: &SheafConfig) -> bool
where
    T: Clone,
    C: ContentComparator<T> + ?Sized,
{
    for (i, a) in beliefs.iter().enumerate() {
        for b in &beliefs[i + 1..] {
            let Some(overlap) = a.context().overlap(b.context()) else {
                continue;
            };
            let (Some(ra), Some(rb)) = (
                restrict(a, &overlap, config),
                restrict(b, &overlap, config),
            ) else {
                continue;
            };
            if !comparator.agree(ra.content(), rb.content()) {
                debug!(
                    a = %a.context(),
                    b = %b.context(),
                    overlap = %overlap,
                    "Beliefs disagree on overlap"
                );
                return false;
            }
        }
    }
    true
}

/// Glue compatible beliefs into one belief over their covering context.
///
/// Returns `None` for an empty input or when the beliefs are incompatible.
/// Glued confidence is the minimum input confidence and the justification
/// lists every input's justification in order.
pub fn glue<T, C, S>(
    beliefs: &[&Belief<T>],
    comparator: &C,
    synthesizer: &S,
    config: &SheafConfig,
) -> Option<Belief<T>>
where
    T: Clone,
    C: ContentComparator<T> + ?Sized,
    S: ContentSynthesizer<T> + ?Sized,
{
    let cover = Context::covering(beliefs.iter().map(|b| b.context()))?;
    if !compatible(beliefs, comparator, config) {
        return None;
    }

    let contents: Vec<&T> = beliefs.iter().map(|b| b.content()).collect();
    let content = synthesizer.synthesize(&contents);
    let confidence = beliefs
        .iter()
        .map(|b| b.confidence())
        .fold(f64::INFINITY, f64::min);
    let justification = beliefs
        .iter()
        .map(|b| b.justification())
        .collect::<Vec<_>>()
        .join(" | ");

    info!(
        inputs = beliefs.len(),
        context = %cover,
        confidence,
        "Beliefs glued"
    );
    Some(Belief::assemble(content, confidence, justification, cover))
}

/// Opaque reference to a belief held by a [`BeliefSheaf`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeliefHandle(usize);

impl BeliefHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Belief registry bound to one comparator and one synthesizer.
pub struct BeliefSheaf<T> {
    config: SheafConfig,
    comparator: Box<dyn ContentComparator<T>>,
    synthesizer: Box<dyn ContentSynthesizer<T>>,
    beliefs: Vec<Belief<T>>,
}

impl<T: Clone> BeliefSheaf<T> {
    pub fn new(
        comparator: impl ContentComparator<T> + 'static,
        synthesizer: impl ContentSynthesizer<T> + 'static,
    ) -> Self {
        Self {
            config: SheafConfig::default(),
            comparator: Box::new(comparator),
            synthesizer: Box::new(synthesizer),
            beliefs: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: SheafConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SheafConfig {
        &self.config
    }

    pub fn insert(&mut self, belief: Belief<T>) -> BeliefHandle {
        self.beliefs.push(belief);
        BeliefHandle(self.beliefs.len() - 1)
    }

    pub fn get(&self, handle: BeliefHandle) -> Result<&Belief<T>, SheafError> {
        self.beliefs
            .get(handle.0)
            .ok_or(SheafError::UnknownHandle(handle.0))
    }

    pub fn len(&self) -> usize {
        self.beliefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beliefs.is_empty()
    }

    pub fn restrict(
        &self,
        handle: BeliefHandle,
        target: &Context,
    ) -> Result<Option<Belief<T>>, SheafError> {
        Ok(restrict(self.get(handle)?, target, &self.config))
    }

    pub fn compatible(&self, handles: &[BeliefHandle]) -> Result<bool, SheafError> {
        let beliefs = self.resolve(handles)?;
        Ok(compatible(&beliefs, self.comparator.as_ref(), &self.config))
    }

    pub fn glue(&self, handles: &[BeliefHandle]) -> Result<Option<Belief<T>>, SheafError> {
        let beliefs = self.resolve(handles)?;
        Ok(glue(
            &beliefs,
            self.comparator.as_ref(),
            self.synthesizer.as_ref(),
            &self.config,
        ))
    }

    /// Glue and register the result when gluing succeeds.
    pub fn glue_into(
        &mut self,
        handles: &[BeliefHandle],
    ) -> Result<Option<BeliefHandle>, SheafError> {
        Ok(self.glue(handles)?.map(|b| self.insert(b)))
    }

    fn resolve(&self, handles: &[BeliefHandle]) -> Result<Vec<&Belief<T>>, SheafError> {
        handles.iter().map(|h| self.get(*h)).collect()
    }
}
