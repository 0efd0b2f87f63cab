//! Executes composition trees into witnessed values.

use maple_wfe_types::{FixedClock, MarkClock, MarkRecorder};
use maple_wfe_witness::Witnessed;

use crate::error::OperadError;
use crate::operators::{Operator, Step};
use crate::tree::CompositionTree;

/// Anything that can execute a composition tree.
///
/// The law verifier checks laws against an executor rather than a concrete
/// interpreter, so alternative semantics can be verified with the same
/// sampler.
pub trait TreeExecutor: Send + Sync {
    fn execute(
        &self,
        tree: &CompositionTree,
        input: i64,
        fills: &[Step],
    ) -> Result<Witnessed<i64>, OperadError>;
}

impl<F> TreeExecutor for F
where
    F: Fn(&CompositionTree, i64, &[Step]) -> Result<Witnessed<i64>, OperadError> + Send + Sync,
{
    fn execute(
        &self,
        tree: &CompositionTree,
        input: i64,
        fills: &[Step],
    ) -> Result<Witnessed<i64>, OperadError> {
        self(tree, input, fills)
    }
}

/// Interpreter for [`CompositionTree`]s over `i64` states.
///
/// Hole `k` runs `fills[k]` when present and passes its input through
/// unchanged otherwise. Every executed step, branch decision and annotation
/// appends one mark; `Identity`, `Sequence` and `Parallel` add none of their
/// own. With the default fixed clock, executing the same tree twice yields
/// identical traces.
pub struct Interpreter {
    clock: Box<dyn MarkClock>,
    actor: String,
}

impl Interpreter {
    pub fn new(clock: impl MarkClock + 'static, actor: impl Into<String>) -> Self {
        Self {
            clock: Box::new(clock),
            actor: actor.into(),
        }
    }

    /// Execute `tree` on `input`, filling holes from `fills`.
    ///
    /// Malformed trees are rejected with
    /// [`OperadError::ChildCountMismatch`] before any step runs.
    pub fn execute(
        &self,
        tree: &CompositionTree,
        input: i64,
        fills: &[Step],
    ) -> Result<Witnessed<i64>, OperadError> {
        tree.validate()?;
        let mut recorder = MarkRecorder::new(self.clock.as_ref(), self.actor.clone());
        Ok(self.run(tree, input, 0, fills, &mut recorder))
    }

    fn run(
        &self,
        tree: &CompositionTree,
        x: i64,
        hole_base: usize,
        fills: &[Step],
        rec: &mut MarkRecorder<'_>,
    ) -> Witnessed<i64> {
        match tree {
            CompositionTree::Hole => match fills.get(hole_base) {
                Some(step) => apply_step(step, x, &format!("hole[{}] {}", hole_base, step), rec),
                None => Witnessed::pure(x),
            },
            CompositionTree::Step(step) => apply_step(step, x, &step.to_string(), rec),
            CompositionTree::Node { op, children } => {
                let bases = child_bases(children, hole_base);
                match op {
                    Operator::Identity => self.run(&children[0], x, bases[0], fills, rec),
                    Operator::Sequence => {
                        let first = self.run(&children[0], x, bases[0], fills, rec);
                        first.bind(|v| self.run(&children[1], v, bases[1], fills, rec))
                    }
                    Operator::Parallel => {
                        let left = self.run(&children[0], x, bases[0], fills, rec);
                        let right = self.run(&children[1], x, bases[1], fills, rec);
                        left.bind(|a| right.map(|b| a.wrapping_add(b)))
                    }
                    Operator::ConditionalBranch { guard } => {
                        let taken = if guard.holds(x) { 0 } else { 1 };
                        let arm = if taken == 0 { "then" } else { "else" };
                        let decision = rec.record_payload(
                            format!("branch[{}] {}", guard, arm),
                            &(x, taken),
                        );
                        Witnessed::marked(x, decision)
                            .bind(|v| self.run(&children[taken], v, bases[taken], fills, rec))
                    }
                    Operator::FixedPointIterate { max_iterations } => {
                        let mut acc = Witnessed::pure(x);
                        for _ in 0..*max_iterations {
                            let current = *acc.value();
                            let next = self.run(&children[0], current, bases[0], fills, rec);
                            let reached = *next.value() == current;
                            acc = acc.bind(|_| next);
                            if reached {
                                break;
                            }
                        }
                        acc
                    }
                    Operator::TraceAnnotate { label } => {
                        let inner = self.run(&children[0], x, bases[0], fills, rec);
                        let value = *inner.value();
                        let mark = rec.record_payload(format!("annotate {}", label), &value);
                        inner.tell(mark)
                    }
                }
            }
        }
    }
}

impl TreeExecutor for Interpreter {
    fn execute(
        &self,
        tree: &CompositionTree,
        input: i64,
        fills: &[Step],
    ) -> Result<Witnessed<i64>, OperadError> {
        Interpreter::execute(self, tree, input, fills)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(FixedClock(0), "operad-interpreter")
    }
}

fn apply_step(step: &Step, x: i64, description: &str, rec: &mut MarkRecorder<'_>) -> Witnessed<i64> {
    let y = step.apply(x);
    let mark = rec.record_payload(description, &(x, y));
    Witnessed::marked(y, mark)
}

/// Index of the first hole of each child, given the node's first hole.
fn child_bases(children: &[CompositionTree], hole_base: usize) -> Vec<usize> {
    let mut bases = Vec::with_capacity(children.len());
    let mut next = hole_base;
    for child in children {
        bases.push(next);
        next += child.arity();
    }
    bases
}
