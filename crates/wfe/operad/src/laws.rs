//! Seeded, execution-based verification of the operad laws.
//!
//! For each law the verifier draws random composition trees of bounded
//! depth, random inputs and random hole fills, builds both sides of the law
//! and executes them. Sides must agree on the value **and** on the trace,
//! mark for mark.
//!
//! The plugging laws exercise [`compose`]; their two sides usually come out
//! as the same tree, so they catch substitution bugs rather than
//! interpreter bugs.
//!
//! | Law | Statement |
//! |-----|-----------|
//! | Associativity | `(a ∘ᵢ b) ∘ᵢ₊ⱼ c = a ∘ᵢ (b ∘ⱼ c)` |
//! | Left identity | `id ∘₀ a = a` |
//! | Right identity | `a ∘ᵢ id = a` |
//! | Interchange | `(a ∘ᵢ b) ∘ₖ₊ₘ₋₁ c = (a ∘ₖ c) ∘ᵢ b` for `i < k`, `m = arity(b)` |
//!
//! The operator laws compare structurally different trees, so they only
//! pass if the executor gives the operators their intended meaning.
//!
//! | Law | Statement |
//! |-----|-----------|
//! | Sequence associativity | `Seq(Seq(x, y), z) = Seq(x, Seq(y, z))` |
//! | Parallel associativity | `Par(Par(x, y), z) = Par(x, Par(y, z))` |
//! | Sequence unit | `Seq(Identity(x), y) = Seq(x, Identity(y))` |

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::OperadError;
use crate::interpreter::{Interpreter, TreeExecutor};
use crate::operators::{Guard, Operator, Step};
use crate::tree::{compose, CompositionTree};

/// The laws checked by [`LawVerifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperadLaw {
    Associativity,
    LeftIdentity,
    RightIdentity,
    Interchange,
    SequenceAssociativity,
    ParallelAssociativity,
    SequenceUnit,
}

impl OperadLaw {
    pub fn all() -> [OperadLaw; 7] {
        [
            Self::Associativity,
            Self::LeftIdentity,
            Self::RightIdentity,
            Self::Interchange,
            Self::SequenceAssociativity,
            Self::ParallelAssociativity,
            Self::SequenceUnit,
        ]
    }
}

impl fmt::Display for OperadLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Associativity => write!(f, "associativity"),
            Self::LeftIdentity => write!(f, "left identity"),
            Self::RightIdentity => write!(f, "right identity"),
            Self::Interchange => write!(f, "interchange"),
            Self::SequenceAssociativity => write!(f, "sequence associativity"),
            Self::ParallelAssociativity => write!(f, "parallel associativity"),
            Self::SequenceUnit => write!(f, "sequence unit"),
        }
    }
}

/// Verification parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LawCheckConfig {
    /// RNG seed; a report is reproducible from it.
    pub seed: u64,
    /// Generated cases per law.
    pub sample_count: usize,
    /// Maximum depth of each generated tree.
    pub max_depth: usize,
}

impl Default for LawCheckConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            sample_count: 100,
            max_depth: 3,
        }
    }
}

impl LawCheckConfig {
    pub fn new(seed: u64, sample_count: usize) -> Self {
        Self {
            seed,
            sample_count,
            ..Self::default()
        }
    }
}

/// A failing case, kept with everything needed to replay it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Counterexample {
    pub law: OperadLaw,
    pub case: usize,
    pub lhs: CompositionTree,
    pub rhs: CompositionTree,
    pub input: i64,
    pub fills: Vec<Step>,
    pub detail: String,
}

/// Result of checking one law.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LawOutcome {
    pub law: OperadLaw,
    pub cases_run: usize,
    pub counterexamples: Vec<Counterexample>,
}

impl LawOutcome {
    pub fn holds(&self) -> bool {
        self.counterexamples.is_empty()
    }
}

/// Aggregate report of a verification run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LawReport {
    pub seed: u64,
    pub sample_count: usize,
    pub outcomes: Vec<LawOutcome>,
}

impl LawReport {
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(LawOutcome::holds)
    }

    pub fn outcome(&self, law: OperadLaw) -> Option<&LawOutcome> {
        self.outcomes.iter().find(|o| o.law == law)
    }

    pub fn total_cases(&self) -> usize {
        self.outcomes.iter().map(|o| o.cases_run).sum()
    }

    pub fn counterexample_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.counterexamples.len()).sum()
    }

    /// Turn the first failing law into [`OperadError::LawViolation`].
    pub fn ensure_holds(&self) -> Result<(), OperadError> {
        match self.outcomes.iter().find(|o| !o.holds()) {
            None => Ok(()),
            Some(outcome) => {
                let first = &outcome.counterexamples[0];
                Err(OperadError::LawViolation {
                    law: outcome.law.to_string(),
                    failures: outcome.counterexamples.len(),
                    cases: outcome.cases_run,
                    detail: format!(
                        "case {}: {} vs {} on input {}: {}",
                        first.case, first.lhs, first.rhs, first.input, first.detail
                    ),
                })
            }
        }
    }
}

/// Runs law checks against a [`TreeExecutor`], by default the
/// [`Interpreter`].
pub struct LawVerifier {
    config: LawCheckConfig,
    executor: Box<dyn TreeExecutor>,
}

impl LawVerifier {
    pub fn new(config: LawCheckConfig) -> Self {
        Self {
            config,
            executor: Box::new(Interpreter::default()),
        }
    }

    pub fn with_executor(mut self, executor: impl TreeExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    pub fn config(&self) -> &LawCheckConfig {
        &self.config
    }

    /// Execute both sides and compare value and trace.
    pub fn agree(
        &self,
        lhs: &CompositionTree,
        rhs: &CompositionTree,
        input: i64,
        fills: &[Step],
    ) -> Result<(), String> {
        let left = self
            .executor
            .execute(lhs, input, fills)
            .map_err(|e| format!("execution failed: {}", e))?;
        let right = self
            .executor
            .execute(rhs, input, fills)
            .map_err(|e| format!("execution failed: {}", e))?;
        if left.value() != right.value() {
            return Err(format!("value {} != {}", left.value(), right.value()));
        }
        let (lt, rt) = (left.trace(), right.trace());
        let longest = lt.len().max(rt.len());
        if let Some(i) = (0..longest).find(|&i| lt.marks().get(i) != rt.marks().get(i)) {
            return Err(format!(
                "trace diverged at mark {} ({} vs {} marks)",
                i,
                lt.len(),
                rt.len()
            ));
        }
        Ok(())
    }

    /// Run every law `sample_count` times.
    pub fn verify(&self) -> LawReport {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let outcomes = OperadLaw::all()
            .into_iter()
            .map(|law| self.check_law(law, &mut rng))
            .collect::<Vec<_>>();

        let report = LawReport {
            seed: self.config.seed,
            sample_count: self.config.sample_count,
            outcomes,
        };
        if report.is_clean() {
            info!(
                seed = report.seed,
                cases = report.total_cases(),
                "Operad laws hold"
            );
        } else {
            warn!(
                seed = report.seed,
                counterexamples = report.counterexample_count(),
                "Operad law violations found"
            );
        }
        report
    }

    fn check_law(&self, law: OperadLaw, rng: &mut StdRng) -> LawOutcome {
        let mut counterexamples = Vec::new();
        for case in 0..self.config.sample_count {
            let (lhs, rhs) = match self.draw_sides(law, rng) {
                Ok(sides) => sides,
                Err(e) => {
                    counterexamples.push(Counterexample {
                        law,
                        case,
                        lhs: CompositionTree::Hole,
                        rhs: CompositionTree::Hole,
                        input: 0,
                        fills: Vec::new(),
                        detail: format!("composition failed: {}", e),
                    });
                    continue;
                }
            };
            let input = rng.gen_range(-1000..=1000);
            let fills = (0..lhs.arity()).map(|_| random_step(rng)).collect::<Vec<_>>();
            if let Err(detail) = self.agree(&lhs, &rhs, input, &fills) {
                warn!(law = %law, case, detail = %detail, "Counterexample");
                counterexamples.push(Counterexample {
                    law,
                    case,
                    lhs,
                    rhs,
                    input,
                    fills,
                    detail,
                });
            }
        }
        debug!(law = %law, cases = self.config.sample_count, failures = counterexamples.len(), "Law checked");
        LawOutcome {
            law,
            cases_run: self.config.sample_count,
            counterexamples,
        }
    }

    fn draw_sides(
        &self,
        law: OperadLaw,
        rng: &mut StdRng,
    ) -> Result<(CompositionTree, CompositionTree), OperadError> {
        let depth = self.config.max_depth;
        match law {
            OperadLaw::Associativity => {
                let a = random_open_tree(rng, depth);
                let b = random_open_tree(rng, depth);
                let c = random_tree(rng, depth);
                let i = rng.gen_range(0..a.arity());
                let j = rng.gen_range(0..b.arity());
                associativity_sides(&a, &b, &c, i, j)
            }
            OperadLaw::LeftIdentity => Ok(left_identity_sides(&random_tree(rng, depth))),
            OperadLaw::RightIdentity => {
                let a = random_open_tree(rng, depth);
                let i = rng.gen_range(0..a.arity());
                right_identity_sides(&a, i)
            }
            OperadLaw::Interchange => {
                let a = random_binary_open_tree(rng, depth);
                let b = random_tree(rng, depth);
                let c = random_tree(rng, depth);
                let k = rng.gen_range(1..a.arity());
                let i = rng.gen_range(0..k);
                interchange_sides(&a, &b, &c, i, k)
            }
            OperadLaw::SequenceAssociativity => {
                let (x, y, z) = (
                    random_tree(rng, depth),
                    random_tree(rng, depth),
                    random_tree(rng, depth),
                );
                Ok(sequence_associativity_sides(&x, &y, &z))
            }
            OperadLaw::ParallelAssociativity => {
                let (x, y, z) = (
                    random_tree(rng, depth),
                    random_tree(rng, depth),
                    random_tree(rng, depth),
                );
                Ok(parallel_associativity_sides(&x, &y, &z))
            }
            OperadLaw::SequenceUnit => {
                let (x, y) = (random_tree(rng, depth), random_tree(rng, depth));
                Ok(sequence_unit_sides(&x, &y))
            }
        }
    }
}

/// Verify every law with `sample_count` generated cases each.
pub fn verify_operad_laws(seed: u64, sample_count: usize) -> LawReport {
    verify_with(&LawCheckConfig::new(seed, sample_count))
}

pub fn verify_with(config: &LawCheckConfig) -> LawReport {
    LawVerifier::new(config.clone()).verify()
}

/// `((a ∘ᵢ b) ∘ᵢ₊ⱼ c, a ∘ᵢ (b ∘ⱼ c))`
pub fn associativity_sides(
    a: &CompositionTree,
    b: &CompositionTree,
    c: &CompositionTree,
    i: usize,
    j: usize,
) -> Result<(CompositionTree, CompositionTree), OperadError> {
    let lhs = compose(&compose(a, &[b.clone()], i)?, &[c.clone()], i + j)?;
    let rhs = compose(a, &[compose(b, &[c.clone()], j)?], i)?;
    Ok((lhs, rhs))
}

/// `(id ∘₀ a, a)`
pub fn left_identity_sides(a: &CompositionTree) -> (CompositionTree, CompositionTree) {
    let lhs = CompositionTree::Node {
        op: Operator::Identity,
        children: vec![a.clone()],
    };
    (lhs, a.clone())
}

/// `(a ∘ᵢ id, a)`
pub fn right_identity_sides(
    a: &CompositionTree,
    i: usize,
) -> Result<(CompositionTree, CompositionTree), OperadError> {
    Ok((compose(a, &[CompositionTree::identity()], i)?, a.clone()))
}

/// `((a ∘ᵢ b) ∘ₖ₊ₘ₋₁ c, (a ∘ₖ c) ∘ᵢ b)` for `i < k`.
pub fn interchange_sides(
    a: &CompositionTree,
    b: &CompositionTree,
    c: &CompositionTree,
    i: usize,
    k: usize,
) -> Result<(CompositionTree, CompositionTree), OperadError> {
    let shifted = (k + b.arity()).checked_sub(1).ok_or(OperadError::ArityMismatch {
        arity: a.arity(),
        position: k,
        supplied: 1,
    })?;
    let lhs = compose(&compose(a, &[b.clone()], i)?, &[c.clone()], shifted)?;
    let rhs = compose(&compose(a, &[c.clone()], k)?, &[b.clone()], i)?;
    Ok((lhs, rhs))
}

fn binary(op: Operator, left: CompositionTree, right: CompositionTree) -> CompositionTree {
    CompositionTree::Node {
        op,
        children: vec![left, right],
    }
}

fn wrap_identity(tree: &CompositionTree) -> CompositionTree {
    CompositionTree::Node {
        op: Operator::Identity,
        children: vec![tree.clone()],
    }
}

/// `(Seq(Seq(x, y), z), Seq(x, Seq(y, z)))`
pub fn sequence_associativity_sides(
    x: &CompositionTree,
    y: &CompositionTree,
    z: &CompositionTree,
) -> (CompositionTree, CompositionTree) {
    let lhs = binary(
        Operator::Sequence,
        binary(Operator::Sequence, x.clone(), y.clone()),
        z.clone(),
    );
    let rhs = binary(
        Operator::Sequence,
        x.clone(),
        binary(Operator::Sequence, y.clone(), z.clone()),
    );
    (lhs, rhs)
}

/// `(Par(Par(x, y), z), Par(x, Par(y, z)))`
pub fn parallel_associativity_sides(
    x: &CompositionTree,
    y: &CompositionTree,
    z: &CompositionTree,
) -> (CompositionTree, CompositionTree) {
    let lhs = binary(
        Operator::Parallel,
        binary(Operator::Parallel, x.clone(), y.clone()),
        z.clone(),
    );
    let rhs = binary(
        Operator::Parallel,
        x.clone(),
        binary(Operator::Parallel, y.clone(), z.clone()),
    );
    (lhs, rhs)
}

/// `(Seq(Identity(x), y), Seq(x, Identity(y)))`
pub fn sequence_unit_sides(
    x: &CompositionTree,
    y: &CompositionTree,
) -> (CompositionTree, CompositionTree) {
    let lhs = binary(Operator::Sequence, wrap_identity(x), y.clone());
    let rhs = binary(Operator::Sequence, x.clone(), wrap_identity(y));
    (lhs, rhs)
}

fn random_step(rng: &mut StdRng) -> Step {
    match rng.gen_range(0..5u8) {
        0 => Step::Add(rng.gen_range(-20..=20)),
        1 => Step::Mul(rng.gen_range(-3..=3)),
        2 => Step::Halve,
        3 => Step::Negate,
        _ => {
            let lo = rng.gen_range(-100..=0);
            Step::Clamp {
                lo,
                hi: lo + rng.gen_range(0..=200),
            }
        }
    }
}

fn random_operator(rng: &mut StdRng) -> Operator {
    match rng.gen_range(0..5u8) {
        0 => Operator::Sequence,
        1 => Operator::Parallel,
        2 => Operator::ConditionalBranch {
            guard: match rng.gen_range(0..3u8) {
                0 => Guard::Even,
                1 => Guard::Positive,
                _ => Guard::Below(rng.gen_range(-50..=50)),
            },
        },
        3 => Operator::FixedPointIterate {
            max_iterations: rng.gen_range(1..=4),
        },
        _ => Operator::TraceAnnotate {
            label: format!("note-{}", rng.gen_range(0..100u32)),
        },
    }
}

/// A random tree of depth at most `depth`.
pub fn random_tree(rng: &mut StdRng, depth: usize) -> CompositionTree {
    if depth == 0 || rng.gen_bool(0.3) {
        return if rng.gen_bool(0.5) {
            CompositionTree::Hole
        } else {
            CompositionTree::Step(random_step(rng))
        };
    }
    let op = random_operator(rng);
    let children = (0..op.arity())
        .map(|_| random_tree(rng, depth - 1))
        .collect();
    CompositionTree::Node { op, children }
}

/// A random tree with at least one hole.
fn random_open_tree(rng: &mut StdRng, depth: usize) -> CompositionTree {
    let tree = random_tree(rng, depth);
    if tree.arity() > 0 {
        return tree;
    }
    CompositionTree::Node {
        op: Operator::Sequence,
        children: vec![tree, CompositionTree::Hole],
    }
}

/// A random tree with at least two holes.
fn random_binary_open_tree(rng: &mut StdRng, depth: usize) -> CompositionTree {
    let tree = random_tree(rng, depth);
    match tree.arity() {
        0 => CompositionTree::generator(Operator::Parallel),
        1 => CompositionTree::Node {
            op: Operator::Parallel,
            children: vec![tree, CompositionTree::Hole],
        },
        _ => tree,
    }
}
