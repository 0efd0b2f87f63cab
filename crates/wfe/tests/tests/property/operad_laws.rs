//! Property tests: the composition operad obeys associativity, identity and
//! interchange under execution, compared on value and trace, and the
//! operators keep their own associativity and unit laws.

use maple_wfe_operad::laws::random_tree;
use maple_wfe_operad::{
    associativity_sides, compose, interchange_sides, left_identity_sides,
    parallel_associativity_sides, right_identity_sides, sequence_associativity_sides,
    sequence_unit_sides, verify_operad_laws, CompositionTree, LawCheckConfig, LawVerifier,
    Operator, Step,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-20i64..=20).prop_map(Step::Add),
        (-3i64..=3).prop_map(Step::Mul),
        Just(Step::Halve),
        Just(Step::Negate),
        (-50i64..=0, 0i64..=100).prop_map(|(lo, width)| Step::Clamp { lo, hi: lo + width }),
    ]
}

/// Tree of depth ≤ 3 drawn from a proptest-chosen seed.
fn arb_tree() -> impl Strategy<Value = CompositionTree> {
    any::<u64>().prop_map(|seed| random_tree(&mut StdRng::seed_from_u64(seed), 3))
}

/// Tree with at least `holes` holes.
fn arb_open_tree(holes: usize) -> impl Strategy<Value = CompositionTree> {
    arb_tree().prop_map(move |mut tree| {
        while tree.arity() < holes {
            tree = CompositionTree::Node {
                op: Operator::Parallel,
                children: vec![tree, CompositionTree::Hole],
            };
        }
        tree
    })
}

fn verifier() -> LawVerifier {
    LawVerifier::new(LawCheckConfig::default())
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn associativity(
        a in arb_open_tree(1),
        b in arb_open_tree(1),
        c in arb_tree(),
        i in any::<prop::sample::Index>(),
        j in any::<prop::sample::Index>(),
        input in -1000i64..1000,
        fills in prop::collection::vec(arb_step(), 0..12),
    ) {
        let i = i.index(a.arity());
        let j = j.index(b.arity());
        let (lhs, rhs) = associativity_sides(&a, &b, &c, i, j).unwrap();
        prop_assert_eq!(lhs.arity(), rhs.arity());
        if let Err(detail) = verifier().agree(&lhs, &rhs, input, &fills) {
            prop_assert!(false, "associativity: {} (lhs {}, rhs {})", detail, lhs, rhs);
        }
    }

    #[test]
    fn left_identity(
        a in arb_tree(),
        input in -1000i64..1000,
        fills in prop::collection::vec(arb_step(), 0..12),
    ) {
        let (lhs, rhs) = left_identity_sides(&a);
        prop_assert!(verifier().agree(&lhs, &rhs, input, &fills).is_ok());
    }

    #[test]
    fn right_identity(
        a in arb_open_tree(1),
        i in any::<prop::sample::Index>(),
        input in -1000i64..1000,
        fills in prop::collection::vec(arb_step(), 0..12),
    ) {
        let i = i.index(a.arity());
        let (lhs, rhs) = right_identity_sides(&a, i).unwrap();
        prop_assert!(verifier().agree(&lhs, &rhs, input, &fills).is_ok());
    }

    #[test]
    fn interchange(
        a in arb_open_tree(2),
        b in arb_tree(),
        c in arb_tree(),
        k in any::<prop::sample::Index>(),
        i in any::<prop::sample::Index>(),
        input in -1000i64..1000,
        fills in prop::collection::vec(arb_step(), 0..12),
    ) {
        let k = 1 + k.index(a.arity() - 1);
        let i = i.index(k);
        let (lhs, rhs) = interchange_sides(&a, &b, &c, i, k).unwrap();
        prop_assert!(verifier().agree(&lhs, &rhs, input, &fills).is_ok());
    }

    #[test]
    fn sequence_associativity(
        x in arb_tree(),
        y in arb_tree(),
        z in arb_tree(),
        input in -1000i64..1000,
        fills in prop::collection::vec(arb_step(), 0..12),
    ) {
        let (lhs, rhs) = sequence_associativity_sides(&x, &y, &z);
        prop_assert_ne!(&lhs, &rhs);
        if let Err(detail) = verifier().agree(&lhs, &rhs, input, &fills) {
            prop_assert!(false, "sequence associativity: {} (lhs {}, rhs {})", detail, lhs, rhs);
        }
    }

    #[test]
    fn parallel_associativity(
        x in arb_tree(),
        y in arb_tree(),
        z in arb_tree(),
        input in -1000i64..1000,
        fills in prop::collection::vec(arb_step(), 0..12),
    ) {
        let (lhs, rhs) = parallel_associativity_sides(&x, &y, &z);
        prop_assert!(verifier().agree(&lhs, &rhs, input, &fills).is_ok());
    }

    #[test]
    fn sequence_unit(
        x in arb_tree(),
        y in arb_tree(),
        input in -1000i64..1000,
        fills in prop::collection::vec(arb_step(), 0..12),
    ) {
        let (lhs, rhs) = sequence_unit_sides(&x, &y);
        prop_assert!(verifier().agree(&lhs, &rhs, input, &fills).is_ok());
    }

    /// Plugging past the last hole is always a structural error.
    #[test]
    fn out_of_range_position_is_rejected(a in arb_tree(), extra in 0usize..3) {
        let position = a.arity() + extra;
        prop_assert!(compose(&a, &[CompositionTree::identity()], position).is_err());
    }

    /// Composition adds arities: |a ∘ᵢ b| = |a| + |b| - 1.
    #[test]
    fn composition_arity(a in arb_open_tree(1), b in arb_tree(), i in any::<prop::sample::Index>()) {
        let i = i.index(a.arity());
        let composed = compose(&a, &[b.clone()], i).unwrap();
        prop_assert_eq!(composed.arity(), a.arity() + b.arity() - 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// The seeded verifier finds no counterexample from any seed.
    #[test]
    fn seeded_verifier_is_clean(seed in any::<u64>()) {
        let report = verify_operad_laws(seed, 100);
        prop_assert_eq!(report.total_cases(), 700);
        prop_assert!(report.ensure_holds().is_ok());
    }
}

/// A single counterexample must fail the build.
#[test]
fn release_gate() {
    verify_operad_laws(LawCheckConfig::default().seed, 250)
        .ensure_holds()
        .unwrap();
}
