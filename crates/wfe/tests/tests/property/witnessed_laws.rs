//! Property tests: the Witnessed monad laws hold on value *and* trace order.

use maple_wfe_types::{Mark, TemporalAnchor, Trace};
use maple_wfe_witness::{kleisli, Witnessed};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A generated Kleisli arrow: affine update plus a few marks that record
/// the input, so traces differ whenever inputs do.
#[derive(Clone, Debug)]
struct Arrow {
    label: String,
    factor: i64,
    offset: i64,
    marks: u8,
}

impl Arrow {
    fn run(&self, x: i64) -> Witnessed<i64> {
        let y = x.wrapping_mul(self.factor).wrapping_add(self.offset);
        let marks = (0..self.marks)
            .map(|i| {
                Mark::with_payload(
                    TemporalAnchor::new(0, u32::from(i)),
                    "property",
                    format!("{}#{}({})", self.label, i, x),
                    &(x, y),
                )
            })
            .collect::<Vec<_>>();
        Witnessed::new(y, Trace::from_marks(marks))
    }
}

fn arb_arrow() -> impl Strategy<Value = Arrow> {
    ("[a-z]{1,6}", -5i64..5, -100i64..100, 0u8..4).prop_map(|(label, factor, offset, marks)| {
        Arrow {
            label,
            factor,
            offset,
            marks,
        }
    })
}

/// An already-witnessed value with a non-trivial history.
fn arb_witnessed() -> impl Strategy<Value = Witnessed<i64>> {
    (-1000i64..1000, arb_arrow()).prop_map(|(x, arrow)| arrow.run(x))
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// pure(a) >>= f == f(a)
    #[test]
    fn left_identity(a in -1000i64..1000, f in arb_arrow()) {
        let lhs = Witnessed::pure(a).bind(|x| f.run(x));
        let rhs = f.run(a);
        prop_assert!(lhs.same_witness(&rhs));
    }

    /// m >>= pure == m
    #[test]
    fn right_identity(m in arb_witnessed()) {
        let lhs = m.clone().bind(Witnessed::pure);
        prop_assert!(lhs.same_witness(&m));
    }

    /// (m >>= f) >>= g == m >>= (x -> f(x) >>= g)
    #[test]
    fn associativity(m in arb_witnessed(), f in arb_arrow(), g in arb_arrow()) {
        let lhs = m.clone().bind(|x| f.run(x)).bind(|y| g.run(y));
        let rhs = m.bind(|x| f.run(x).bind(|y| g.run(y)));
        prop_assert!(lhs.same_witness(&rhs));
    }

    /// Trace order is causal order: m's marks, then f's, then g's.
    #[test]
    fn bind_appends_in_causal_order(m in arb_witnessed(), f in arb_arrow()) {
        let before = m.trace().len();
        let fx = f.run(*m.value());
        let bound = m.clone().bind(|x| f.run(x));
        prop_assert_eq!(bound.trace().len(), before + fx.trace().len());
        prop_assert_eq!(&bound.trace().marks()[..before], m.trace().marks());
        prop_assert_eq!(&bound.trace().marks()[before..], fx.trace().marks());
    }

    /// (f >=> g)(a) == f(a) >>= g
    #[test]
    fn kleisli_matches_bind(a in -1000i64..1000, f in arb_arrow(), g in arb_arrow()) {
        let (f2, g2) = (f.clone(), g.clone());
        let composed = kleisli(move |x| f2.run(x), move |y| g2.run(y));
        prop_assert!(composed(a).same_witness(&f.run(a).bind(|y| g.run(y))));
    }

    /// map never touches the trace.
    #[test]
    fn map_preserves_trace(m in arb_witnessed(), k in -10i64..10) {
        let mapped = m.clone().map(|x| x.wrapping_mul(k));
        prop_assert_eq!(mapped.trace(), m.trace());
        prop_assert_eq!(*mapped.value(), m.value().wrapping_mul(k));
    }

    /// Sequencing concatenates traces in input order.
    #[test]
    fn sequence_concatenates(items in prop::collection::vec(arb_witnessed(), 0..5)) {
        let expected_len: usize = items.iter().map(|w| w.trace().len()).sum();
        let values: Vec<i64> = items.iter().map(|w| *w.value()).collect();
        let first_marks: Vec<Mark> = items
            .first()
            .map(|w| w.trace().marks().to_vec())
            .unwrap_or_default();

        let seq = Witnessed::sequence(items);
        prop_assert_eq!(seq.value(), &values);
        prop_assert_eq!(seq.trace().len(), expected_len);
        prop_assert_eq!(&seq.trace().marks()[..first_marks.len()], &first_marks[..]);
    }

    /// A failing step is still witnessed and short-circuits later steps.
    #[test]
    fn failures_stay_witnessed(m in arb_witnessed(), f in arb_arrow()) {
        let failed: Witnessed<Result<i64, String>> = m.clone().map(|_| Err("rejected".to_string()));
        let after = failed.bind_ok(|x| f.run(x).map(Ok));
        prop_assert!(!after.is_ok());
        prop_assert_eq!(after.trace(), m.trace());
    }
}
