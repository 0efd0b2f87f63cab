//! Injected content semantics.
//!
//! The sheaf never inspects belief content itself. Agreement is decided by a
//! [`ContentComparator`] and combination by a [`ContentSynthesizer`]. Closures
//! of the right shape implement both traits.

use std::collections::{BTreeMap, BTreeSet};

/// Decides whether two contents agree.
pub trait ContentComparator<T>: Send + Sync {
    fn agree(&self, a: &T, b: &T) -> bool;
}

impl<T, F> ContentComparator<T> for F
where
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    fn agree(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Combines contents of compatible beliefs into one.
///
/// Implementations used with [`glue`](crate::glue) should be associative and
/// insensitive to input order, otherwise gluing in stages can differ from
/// gluing all at once.
pub trait ContentSynthesizer<T>: Send + Sync {
    fn synthesize(&self, contents: &[&T]) -> T;
}

impl<T, F> ContentSynthesizer<T> for F
where
    F: Fn(&[&T]) -> T + Send + Sync,
{
    fn synthesize(&self, contents: &[&T]) -> T {
        self(contents)
    }
}

/// Agreement is equality.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactComparator;

impl<T: PartialEq> ContentComparator<T> for ExactComparator {
    fn agree(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Maps agree when no shared key carries different values.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsistentMapComparator;

impl<K: Ord, V: PartialEq> ContentComparator<BTreeMap<K, V>> for ConsistentMapComparator {
    fn agree(&self, a: &BTreeMap<K, V>, b: &BTreeMap<K, V>) -> bool {
        a.iter()
            .all(|(k, va)| b.get(k).map_or(true, |vb| va == vb))
    }
}

/// Union of sets.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetUnionSynthesizer;

impl<T: Ord + Clone> ContentSynthesizer<BTreeSet<T>> for SetUnionSynthesizer {
    fn synthesize(&self, contents: &[&BTreeSet<T>]) -> BTreeSet<T> {
        contents.iter().flat_map(|s| s.iter().cloned()).collect()
    }
}

/// Union of maps. On a key conflict the earliest input wins; callers glue
/// only consistent maps, where no conflicts exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapUnionSynthesizer;

impl<K: Ord + Clone, V: Clone> ContentSynthesizer<BTreeMap<K, V>> for MapUnionSynthesizer {
    fn synthesize(&self, contents: &[&BTreeMap<K, V>]) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for map in contents {
            for (k, v) in map.iter() {
                merged.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
        merged
    }
}
