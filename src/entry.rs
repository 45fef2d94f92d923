//! A ready-made shard item: an integer key paired with an opaque value,
//! ordered by key alone.
//!
//! The B-tree core (`tree.rs` and friends) is generic over any `T` plus a
//! `Comparator<T>`, so nothing here is required to use it. `Entry<V>` exists
//! because every router in `router/` needs a concrete item type whose
//! ordering matches its routing key exactly -- a plain `(i64, V)` tuple would
//! order by `V` as a tiebreak, which is wrong once two entries share a key
//! during a lookup probe.

use core::cmp::Ordering;

use crate::compare::Keyed;

/// An integer-keyed item: orders and compares by `key` only, regardless of
/// `value`. Mirrors `KV_Node { int key; char *str; }`.
#[derive(Clone, Debug)]
pub struct Entry<V> {
    pub key: i64,
    pub value: V,
}

impl<V> Entry<V> {
    pub fn new(key: i64, value: V) -> Self {
        Entry { key, value }
    }
}

impl<V: Default> Entry<V> {
    /// A probe for lookups/deletes: since [`Ord`]/[`Eq`] for `Entry<V>`
    /// compare `key` only, the probe's `value` is never inspected.
    pub fn probe(key: i64) -> Self {
        Entry {
            key,
            value: V::default(),
        }
    }
}

impl<V> Keyed for Entry<V> {
    #[inline]
    fn route_key(&self) -> i64 {
        self.key
    }
}

impl<V> PartialEq for Entry<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl<V> Eq for Entry<V> {}

impl<V> PartialOrd for Entry<V> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<V> Ord for Entry<V> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

// `Entry<V>: Ord` (above) already makes `NaturalOrder` (`T: Ord` blanket
// impl in `compare.rs`) a correct, key-only comparator for `Entry<V>`; no
// separate comparator type is needed.
