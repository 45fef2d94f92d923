//! Randomized round-trip and ordering laws, checked with `proptest` rather
//! than enumerated by hand.

use std::collections::BTreeSet;

use proptest::prelude::*;

use lr_shard_map::{ScanControl, Tree};

fn ascending(tree: &Tree<i32>) -> Vec<i32> {
    let mut out = Vec::new();
    tree.ascend(None, |item| {
        out.push(*item);
        ScanControl::Continue
    });
    out
}

proptest! {
    /// Inserting a set of distinct keys, in any order, then walking
    /// ascending always yields the sorted, deduplicated set -- and `count()`
    /// always matches the number of items actually reachable by a walk.
    #[test]
    fn ascend_matches_sorted_input(mut keys in prop::collection::vec(-10_000i32..10_000, 0..500)) {
        let mut tree: Tree<i32> = Tree::new(0).unwrap();
        for &k in &keys {
            tree.set(k).unwrap();
        }
        keys.sort_unstable();
        keys.dedup();
        prop_assert_eq!(ascending(&tree), keys.clone());
        prop_assert_eq!(tree.count(), keys.len());
    }

    /// Every key that was inserted and not later deleted is still
    /// reachable via `get`; every deleted key is gone.
    #[test]
    fn set_then_delete_subset_leaves_the_rest(
        keys in prop::collection::vec(-10_000i32..10_000, 1..300),
        delete_mask in prop::collection::vec(any::<bool>(), 1..300),
    ) {
        let mut tree: Tree<i32> = Tree::new(9).unwrap();
        let unique: BTreeSet<i32> = keys.iter().copied().collect();
        for &k in &unique {
            tree.set(k).unwrap();
        }

        let mut deleted = BTreeSet::new();
        for (i, &k) in unique.iter().enumerate() {
            if delete_mask.get(i % delete_mask.len()).copied().unwrap_or(false) {
                prop_assert_eq!(tree.delete(&k).unwrap(), Some(k));
                deleted.insert(k);
            }
        }

        for &k in &unique {
            if deleted.contains(&k) {
                prop_assert_eq!(tree.get(&k), None);
            } else {
                prop_assert_eq!(tree.get(&k), Some(&k));
            }
        }
        prop_assert_eq!(tree.count(), unique.len() - deleted.len());
    }

    /// Repeated `pop_min` always returns items in nondecreasing order and
    /// drains the tree exactly once per item.
    #[test]
    fn pop_min_yields_nondecreasing_order(keys in prop::collection::vec(-5_000i32..5_000, 0..400)) {
        let mut tree: Tree<i32> = Tree::new(0).unwrap();
        let unique: BTreeSet<i32> = keys.iter().copied().collect();
        for &k in &unique {
            tree.set(k).unwrap();
        }
        let mut popped = Vec::with_capacity(unique.len());
        while let Some(k) = tree.pop_min().unwrap() {
            popped.push(k);
        }
        let expected: Vec<i32> = unique.into_iter().collect();
        prop_assert_eq!(popped, expected);
        prop_assert_eq!(tree.count(), 0);
        prop_assert_eq!(tree.height(), 0);
    }

    /// `load` on a strictly increasing sequence produces a tree
    /// indistinguishable (by count, height, and ascending order) from one
    /// built with the same sequence via repeated `set`.
    #[test]
    fn load_on_strictly_increasing_matches_set(n in 0usize..1000, max_items in prop::sample::select(vec![3u16, 5, 11, 51, 255])) {
        let mut loaded: Tree<i32> = Tree::new(max_items).unwrap();
        loaded.load(0..n as i32).unwrap();

        let mut set_one_by_one: Tree<i32> = Tree::new(max_items).unwrap();
        for k in 0..n as i32 {
            set_one_by_one.set(k).unwrap();
        }

        prop_assert_eq!(loaded.count(), set_one_by_one.count());
        prop_assert_eq!(loaded.height(), set_one_by_one.height());
        prop_assert_eq!(ascending(&loaded), ascending(&set_one_by_one));
    }

    /// Cloning a tree, then mutating the clone, never affects the original:
    /// the original's ascending walk is unchanged by anything done to the
    /// clone afterward.
    #[test]
    fn clone_is_isolated_from_later_mutation(
        keys in prop::collection::vec(-2_000i32..2_000, 1..300),
        extra in prop::collection::vec(-2_000i32..2_000, 0..100),
    ) {
        let mut original: Tree<i32> = Tree::new(7).unwrap();
        let unique: BTreeSet<i32> = keys.iter().copied().collect();
        for &k in &unique {
            original.set(k).unwrap();
        }
        let before = ascending(&original);

        let mut clone = original.clone();
        for &k in &unique {
            clone.delete(&k).unwrap();
        }
        for &k in &extra {
            clone.set(k).unwrap();
        }

        prop_assert_eq!(ascending(&original), before);
        prop_assert_eq!(original.count(), unique.len());
    }

    /// An empty tree never under- or over-reports: no height, no min/max,
    /// and a full ascend walk visits nothing.
    #[test]
    fn empty_tree_is_empty(max_items in prop::sample::select(vec![0u16, 3, 5, 11])) {
        let tree: Tree<i32> = Tree::new(max_items).unwrap();
        prop_assert_eq!(tree.count(), 0);
        prop_assert_eq!(tree.height(), 0);
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.min(), None);
        prop_assert_eq!(tree.max(), None);
        prop_assert_eq!(ascending(&tree), Vec::<i32>::new());
    }
}
