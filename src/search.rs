//! Binary search over a node's item array, hint-seeded, with an optional
//! custom searcher override.
//!
//! Probes the hinted index first; if it resolves the search, short-circuit;
//! otherwise it narrows one endpoint of the ordinary binary search.

use core::cmp::Ordering;

use crate::compare::Comparator;
use crate::hint::Hint;
use crate::tree::Tree;

/// Result of searching a node for `key`: the lower-bound index, and whether
/// an exact match was found at that index.
pub(crate) fn default_search<T, C: Comparator<T>>(
    items: &[T],
    key: &T,
    cmp: &C,
    mut hint: Option<&mut Hint>,
    depth: usize,
) -> (usize, bool) {
    let n = items.len();
    let mut lo = 0usize;
    let mut hi = n;

    if let Some(h) = hint.as_deref() {
        if let Some(idx) = h.get(depth) {
            if idx < n {
                match cmp.compare(key, &items[idx]) {
                    Ordering::Equal => {
                        if let Some(h) = hint {
                            h.set(depth, idx);
                        }
                        return (idx, true);
                    }
                    Ordering::Greater => lo = idx + 1,
                    Ordering::Less => hi = idx,
                }
            }
        }
    }

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match cmp.compare(key, &items[mid]) {
            Ordering::Equal => {
                if let Some(h) = hint {
                    h.set(depth, mid);
                }
                return (mid, true);
            }
            Ordering::Less => hi = mid,
            Ordering::Greater => lo = mid + 1,
        }
    }
    if let Some(h) = hint {
        h.set(depth, lo);
    }
    (lo, false)
}

impl<T, C: Comparator<T>> Tree<T, C> {
    /// Search `items` for `key`, honoring a custom searcher if one was
    /// installed, otherwise the default hinted binary search.
    pub(crate) fn search_items(
        &self,
        items: &[T],
        key: &T,
        hint: Option<&mut Hint>,
        depth: usize,
    ) -> (usize, bool) {
        match &self.custom_searcher {
            Some(f) => f(items, key),
            None => default_search(items, key, &self.cmp, hint, depth),
        }
    }
}
