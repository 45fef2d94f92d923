//! Read-only lookups: `get`, `get_hint`, `min`, `max`.
//!
//! Descends via the hinted binary search, follows the child at the search
//! index when there's no exact match, and returns a borrowed reference into
//! the matched item.

use core::ptr::NonNull;
use core::slice;

use crate::compare::Comparator;
use crate::hint::Hint;
use crate::layout::carve;
use crate::tree::Tree;

impl<T, C: Comparator<T>> Tree<T, C> {
    /// Look up `key`, returning a reference to the stored item on a match.
    pub fn get(&self, key: &T) -> Option<&T> {
        self.get_hint(key, None)
    }

    /// Same as [`Tree::get`], but seeds and updates a per-depth search hint
    /// across repeated calls against keys that tend to cluster.
    pub fn get_hint(&self, key: &T, mut hint: Option<&mut Hint>) -> Option<&T> {
        let mut cur = self.root?;
        let mut depth = 0usize;
        loop {
            // SAFETY: `cur` is a live node owned by `self` for the duration
            // of this borrow; the returned reference's lifetime is tied to
            // `&self`.
            let parts = unsafe { carve::<T>(cur, &self.layout) };
            let nitems = unsafe { (*parts.hdr).nitems as usize };
            let items = unsafe { slice::from_raw_parts(parts.items_ptr as *const T, nitems) };
            let (idx, found) =
                self.search_items(items, key, hint.as_deref_mut(), depth);
            if found {
                return Some(&items[idx]);
            }
            if unsafe { (*parts.hdr).leaf } {
                return None;
            }
            cur = unsafe {
                core::ptr::read(parts.children_ptr.add(idx)).assume_init()
            };
            depth += 1;
        }
    }

    /// Smallest item in the tree, if any.
    pub fn min(&self) -> Option<&T> {
        let mut cur = self.root?;
        loop {
            let parts = unsafe { carve::<T>(cur, &self.layout) };
            let leaf = unsafe { (*parts.hdr).leaf };
            if leaf {
                let nitems = unsafe { (*parts.hdr).nitems as usize };
                if nitems == 0 {
                    return None;
                }
                let items =
                    unsafe { slice::from_raw_parts(parts.items_ptr as *const T, nitems) };
                return Some(&items[0]);
            }
            cur = unsafe { core::ptr::read(parts.children_ptr.add(0)).assume_init() };
        }
    }

    /// Largest item in the tree, if any.
    pub fn max(&self) -> Option<&T> {
        let mut cur = self.root?;
        loop {
            let parts = unsafe { carve::<T>(cur, &self.layout) };
            let leaf = unsafe { (*parts.hdr).leaf };
            let nitems = unsafe { (*parts.hdr).nitems as usize };
            if leaf {
                if nitems == 0 {
                    return None;
                }
                let items =
                    unsafe { slice::from_raw_parts(parts.items_ptr as *const T, nitems) };
                return Some(&items[nitems - 1]);
            }
            cur = unsafe {
                core::ptr::read(parts.children_ptr.add(nitems)).assume_init()
            };
        }
    }

    #[inline]
    pub(crate) fn child_at(&self, node: NonNull<u8>, idx: usize) -> NonNull<u8> {
        let parts = unsafe { carve::<T>(node, &self.layout) };
        unsafe { core::ptr::read(parts.children_ptr.add(idx)).assume_init() }
    }
}
