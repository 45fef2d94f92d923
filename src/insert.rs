//! Insertion, replacement, and bulk load.
//!
//! Descends with preemptive splitting of any full node encountered along the
//! path, so the tree never needs a second pass back up to propagate a split.
//! Every node on the path is CoW-shadowed before it's mutated.

use core::mem::MaybeUninit;
use core::ptr::NonNull;
use core::slice;

use crate::compare::{CloneItem, Comparator};
use crate::error::BTreeError;
use crate::layout::carve;
use crate::node_alloc;
use crate::tree::Tree;

impl<T: CloneItem, C: Comparator<T>> Tree<T, C> {
    #[inline]
    pub(crate) fn node_nitems(&self, node: NonNull<u8>) -> usize {
        unsafe { (*carve::<T>(node, &self.layout).hdr).nitems as usize }
    }

    #[inline]
    pub(crate) fn node_leaf(&self, node: NonNull<u8>) -> bool {
        unsafe { (*carve::<T>(node, &self.layout).hdr).leaf }
    }

    /// Split a full node (`nitems == max_items`) into two nodes of equal
    /// size, returning the promoted median item and the new right sibling.
    /// `node` is left in place, truncated to its left half.
    fn split_full_node(&mut self, node: NonNull<u8>) -> Result<(T, NonNull<u8>), BTreeError> {
        let leaf = self.node_leaf(node);
        let max = self.max_items() as usize;
        let t = (max + 1) / 2;
        let median_idx = t - 1;
        let right_count = max - t;

        let right = unsafe { node_alloc::alloc_node(&self.layout, leaf) }.ok_or(
            BTreeError::OutOfMemory {
                during: "node split",
            },
        )?;

        let left_parts = unsafe { carve::<T>(node, &self.layout) };
        let right_parts = unsafe { carve::<T>(right, &self.layout) };

        for i in 0..right_count {
            unsafe {
                let item =
                    core::ptr::read((left_parts.items_ptr as *const T).add(median_idx + 1 + i));
                core::ptr::write((right_parts.items_ptr as *mut T).add(i), item);
            }
        }
        let median =
            unsafe { core::ptr::read((left_parts.items_ptr as *const T).add(median_idx)) };

        if !leaf {
            for i in 0..=right_count {
                unsafe {
                    let child =
                        core::ptr::read(left_parts.children_ptr.add(median_idx + 1 + i))
                            .assume_init();
                    core::ptr::write(right_parts.children_ptr.add(i), MaybeUninit::new(child));
                }
            }
        }

        unsafe {
            (*left_parts.hdr).nitems = median_idx as u16;
            (*right_parts.hdr).nitems = right_count as u16;
        }

        Ok((median, right))
    }

    /// Shift `node`'s items (and, if a branch, its children) right of `idx`
    /// up by one slot and write `item` (and, for a branch, `right_child`)
    /// into the opened gap.
    unsafe fn insert_into_leaf(&mut self, node: NonNull<u8>, idx: usize, item: T) {
        let parts = carve::<T>(node, &self.layout);
        let nitems = (*parts.hdr).nitems as usize;
        for i in (idx..nitems).rev() {
            let v = core::ptr::read((parts.items_ptr as *const T).add(i));
            core::ptr::write((parts.items_ptr as *mut T).add(i + 1), v);
        }
        core::ptr::write((parts.items_ptr as *mut T).add(idx), item);
        (*parts.hdr).nitems = (nitems + 1) as u16;
    }

    /// Insert a promoted `median` at `idx` in a branch node, with
    /// `right_child` taking the `idx + 1` child slot (the node's existing
    /// child at `idx` becomes the left child of `median`, unchanged).
    unsafe fn insert_into_branch(
        &mut self,
        node: NonNull<u8>,
        idx: usize,
        median: T,
        right_child: NonNull<u8>,
    ) {
        let parts = carve::<T>(node, &self.layout);
        let nitems = (*parts.hdr).nitems as usize;
        for i in (idx..nitems).rev() {
            let v = core::ptr::read((parts.items_ptr as *const T).add(i));
            core::ptr::write((parts.items_ptr as *mut T).add(i + 1), v);
        }
        core::ptr::write((parts.items_ptr as *mut T).add(idx), median);
        for i in (idx + 1..=nitems).rev() {
            let c = core::ptr::read(parts.children_ptr.add(i)).assume_init();
            core::ptr::write(parts.children_ptr.add(i + 1), MaybeUninit::new(c));
        }
        core::ptr::write(parts.children_ptr.add(idx + 1), MaybeUninit::new(right_child));
        (*parts.hdr).nitems = (nitems + 1) as u16;
    }

    /// Insert `item`, or replace the existing item comparing equal to it,
    /// returning the replaced item if any.
    pub fn set(&mut self, item: T) -> Result<Option<T>, BTreeError> {
        self.set_hint(item, None)
    }

    /// Same as [`Tree::set`], seeding and updating a per-depth search hint.
    pub fn set_hint(
        &mut self,
        item: T,
        mut hint: Option<&mut crate::hint::Hint>,
    ) -> Result<Option<T>, BTreeError> {
        let root = match self.root {
            Some(r) => r,
            None => {
                let leaf = unsafe { node_alloc::alloc_node(&self.layout, true) }.ok_or(
                    BTreeError::OutOfMemory {
                        during: "leaf alloc",
                    },
                )?;
                let parts = unsafe { carve::<T>(leaf, &self.layout) };
                unsafe {
                    core::ptr::write(parts.items_ptr as *mut T, item);
                    (*parts.hdr).nitems = 1;
                }
                self.root = Some(leaf);
                self.count = 1;
                self.height = 1;
                return Ok(None);
            }
        };

        let mut root = match unsafe { self.ensure_owned(root) } {
            Some(r) => r,
            None => {
                return Err(BTreeError::OutOfMemory {
                    during: "CoW root",
                })
            }
        };
        self.root = Some(root);

        if self.node_nitems(root) == self.max_items() as usize {
            let new_root = unsafe { node_alloc::alloc_node(&self.layout, false) }.ok_or(
                BTreeError::OutOfMemory {
                    during: "root split",
                },
            )?;
            let (median, right) = self.split_full_node(root)?;
            let np = unsafe { carve::<T>(new_root, &self.layout) };
            unsafe {
                core::ptr::write(np.items_ptr as *mut T, median);
                core::ptr::write(np.children_ptr.add(0), MaybeUninit::new(root));
                core::ptr::write(np.children_ptr.add(1), MaybeUninit::new(right));
                (*np.hdr).nitems = 1;
            }
            root = new_root;
            self.height += 1;
            self.root = Some(root);
        }

        let mut cur = root;
        let mut depth = 0usize;
        loop {
            let parts = unsafe { carve::<T>(cur, &self.layout) };
            let nitems = unsafe { (*parts.hdr).nitems as usize };
            let items =
                unsafe { slice::from_raw_parts_mut(parts.items_ptr as *mut T, nitems) };
            let (idx, found) = self.search_items(items, &item, hint.as_deref_mut(), depth);
            if found {
                let old = core::mem::replace(&mut items[idx], item);
                return Ok(Some(old));
            }
            if unsafe { (*parts.hdr).leaf } {
                unsafe { self.insert_into_leaf(cur, idx, item) };
                self.count += 1;
                return Ok(None);
            }

            let mut child = self.child_at(cur, idx);
            child = match unsafe { self.ensure_owned(child) } {
                Some(c) => c,
                None => {
                    return Err(BTreeError::OutOfMemory {
                        during: "CoW child",
                    })
                }
            };
            unsafe {
                core::ptr::write(parts.children_ptr.add(idx), MaybeUninit::new(child));
            }

            if self.node_nitems(child) == self.max_items() as usize {
                let (median, right) = self.split_full_node(child)?;
                unsafe { self.insert_into_branch(cur, idx, median, right) };
                continue;
            }

            cur = child;
            depth += 1;
        }
    }
}

impl<T: CloneItem, C: Comparator<T>> Tree<T, C> {
    /// Bulk-load a sequence of items, returning the replaced value (if any)
    /// for each, in input order.
    ///
    /// Each item first tries the rightmost-spine fast path: walk straight
    /// down `children[nitems]` at every level with no binary search, CoWing
    /// as it goes, then compare the item once against the rightmost leaf's
    /// last item. If the leaf still has room and the item strictly exceeds
    /// that last item, it's appended in place in O(1) and the walk is done.
    /// Anything else -- a full rightmost leaf, or an item that doesn't sort
    /// past the current maximum -- falls back to [`Tree::set_hint`], which
    /// re-descends from the root; the fast path's CoW already reached every
    /// node `set_hint` would otherwise need to shadow-copy, so the fallback
    /// only repeats cheap no-op CoW checks, not real copies. On a strictly
    /// increasing sequence every item takes the fast path, making `load`
    /// amortized O(1) per item instead of `set`'s O(log n).
    pub fn load<I>(&mut self, items: I) -> Result<alloc::vec::Vec<Option<T>>, BTreeError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut hint = crate::hint::Hint::new();
        let mut previous = alloc::vec::Vec::new();
        for item in items {
            previous.push(self.load_one(item, &mut hint)?);
        }
        Ok(previous)
    }

    /// Try the rightmost-spine append for a single item, falling back to
    /// [`Tree::set_hint`] when the item isn't a strict new maximum or the
    /// rightmost leaf is full.
    fn load_one(
        &mut self,
        item: T,
        hint: &mut crate::hint::Hint,
    ) -> Result<Option<T>, BTreeError> {
        let root = match self.root {
            Some(r) => r,
            None => return self.set_hint(item, Some(hint)),
        };

        let root = match unsafe { self.ensure_owned(root) } {
            Some(r) => r,
            None => {
                return Err(BTreeError::OutOfMemory {
                    during: "CoW root",
                })
            }
        };
        self.root = Some(root);

        let mut node = root;
        loop {
            if self.node_leaf(node) {
                let nitems = self.node_nitems(node);
                if nitems == self.max_items() as usize {
                    break;
                }
                let last = unsafe {
                    let parts = carve::<T>(node, &self.layout);
                    &*(parts.items_ptr as *const T).add(nitems - 1)
                };
                if self.cmp.compare(&item, last) != core::cmp::Ordering::Greater {
                    break;
                }
                unsafe { self.insert_into_leaf(node, nitems, item) };
                self.count += 1;
                return Ok(None);
            }

            let n = self.node_nitems(node);
            let mut child = self.child_at(node, n);
            child = match unsafe { self.ensure_owned(child) } {
                Some(c) => c,
                None => {
                    return Err(BTreeError::OutOfMemory {
                        during: "CoW child",
                    })
                }
            };
            unsafe {
                let parts = carve::<T>(node, &self.layout);
                core::ptr::write(parts.children_ptr.add(n), MaybeUninit::new(child));
            }
            node = child;
        }

        self.set_hint(item, Some(hint))
    }
}
