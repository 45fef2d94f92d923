//! Visitor-based range scans, ascending and descending, from an arbitrary
//! pivot or over the whole tree.
//!
//! An in-order (or reverse in-order) walk calls a visitor per item and stops
//! the instant the visitor asks to stop, without allocating a path stack
//! beyond the recursion itself.

use core::slice;

use crate::compare::Comparator;
use crate::layout::carve;
use crate::tree::Tree;

/// What a scan visitor returns after seeing an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    Stop,
}

impl<T, C: Comparator<T>> Tree<T, C> {
    /// Visit every item `>= pivot` (or every item, if `pivot` is `None`) in
    /// ascending order, stopping as soon as `visit` returns
    /// [`ScanControl::Stop`]. Returns `true` if the walk ran to completion,
    /// `false` if `visit` asked to stop early.
    pub fn ascend<F>(&self, pivot: Option<&T>, mut visit: F) -> bool
    where
        F: FnMut(&T) -> ScanControl,
    {
        match self.root {
            Some(root) => unsafe { self.ascend_node(root, pivot, &mut visit) == ScanControl::Continue },
            None => true,
        }
    }

    /// Visit every item `<= pivot` (or every item, if `pivot` is `None`) in
    /// descending order, stopping as soon as `visit` returns
    /// [`ScanControl::Stop`]. Returns `true` if the walk ran to completion.
    pub fn descend<F>(&self, pivot: Option<&T>, mut visit: F) -> bool
    where
        F: FnMut(&T) -> ScanControl,
    {
        match self.root {
            Some(root) => unsafe { self.descend_node(root, pivot, &mut visit) == ScanControl::Continue },
            None => true,
        }
    }

    unsafe fn ascend_node<F>(
        &self,
        node: core::ptr::NonNull<u8>,
        pivot: Option<&T>,
        visit: &mut F,
    ) -> ScanControl
    where
        F: FnMut(&T) -> ScanControl,
    {
        let parts = carve::<T>(node, &self.layout);
        let nitems = (*parts.hdr).nitems as usize;
        let leaf = (*parts.hdr).leaf;
        let items = slice::from_raw_parts(parts.items_ptr as *const T, nitems);

        let start = match pivot {
            Some(p) => self.search_items(items, p, None, 0).0,
            None => 0,
        };

        for i in start..nitems {
            if !leaf {
                let child = core::ptr::read(parts.children_ptr.add(i)).assume_init();
                if self.ascend_node(child, pivot, visit) == ScanControl::Stop {
                    return ScanControl::Stop;
                }
            }
            if visit(&items[i]) == ScanControl::Stop {
                return ScanControl::Stop;
            }
        }
        if !leaf {
            let child = core::ptr::read(parts.children_ptr.add(nitems)).assume_init();
            if self.ascend_node(child, pivot, visit) == ScanControl::Stop {
                return ScanControl::Stop;
            }
        }
        ScanControl::Continue
    }

    unsafe fn descend_node<F>(
        &self,
        node: core::ptr::NonNull<u8>,
        pivot: Option<&T>,
        visit: &mut F,
    ) -> ScanControl
    where
        F: FnMut(&T) -> ScanControl,
    {
        let parts = carve::<T>(node, &self.layout);
        let nitems = (*parts.hdr).nitems as usize;
        let leaf = (*parts.hdr).leaf;
        let items = slice::from_raw_parts(parts.items_ptr as *const T, nitems);

        let end = match pivot {
            Some(p) => {
                let (idx, found) = self.search_items(items, p, None, 0);
                if found {
                    idx + 1
                } else {
                    idx
                }
            }
            None => nitems,
        };

        if !leaf {
            let child = core::ptr::read(parts.children_ptr.add(end)).assume_init();
            if self.descend_node(child, pivot, visit) == ScanControl::Stop {
                return ScanControl::Stop;
            }
        }
        for i in (0..end).rev() {
            if visit(&items[i]) == ScanControl::Stop {
                return ScanControl::Stop;
            }
            if !leaf {
                let child = core::ptr::read(parts.children_ptr.add(i)).assume_init();
                if self.descend_node(child, pivot, visit) == ScanControl::Stop {
                    return ScanControl::Stop;
                }
            }
        }
        ScanControl::Continue
    }
}
