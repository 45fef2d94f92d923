//! Node byte-layout computation and pointer carving.
//!
//! A node is a single raw allocation: a fixed [`NodeHeader`], followed by an
//! inline array of up to `max_items` items, followed -- for internal nodes
//! only -- by an inline array of up to `max_items + 1` child handles. Both
//! leaves and branches carry items (this is a classic B-tree, not a B+Tree),
//! so one [`NodeLayout`] describes both kinds; `children_off` is simply
//! unused storage on a leaf.
//!
//! The capacity-to-layout computation (`compute_for_cap`) infers the cap
//! from a requested item capacity rather than a byte budget.

use core::mem::{align_of, size_of, MaybeUninit};
use core::ptr::NonNull;

use crate::rc::RcCell;

#[inline]
pub const fn align_up(x: usize, a: usize) -> usize {
    (x + (a - 1)) & !(a - 1)
}

/// Fixed header placed at offset 0 of every node allocation.
#[repr(C)]
pub struct NodeHeader {
    pub rc: RcCell,
    pub leaf: bool,
    pub nitems: u16,
}

#[derive(Copy, Clone, Debug)]
pub struct NodeLayout {
    pub bytes: usize,
    pub max_align: usize,
    pub hdr_size: usize,
    /// Maximum items a node may hold (`2d - 1`).
    pub max_items: u16,
    pub items_off: usize,
    /// Offset of the `max_items + 1` child-pointer array; only meaningful
    /// for internal nodes, but always reserved so a node can be turned from
    /// a leaf into a branch by moving bytes rather than reallocating.
    pub children_off: usize,
}

impl NodeLayout {
    /// Compute a layout able to hold exactly `max_items` items of type `T`,
    /// plus `max_items + 1` child pointers.
    pub fn compute_for_cap<T>(max_items: u16) -> Self {
        let a_ptr = align_of::<*const ()>();
        let a_t = align_of::<T>();
        let s_ptr = size_of::<*const ()>();
        let s_t = size_of::<T>();
        let max_align = a_ptr.max(a_t).max(align_of::<NodeHeader>());
        let hdr_size = align_up(size_of::<NodeHeader>(), max_align);

        // Items first (usually smaller alignment requirement is fine either
        // way; items are read far more often than children so keep them
        // cache-adjacent to the header).
        let items_off = align_up(hdr_size, a_t);
        let items_end = items_off + max_items as usize * s_t;
        let children_off = align_up(items_end, a_ptr);
        let children_end = children_off + (max_items as usize + 1) * s_ptr;
        let bytes = align_up(children_end, max_align);

        Self {
            bytes,
            max_align,
            hdr_size,
            max_items,
            items_off,
            children_off,
        }
    }
}

/// Raw parts carved out of a node's single allocation.
pub struct NodeParts<T> {
    pub hdr: *mut NodeHeader,
    pub items_ptr: *mut MaybeUninit<T>,
    pub children_ptr: *mut MaybeUninit<NonNull<u8>>,
}

impl<T> Clone for NodeParts<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for NodeParts<T> {}

/// Carve a node's header, item array, and child array from a raw base
/// pointer. Safe to call on both leaves and branches; callers index the
/// child array only when the node's header says it is a branch.
#[inline(always)]
pub unsafe fn carve<T>(base: NonNull<u8>, layout: &NodeLayout) -> NodeParts<T> {
    let p = base.as_ptr();
    NodeParts {
        hdr: p as *mut NodeHeader,
        items_ptr: p.add(layout.items_off) as *mut MaybeUninit<T>,
        children_ptr: p.add(layout.children_off) as *mut MaybeUninit<NonNull<u8>>,
    }
}
