//! Raw node allocation.
//!
//! Wraps `alloc::alloc::{alloc, dealloc}`, checking for a null return rather
//! than aborting. A node is born with `rc == 0` (sole owner).

use alloc::alloc::{alloc, dealloc, Layout};
use core::ptr::{self, NonNull};

use crate::layout::{NodeHeader, NodeLayout};
use crate::rc::RcCell;

#[inline]
fn layout_for(bytes: usize, align: usize) -> Layout {
    Layout::from_size_align(bytes, align).expect("invalid node layout")
}

/// Allocate `bytes` at `align`, returning `None` on allocator failure
/// instead of aborting -- this is how the tree's sticky `oom` flag gets set.
#[inline]
pub unsafe fn alloc_raw(bytes: usize, align: usize) -> Option<NonNull<u8>> {
    let layout = layout_for(bytes, align);
    NonNull::new(alloc(layout))
}

#[inline]
pub unsafe fn dealloc_raw(ptr: NonNull<u8>, bytes: usize, align: usize) {
    dealloc(ptr.as_ptr(), layout_for(bytes, align));
}

/// Allocate and initialize a fresh node block. `leaf` selects the tag;
/// `nitems` starts at zero and the children array (if any) is left
/// uninitialized -- callers always write every child slot they use before
/// reading it back.
#[inline]
pub unsafe fn alloc_node(layout: &NodeLayout, leaf: bool) -> Option<NonNull<u8>> {
    let p = alloc_raw(layout.bytes, layout.max_align)?;
    init_node(p, leaf);
    Some(p)
}

#[inline]
pub unsafe fn init_node(base: NonNull<u8>, leaf: bool) {
    let hdr = base.as_ptr() as *mut NodeHeader;
    ptr::write(
        hdr,
        NodeHeader {
            rc: RcCell::new(0),
            leaf,
            nitems: 0,
        },
    );
}
