//! Pluggable per-tree allocator hooks.
//!
//! `realloc` is unused by the core logic (nodes are always replaced
//! wholesale, never grown in place) -- kept here only as a reserved method
//! so a future resize-in-place optimization has somewhere to live.

use core::ptr::NonNull;

use crate::node_alloc;

pub trait NodeAllocator {
    /// # Safety
    /// `bytes`/`align` must describe a valid, non-zero `Layout`.
    unsafe fn alloc(&self, bytes: usize, align: usize) -> Option<NonNull<u8>>;

    /// # Safety
    /// `ptr` must have been returned by [`NodeAllocator::alloc`] on `self`
    /// with the same `bytes`/`align`.
    unsafe fn dealloc(&self, ptr: NonNull<u8>, bytes: usize, align: usize);

    /// Reserved for a future resize-in-place path; unused by the tree today.
    #[allow(unused_variables)]
    unsafe fn realloc(&self, ptr: NonNull<u8>, old_bytes: usize, new_bytes: usize, align: usize) -> Option<NonNull<u8>> {
        None
    }
}

/// Default allocator: the global Rust allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

impl NodeAllocator for SystemAllocator {
    #[inline]
    unsafe fn alloc(&self, bytes: usize, align: usize) -> Option<NonNull<u8>> {
        node_alloc::alloc_raw(bytes, align)
    }
    #[inline]
    unsafe fn dealloc(&self, ptr: NonNull<u8>, bytes: usize, align: usize) {
        node_alloc::dealloc_raw(ptr, bytes, align)
    }
}

/// DEPRECATED: a process-global allocator setter never does anything but
/// set the default that per-tree construction can already override; prefer
/// passing a [`NodeAllocator`] to [`crate::tree::BTreeConfig::allocator`].
#[deprecated(note = "use a per-tree NodeAllocator passed at construction instead")]
pub fn set_global_allocator(_malloc: fn(usize) -> *mut u8, _free: fn(*mut u8)) {}
