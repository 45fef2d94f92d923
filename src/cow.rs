//! Copy-on-write node shadowing and recursive node freeing.
//!
//! Shadowing clones items via the item-clone hook, shallow-copies and
//! rc-bumps children, and unwinds cleanly on a mid-copy clone failure.
//! Freeing decrements rc and only releases storage when it was the last
//! owner.

use core::ptr::NonNull;

use crate::compare::{CloneItem, Comparator};
use crate::layout::carve;
use crate::node_alloc;
use crate::rc;
use crate::tree::Tree;

impl<T: CloneItem, C: Comparator<T>> Tree<T, C> {
    /// Release one reference to `node`. If this was the last owner, drop
    /// every item in place, recursively release every child, and free the
    /// node's storage.
    ///
    /// # Safety
    /// `node` must be a live node belonging to this tree (or a clone of it)
    /// that the caller is relinquishing exactly one ownership of.
    pub(crate) unsafe fn release_node(&self, node: NonNull<u8>) {
        let parts = carve::<T>(node, &self.layout);
        if !rc::release(&(*parts.hdr).rc) {
            return;
        }
        let nitems = (*parts.hdr).nitems as usize;
        for i in 0..nitems {
            core::ptr::drop_in_place((parts.items_ptr as *mut T).add(i));
        }
        if !(*parts.hdr).leaf {
            for i in 0..=nitems {
                let child = core::ptr::read(parts.children_ptr.add(i)).assume_init();
                self.release_node(child);
            }
        }
        self.alloc.dealloc(node, self.layout.bytes, self.layout.max_align);
    }

    /// If `node` is shared (`rc > 0`), materialize and return an owned
    /// clone; otherwise return `node` unchanged. The caller is responsible
    /// for writing the returned handle back into whatever slot pointed at
    /// `node` (a parent's child array, or the tree's `root`), and for not
    /// touching `node` again once a clone was produced.
    ///
    /// On failure (allocator OOM, or an item failed to clone), returns
    /// `None` and `node` is left completely unmodified -- any children
    /// already rc-bumped during the attempt are released again and any
    /// items already cloned into the new node are dropped.
    pub(crate) unsafe fn ensure_owned(&mut self, node: NonNull<u8>) -> Option<NonNull<u8>> {
        let parts = carve::<T>(node, &self.layout);
        if !rc::is_shared(&(*parts.hdr).rc) {
            return Some(node);
        }

        let leaf = (*parts.hdr).leaf;
        let nitems = (*parts.hdr).nitems as usize;

        let new_node = match self.alloc.alloc(self.layout.bytes, self.layout.max_align) {
            Some(p) => p,
            None => {
                self.mark_oom();
                return None;
            }
        };
        node_alloc::init_node(new_node, leaf);
        let new_parts = carve::<T>(new_node, &self.layout);

        let mut cloned = 0usize;
        for i in 0..nitems {
            let src = &*(parts.items_ptr as *const T).add(i);
            match src.try_clone_item() {
                Some(item) => {
                    core::ptr::write((new_parts.items_ptr as *mut T).add(i), item);
                    cloned += 1;
                }
                None => {
                    for j in 0..cloned {
                        core::ptr::drop_in_place((new_parts.items_ptr as *mut T).add(j));
                    }
                    self.alloc
                        .dealloc(new_node, self.layout.bytes, self.layout.max_align);
                    self.mark_oom();
                    return None;
                }
            }
        }
        (*new_parts.hdr).nitems = nitems as u16;

        if !leaf {
            for i in 0..=nitems {
                let child = core::ptr::read(parts.children_ptr.add(i)).assume_init();
                let child_hdr = &*(child.as_ptr() as *const crate::layout::NodeHeader);
                rc::acquire(&child_hdr.rc);
                core::ptr::write(new_parts.children_ptr.add(i), core::mem::MaybeUninit::new(child));
            }
        }

        // One fewer owner of the original shared node.
        let _ = rc::release(&(*parts.hdr).rc);
        Some(new_node)
    }
}

impl<T: CloneItem, C: Comparator<T>> Tree<T, C> {
    /// Empty the tree, freeing every node reachable from the root (via
    /// [`Tree::release_node`], which respects shared ownership) and resetting
    /// `count`/`height` to zero.
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            unsafe { self.release_node(root) };
        }
        self.count = 0;
        self.height = 0;
        self.oom = false;
    }
}

impl<T, C: Comparator<T> + Clone> Clone for Tree<T, C> {
    /// Produce an independent shard sharing all existing nodes. No node is
    /// copied here -- the root's reference count is simply bumped, and every
    /// subsequent mutation on either side shadow-copies its own path before
    /// writing, per [`Tree::ensure_owned`].
    fn clone(&self) -> Self {
        if let Some(root) = self.root {
            let hdr = unsafe { &(*(root.as_ptr() as *const crate::layout::NodeHeader)).rc };
            rc::acquire(hdr);
        }
        Tree {
            root: self.root,
            layout: self.layout,
            cmp: self.cmp.clone(),
            alloc: self.alloc.clone(),
            custom_searcher: self.custom_searcher.clone(),
            count: self.count,
            height: self.height,
            oom: false,
            _marker: core::marker::PhantomData,
        }
    }
}
