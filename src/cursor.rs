//! A stateful, resumable cursor over a tree's in-order sequence.
//!
//! A stack of `(node, index)` frames sized to the tree's height is walked
//! forward or backward one item at a time without re-searching from the
//! root on every step. `seek` is the one operation that does re-search from
//! the root: it finds the item that resembles a predecessor of the target
//! (the search's own insertion point) and -- if the search bottoms out
//! without an exact or larger match in the subtree it was pushed into --
//! resolves the position by walking back up exactly the way [`Cursor::next`]
//! does when a leaf is exhausted, so the two code paths share one
//! correctness argument instead of two.

use alloc::vec::Vec;
use core::ptr::NonNull;

use crate::compare::Comparator;
use crate::layout::carve;
use crate::tree::Tree;

#[derive(Copy, Clone)]
struct Frame {
    node: NonNull<u8>,
    /// For a leaf: the index of the current item (`< nitems`).
    /// For a branch: the index of the child most recently entered
    /// (`0..=nitems`); if `idx < nitems` and this frame is the top of the
    /// stack, `items[idx]` is the surfaced current item.
    idx: usize,
}

/// A cursor positioned at a single item of a [`Tree`], movable one step at a
/// time in either direction.
pub struct Cursor<'a, T, C: Comparator<T>> {
    tree: &'a Tree<T, C>,
    stack: Vec<Frame>,
}

impl<'a, T, C: Comparator<T>> Cursor<'a, T, C> {
    pub(crate) fn new(tree: &'a Tree<T, C>) -> Self {
        Cursor {
            tree,
            stack: Vec::new(),
        }
    }

    #[inline]
    fn leaf(&self, node: NonNull<u8>) -> bool {
        unsafe { (*carve::<T>(node, &self.tree.layout).hdr).leaf }
    }

    #[inline]
    fn nitems(&self, node: NonNull<u8>) -> usize {
        unsafe { (*carve::<T>(node, &self.tree.layout).hdr).nitems as usize }
    }

    #[inline]
    fn item_at<'b>(&'b self, node: NonNull<u8>, idx: usize) -> &'b T {
        let parts = unsafe { carve::<T>(node, &self.tree.layout) };
        unsafe { &*(parts.items_ptr as *const T).add(idx) }
    }

    #[inline]
    fn child_at(&self, node: NonNull<u8>, idx: usize) -> NonNull<u8> {
        let parts = unsafe { carve::<T>(node, &self.tree.layout) };
        unsafe { core::ptr::read(parts.children_ptr.add(idx)).assume_init() }
    }

    fn push_leftmost(&mut self, mut node: NonNull<u8>) {
        loop {
            let leaf = self.leaf(node);
            self.stack.push(Frame { node, idx: 0 });
            if leaf {
                break;
            }
            node = self.child_at(node, 0);
        }
    }

    fn push_rightmost(&mut self, mut node: NonNull<u8>) {
        loop {
            let leaf = self.leaf(node);
            let n = self.nitems(node);
            if leaf {
                self.stack.push(Frame {
                    node,
                    idx: n.saturating_sub(1),
                });
                break;
            }
            self.stack.push(Frame { node, idx: n });
            node = self.child_at(node, n);
        }
    }

    /// Position at the smallest item in the tree.
    pub fn first(&mut self) -> bool {
        self.stack.clear();
        match self.tree.root {
            Some(root) if self.tree.count() > 0 => {
                self.push_leftmost(root);
                true
            }
            _ => false,
        }
    }

    /// Position at the largest item in the tree.
    pub fn last(&mut self) -> bool {
        self.stack.clear();
        match self.tree.root {
            Some(root) if self.tree.count() > 0 => {
                self.push_rightmost(root);
                true
            }
            _ => false,
        }
    }

    /// Position at the smallest item `>= key`. Returns `false` if no such
    /// item exists, leaving the cursor unpositioned.
    pub fn seek(&mut self, key: &T) -> bool {
        self.stack.clear();
        let mut node = match self.tree.root {
            Some(r) => r,
            None => return false,
        };
        loop {
            let leaf = self.leaf(node);
            let n = self.nitems(node);
            let items =
                unsafe { core::slice::from_raw_parts(carve::<T>(node, &self.tree.layout).items_ptr as *const T, n) };
            let (idx, found) = self.tree.search_items(items, key, None, self.stack.len());
            self.stack.push(Frame { node, idx });
            if found {
                return true;
            }
            if leaf {
                if idx < n {
                    return true;
                }
                return self.resolve_after_exhaustion();
            }
            node = self.child_at(node, idx);
        }
    }

    /// After the top frame turns out to hold no pending item (a leaf ran out
    /// during `seek`, or `next`/`prev` walked off the end of a subtree), pop
    /// frames until one holds a pending item or the stack empties.
    fn resolve_after_exhaustion(&mut self) -> bool {
        loop {
            self.stack.pop();
            match self.stack.last().copied() {
                None => return false,
                Some(top) => {
                    if self.leaf(top.node) {
                        // A leaf should never be re-examined here -- only
                        // branch ancestors are left once a leaf is popped.
                        return top.idx < self.nitems(top.node);
                    }
                    if top.idx < self.nitems(top.node) {
                        return true;
                    }
                }
            }
        }
    }

    /// The item the cursor is currently positioned at, if any.
    pub fn item(&self) -> Option<&T> {
        let top = self.stack.last()?;
        if top.idx < self.nitems(top.node) {
            Some(self.item_at(top.node, top.idx))
        } else {
            None
        }
    }

    /// Advance to the next item in ascending order. Returns `false` and
    /// leaves the cursor unpositioned if there is no next item.
    pub fn next(&mut self) -> bool {
        let mut just_popped = false;
        loop {
            let top = match self.stack.last().copied() {
                Some(f) => f,
                None => return false,
            };
            let leaf = self.leaf(top.node);
            let n = self.nitems(top.node);
            if leaf {
                if top.idx + 1 < n {
                    self.stack.last_mut().unwrap().idx += 1;
                    return true;
                }
                self.stack.pop();
                just_popped = true;
                continue;
            }
            if just_popped {
                if top.idx < n {
                    return true;
                }
                self.stack.pop();
                continue;
            }
            if top.idx < n {
                let nxt = top.idx + 1;
                self.stack.last_mut().unwrap().idx = nxt;
                let child = self.child_at(top.node, nxt);
                self.push_leftmost(child);
                return true;
            }
            self.stack.pop();
            just_popped = true;
        }
    }

    /// Move to the previous item in ascending order (i.e. the next item in
    /// descending order). Mirrors [`Cursor::next`].
    pub fn prev(&mut self) -> bool {
        let mut just_popped = false;
        loop {
            let top = match self.stack.last().copied() {
                Some(f) => f,
                None => return false,
            };
            let leaf = self.leaf(top.node);
            if leaf {
                if top.idx > 0 {
                    self.stack.last_mut().unwrap().idx -= 1;
                    return true;
                }
                self.stack.pop();
                just_popped = true;
                continue;
            }
            if just_popped {
                if top.idx > 0 {
                    self.stack.last_mut().unwrap().idx -= 1;
                    return true;
                }
                self.stack.pop();
                continue;
            }
            // `top.idx` is the already-surfaced item; its predecessor lies
            // at the bottom of the child immediately to its left, which is
            // also `top.idx` -- valid even when `top.idx == 0`, since a
            // branch frame only reaches this arm holding a genuinely
            // surfaced item (always `< nitems`), and child index `0` is as
            // much a real child as any other. Mirrors `next`'s
            // `if top.idx < n`, which is likewise always true when that arm
            // is reached.
            let child = self.child_at(top.node, top.idx);
            self.push_rightmost(child);
            return true;
        }
    }
}

impl<T, C: Comparator<T>> Tree<T, C> {
    /// Open a cursor over this tree, unpositioned until [`Cursor::first`],
    /// [`Cursor::last`], or [`Cursor::seek`] is called.
    pub fn cursor(&self) -> Cursor<'_, T, C> {
        Cursor::new(self)
    }
}
