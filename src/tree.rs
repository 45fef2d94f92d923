//! The B-tree shard: the public per-shard API.
//!
//! A root handle plus a precomputed layout and length counter, carrying
//! copy-on-write node sharing, a search hint, and a sticky `oom` flag
//! for a classic B-tree (items at every level, not only in leaves).

extern crate alloc as alloc_crate;

use alloc_crate::sync::Arc;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::alloc_hooks::{NodeAllocator, SystemAllocator};
use crate::compare::{Comparator, NaturalOrder};
use crate::error::BTreeError;
use crate::layout::NodeLayout;

/// Default `max_items` when the caller passes `0`.
pub const DEFAULT_MAX_ITEMS: u16 = 256;
/// Hard cap so `nitems` always fits comfortably in the header's `u16` and a
/// node search stays cheap.
pub const MAX_MAX_ITEMS: u16 = 2045;

pub(crate) type Searcher<T> = dyn Fn(&[T], &T) -> (usize, bool);

/// A single ordered-map shard: a classic B-tree over opaque, fixed-shape
/// items `T`, ordered by `C`.
pub struct Tree<T, C = NaturalOrder>
where
    C: Comparator<T>,
{
    pub(crate) root: Option<NonNull<u8>>,
    pub(crate) layout: NodeLayout,
    pub(crate) cmp: C,
    pub(crate) alloc: Arc<dyn NodeAllocator + Send + Sync>,
    pub(crate) custom_searcher: Option<Arc<Searcher<T>>>,
    pub(crate) count: usize,
    pub(crate) height: usize,
    pub(crate) oom: bool,
    pub(crate) _marker: PhantomData<T>,
}

/// Construction-time options for a shard.
pub struct BTreeConfig<C = NaturalOrder> {
    pub max_items: u16,
    pub comparator: C,
    pub allocator: Option<Arc<dyn NodeAllocator + Send + Sync>>,
}

impl BTreeConfig<NaturalOrder> {
    pub fn new() -> Self {
        BTreeConfig {
            max_items: 0,
            comparator: NaturalOrder,
            allocator: None,
        }
    }
}

impl Default for BTreeConfig<NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> BTreeConfig<C> {
    /// Swap in a custom comparator, dropping the default `NaturalOrder`.
    pub fn with_comparator<T, C2: Comparator<T>>(self, comparator: C2) -> BTreeConfig<C2> {
        BTreeConfig {
            max_items: self.max_items,
            comparator,
            allocator: self.allocator,
        }
    }

    pub fn max_items(mut self, max_items: u16) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn allocator(mut self, allocator: Arc<dyn NodeAllocator + Send + Sync>) -> Self {
        self.allocator = Some(allocator);
        self
    }
}

/// Normalize a requested `max_items`: `0` means "default to 256"; `1` is
/// bumped to `3` (a node needs room for at least one median during a
/// split); the result is capped at
/// [`MAX_MAX_ITEMS`] and coerced to odd so a median index always exists.
pub(crate) fn normalize_max_items(requested: u16) -> Result<u16, BTreeError> {
    let mut m = if requested == 0 {
        DEFAULT_MAX_ITEMS
    } else {
        requested
    };
    if m == 1 {
        m = 3;
    }
    if m < 3 {
        return Err(BTreeError::InvalidMaxItems(requested));
    }
    m = m.min(MAX_MAX_ITEMS);
    if m % 2 == 0 {
        m -= 1;
    }
    Ok(m)
}

impl<T, C: Comparator<T>> Tree<T, C> {
    pub fn with_config(config: BTreeConfig<C>) -> Result<Self, BTreeError> {
        let max_items = normalize_max_items(config.max_items)?;
        let layout = NodeLayout::compute_for_cap::<T>(max_items);
        Ok(Tree {
            root: None,
            layout,
            cmp: config.comparator,
            alloc: config
                .allocator
                .unwrap_or_else(|| Arc::new(SystemAllocator)),
            custom_searcher: None,
            count: 0,
            height: 0,
            oom: false,
            _marker: PhantomData,
        })
    }

    pub fn set_searcher(&mut self, searcher: Arc<Searcher<T>>) {
        self.custom_searcher = Some(searcher);
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn oom(&self) -> bool {
        self.oom
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn max_items(&self) -> u16 {
        self.layout.max_items
    }

    #[inline]
    pub fn min_items(&self) -> u16 {
        self.layout.max_items / 2
    }

    pub(crate) fn mark_oom(&mut self) {
        self.oom = true;
    }

    pub(crate) fn clear_oom(&mut self) {
        self.oom = false;
    }
}

impl<T: Clone, C: Comparator<T> + Default> Tree<T, C> {
    /// Convenience constructor for the common case: default comparator,
    /// default allocator, just a capacity.
    pub fn new(max_items: u16) -> Result<Self, BTreeError> {
        Self::with_config(BTreeConfig {
            max_items,
            comparator: C::default(),
            allocator: None,
        })
    }
}

impl<T: crate::compare::CloneItem, C: Comparator<T>> Drop for Tree<T, C> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            unsafe {
                self.release_node(root);
            }
        }
    }
}
