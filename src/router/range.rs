//! The range router: equal-width key ranges over a flat array of shards.
//!
//! `width = (right - left) / shard_count`, shard index
//! `= clamp((key - left) / width, 0, shard_count - 1)`. The subtraction and
//! division are carried out in `i128` before narrowing to `usize`, so the
//! default bounds near `i64::MAX`/`i64::MIN` cannot overflow.

extern crate alloc as alloc_crate;

use alloc_crate::vec::Vec;

use crate::compare::{CloneItem, Comparator, Keyed};
use crate::error::{BTreeError, RouterError};
use crate::tree::{BTreeConfig, Tree};

/// Equal-width range router: `shard_count` shards, each responsible for one
/// contiguous slice of `[left, right]`.
pub struct RangeRouter<T, C: Comparator<T>> {
    shards: Vec<Tree<T, C>>,
    left: i64,
    width: i128,
}

impl<T, C> RangeRouter<T, C>
where
    T: Keyed + CloneItem,
    C: Comparator<T> + Clone,
{
    /// Build `shard_count` empty shards, each an ordinary B-tree with the
    /// given `max_items` and `comparator`, covering `[left, right]` in
    /// equal-width slices.
    pub fn new(
        left: i64,
        right: i64,
        shard_count: usize,
        max_items: u16,
        comparator: C,
    ) -> Result<Self, RouterError> {
        if shard_count == 0 {
            return Err(RouterError::InvalidShardCount(shard_count));
        }
        if right <= left {
            return Err(RouterError::EmptyKeyRange { left, right });
        }
        let span = (right as i128) - (left as i128);
        let width = (span / shard_count as i128).max(1);

        let mut shards = Vec::with_capacity(shard_count);
        for _ in 0..shard_count {
            let tree = Tree::with_config(BTreeConfig {
                max_items,
                comparator: comparator.clone(),
                allocator: None,
            })
            .map_err(|e| match e {
                BTreeError::InvalidMaxItems(requested) => RouterError::InvalidMaxItems {
                    during: "range router shard construction",
                    requested,
                },
                other => RouterError::Shard(other),
            })?;
            shards.push(tree);
        }

        Ok(RangeRouter {
            shards,
            left,
            width,
        })
    }

    /// The shard index a given routing key maps to.
    pub fn route(&self, key: i64) -> usize {
        let offset = (key as i128) - (self.left as i128);
        let idx = offset.div_euclid(self.width);
        idx.clamp(0, self.shards.len() as i128 - 1) as usize
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn shards(&self) -> &[Tree<T, C>] {
        &self.shards
    }

    pub fn shards_mut(&mut self) -> &mut [Tree<T, C>] {
        &mut self.shards
    }

    /// Total items across every shard.
    pub fn count(&self) -> usize {
        self.shards.iter().map(Tree::count).sum()
    }

    pub fn get(&self, probe: &T) -> Option<&T> {
        self.shards[self.route(probe.route_key())].get(probe)
    }

    pub fn set(&mut self, item: T) -> Result<Option<T>, BTreeError> {
        let idx = self.route(item.route_key());
        self.shards[idx].set(item)
    }

    pub fn delete(&mut self, probe: &T) -> Result<Option<T>, BTreeError> {
        let idx = self.route(probe.route_key());
        self.shards[idx].delete(probe)
    }
}
