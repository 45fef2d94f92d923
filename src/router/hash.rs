//! The hash router: key modulo shard count.
//!
//! `shard_index = ((key % n) + n) % n`, the usual double-modulo trick for a
//! non-negative remainder regardless of the sign of `key` (Rust's `%` keeps
//! the dividend's sign, so a plain `key % n` alone would go negative for
//! negative keys).

extern crate alloc as alloc_crate;

use alloc_crate::vec::Vec;

use crate::compare::{CloneItem, Comparator, Keyed};
use crate::error::{BTreeError, RouterError};
use crate::tree::{BTreeConfig, Tree};

/// Modulus router: `shard_count` shards, `key mod shard_count` picks one.
pub struct HashRouter<T, C: Comparator<T>> {
    shards: Vec<Tree<T, C>>,
}

impl<T, C> HashRouter<T, C>
where
    T: Keyed + CloneItem,
    C: Comparator<T> + Clone,
{
    pub fn new(shard_count: usize, max_items: u16, comparator: C) -> Result<Self, RouterError> {
        if shard_count == 0 {
            return Err(RouterError::InvalidShardCount(shard_count));
        }
        let mut shards = Vec::with_capacity(shard_count);
        for _ in 0..shard_count {
            let tree = Tree::with_config(BTreeConfig {
                max_items,
                comparator: comparator.clone(),
                allocator: None,
            })
            .map_err(|e| match e {
                BTreeError::InvalidMaxItems(requested) => RouterError::InvalidMaxItems {
                    during: "hash router shard construction",
                    requested,
                },
                other => RouterError::Shard(other),
            })?;
            shards.push(tree);
        }
        Ok(HashRouter { shards })
    }

    /// The shard index a given routing key maps to: `((key % n) + n) % n`.
    pub fn route(&self, key: i64) -> usize {
        let n = self.shards.len() as i64;
        (((key % n) + n) % n) as usize
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
