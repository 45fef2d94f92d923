//! An in-memory ordered key/value container with a learned-index front end.
//!
//! A [`router`] maps an integer routing key to one of many independent
//! B-tree [`tree::Tree`] shards; each shard is an ordered map over an opaque
//! item type `T` via a pluggable [`compare::Comparator`]. Three routers are
//! provided: [`router::LrRouter`] (a piecewise-linear fit to the key
//! distribution's CDF), and the two baselines, [`router::RangeRouter`]
//! (equal-width ranges) and [`router::HashRouter`] (modulus). Routers never
//! cross shards -- each operation is dispatched to exactly one shard, which
//! then behaves as an ordinary B-tree.
//!
//! The B-tree core itself (insert/replace, point lookup, delete including
//! pop-min/pop-max, bulk load, forward/reverse range scans, a stateful
//! cursor, copy-on-write clones, and a search hint) lives in [`tree::Tree`]
//! and is the bulk of this crate; the routers are comparatively thin
//! dispatch layers over an array (or two-level array, for the learned
//! index) of shards.
//!
//! Built on raw single-allocation nodes with a precomputed layout under
//! `#![no_std] + extern crate alloc`: a classic B-tree (items at every
//! level, not only in leaves) with copy-on-write node sharing and a
//! two-tier router on top.

#![no_std]

extern crate alloc;

pub mod alloc_hooks;
pub mod compare;
mod cow;
mod cursor;
mod delete;
pub mod entry;
pub mod error;
mod get;
mod hint;
mod insert;
mod layout;
mod node_alloc;
pub mod router;
mod rc;
mod scan;
mod search;
pub mod tree;

pub use compare::{Comparator, FnComparator, Keyed, NaturalOrder};
pub use cursor::Cursor;
pub use entry::Entry;
pub use error::{BTreeError, LrTreeError, RouterError};
pub use hint::Hint;
pub use router::{HashRouter, LrRouter, RangeRouter};
pub use scan::ScanControl;
pub use tree::{BTreeConfig, Tree};
