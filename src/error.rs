//! Ambient error handling.
//!
//! `thiserror` derives `Display`/`Error` for one variant per failure mode,
//! each carrying enough context to explain itself.

use thiserror::Error;

/// Failures a B-tree shard can report. Out-of-memory is the core failure
/// mode; the rest are added so a misuse of the public API doesn't have to
/// be a panic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BTreeError {
    #[error("allocator returned null while {during}")]
    OutOfMemory { during: &'static str },
    #[error("max_items must be at least 3, got {0}")]
    InvalidMaxItems(u16),
}

/// Failures specific to constructing a learned-index router.
#[derive(Debug, Error)]
pub enum LrTreeError {
    #[error(
        "segment endpoints are not strictly increasing at index {index} \
         ({prev} >= {next}); sigma is too small for the requested segment \
         count, or the key bounds are too narrow"
    )]
    NonMonotonicEndpoints { index: usize, prev: i64, next: i64 },
    #[error("segment_count must be at least 1, got {0}")]
    InvalidSegmentCount(usize),
    #[error("shards_per_segment must be at least 1, got {0}")]
    InvalidShardsPerSegment(usize),
    #[error("key bounds are empty: left={left} >= right={right}")]
    EmptyKeyRange { left: i64, right: i64 },
    #[error("sigma must be finite and positive, got {0}")]
    InvalidSigma(f64),
    #[error(transparent)]
    Shard(#[from] BTreeError),
}

/// Failures specific to constructing a range or hash router.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("shard_count must be at least 1, got {0}")]
    InvalidShardCount(usize),
    #[error("key bounds are empty: left={left} >= right={right}")]
    EmptyKeyRange { left: i64, right: i64 },
    #[error("{during}: max_items must be at least 3, got {requested}")]
    InvalidMaxItems { during: &'static str, requested: u16 },
    #[error(transparent)]
    Shard(#[from] BTreeError),
}
