//! Benchmark/demo entry point.
//!
//! Usage: `bench_shards <segments> <shards_per_segment>`. Runs 1e6
//! inserts/queries/updates/deletes against an [`lr_shard_map::LrRouter`]
//! fed Gaussian-distributed `i64` keys, then prints the elapsed wall time in
//! microseconds for each phase and exits 0.
//!
//! Plain `std::time::Instant` timing, no extra benchmark-harness crate;
//! keys are drawn from `rand_distr::Normal`.

use std::env;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use lr_shard_map::{Entry, LrRouter};

const OPS: usize = 1_000_000;
const RAND_MEAN: f64 = 0.0;
const RAND_SIGMA: f64 = 10_000_000.0;
/// Global key bounds; kept well inside `i64` so the LR router's bisection
/// and the range router's width computation never need to reason about
/// saturating arithmetic at the type's extremes.
const LEFT_EDGE: i64 = i32::MIN as i64 + 1;
const RIGHT_EDGE: i64 = i32::MAX as i64 - 1;

fn parse_arg(i: usize, default: usize) -> usize {
    env::args()
        .nth(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn gen_keys(rng: &mut StdRng, n: usize) -> Vec<i64> {
    let normal = Normal::new(RAND_MEAN, RAND_SIGMA).expect("valid normal parameters");
    let mut keys = Vec::with_capacity(n);
    while keys.len() < n {
        let x = normal.sample(rng);
        if x.is_finite() {
            let k = x as i64;
            if k > LEFT_EDGE && k < RIGHT_EDGE {
                keys.push(k);
            }
        }
    }
    keys
}

fn main() {
    let segments: usize = parse_arg(1, 10);
    let shards_per_segment: usize = parse_arg(2, 10);

    let mut rng = StdRng::seed_from_u64(0x5EED);
    let keys = gen_keys(&mut rng, OPS);

    let mut router: LrRouter<Entry<i64>, lr_shard_map::NaturalOrder> = LrRouter::new(
        RAND_MEAN,
        RAND_SIGMA,
        segments,
        shards_per_segment,
        LEFT_EDGE,
        RIGHT_EDGE,
        0,
        lr_shard_map::NaturalOrder,
    )
    .expect("valid LR router parameters");

    let insert_start = Instant::now();
    for (i, &k) in keys.iter().enumerate() {
        router.set(Entry::new(k, i as i64)).expect("insert");
    }
    let insert_us = insert_start.elapsed().as_micros();

    let query_start = Instant::now();
    for &k in &keys {
        let _ = router.get(&Entry::probe(k));
    }
    let query_us = query_start.elapsed().as_micros();

    let update_start = Instant::now();
    for (i, &k) in keys.iter().enumerate() {
        router.set(Entry::new(k, (i as i64).wrapping_neg())).expect("update");
    }
    let update_us = update_start.elapsed().as_micros();

    let delete_start = Instant::now();
    for &k in &keys {
        let _ = router.delete(&Entry::probe(k));
    }
    let delete_us = delete_start.elapsed().as_micros();

    println!(
        "segments={segments} shards_per_segment={shards_per_segment} ops={OPS}"
    );
    println!("insert: {insert_us} us");
    println!("query:  {query_us} us");
    println!("update: {update_us} us");
    println!("delete: {delete_us} us");
}
