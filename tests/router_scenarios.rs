//! Router scenarios and determinism.

use lr_shard_map::{Entry, HashRouter, LrRouter, NaturalOrder, RangeRouter};

const LEFT_EDGE: i64 = i32::MIN as i64 + 1;
const RIGHT_EDGE: i64 = i32::MAX as i64 - 1;

/// Scenario 5: mu=0, sigma=1e7, 10 segments x 10 shards/segment, default
/// per-shard capacity. Insert {-1_000_000, 0, 1_000_000}, query each back,
/// delete the middle key, confirm the other two remain.
#[test]
fn scenario_5_lr_router_basic_roundtrip() {
    let mut router: LrRouter<Entry<i64>, NaturalOrder> = LrRouter::new(
        0.0,
        1.0e7,
        10,
        10,
        LEFT_EDGE,
        RIGHT_EDGE,
        0,
        NaturalOrder,
    )
    .unwrap();

    assert_eq!(router.segment_count(), 10);
    assert_eq!(router.shards_per_segment(), 10);
    assert_eq!(router.shard_count(), 100);

    for &k in &[-1_000_000i64, 0, 1_000_000] {
        assert_eq!(router.set(Entry::new(k, k)).unwrap(), None);
    }
    assert_eq!(router.count(), 3);

    for &k in &[-1_000_000i64, 0, 1_000_000] {
        assert_eq!(router.get(&Entry::probe(k)), Some(&Entry::new(k, k)));
    }

    assert_eq!(router.delete(&Entry::probe(0)).unwrap(), Some(Entry::new(0, 0)));
    assert_eq!(router.get(&Entry::probe(0)), None);
    assert_eq!(router.get(&Entry::probe(-1_000_000)), Some(&Entry::new(-1_000_000, -1_000_000)));
    assert_eq!(router.get(&Entry::probe(1_000_000)), Some(&Entry::new(1_000_000, 1_000_000)));
    assert_eq!(router.count(), 2);
}

/// The right endpoint of the last segment must always be pinned to the
/// router's global upper bound, and endpoints must be strictly increasing.
#[test]
fn lr_router_endpoints_are_monotonic_and_pinned() {
    let router: LrRouter<Entry<i64>, NaturalOrder> =
        LrRouter::new(0.0, 1.0e7, 10, 4, LEFT_EDGE, RIGHT_EDGE, 0, NaturalOrder).unwrap();
    let endpoints = router.right_endpoints();
    assert_eq!(endpoints.len(), 10);
    assert_eq!(*endpoints.last().unwrap(), RIGHT_EDGE);
    for w in endpoints.windows(2) {
        assert!(w[0] < w[1], "endpoints must be strictly increasing: {:?}", endpoints);
    }
}

/// Router determinism: routing the same key twice (including across a
/// rebuild with identical parameters) always lands on the same shard.
#[test]
fn lr_router_routing_is_deterministic() {
    let router: LrRouter<Entry<i64>, NaturalOrder> =
        LrRouter::new(0.0, 1.0e7, 10, 10, LEFT_EDGE, RIGHT_EDGE, 0, NaturalOrder).unwrap();
    let rebuilt: LrRouter<Entry<i64>, NaturalOrder> =
        LrRouter::new(0.0, 1.0e7, 10, 10, LEFT_EDGE, RIGHT_EDGE, 0, NaturalOrder).unwrap();

    let mut rng_state: u64 = 0x9E3779B97F4A7C15;
    let mut next = || {
        // xorshift64*, good enough for test key generation without pulling
        // in an RNG dependency just for this.
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 7;
        rng_state ^= rng_state << 17;
        rng_state
    };

    for _ in 0..10_000 {
        let raw = (next() as i64) % (RIGHT_EDGE - LEFT_EDGE);
        let key = LEFT_EDGE + raw.abs();
        let route_a = router.route(key);
        let route_b = router.route(key);
        let route_rebuilt = rebuilt.route(key);
        assert_eq!(route_a, route_b);
        assert_eq!(route_a, route_rebuilt);
    }
}

#[test]
fn lr_router_rejects_invalid_construction() {
    assert!(LrRouter::<Entry<i64>, NaturalOrder>::new(
        0.0, 1.0e7, 0, 10, LEFT_EDGE, RIGHT_EDGE, 0, NaturalOrder
    )
    .is_err());
    assert!(LrRouter::<Entry<i64>, NaturalOrder>::new(
        0.0, 1.0e7, 10, 0, LEFT_EDGE, RIGHT_EDGE, 0, NaturalOrder
    )
    .is_err());
    assert!(LrRouter::<Entry<i64>, NaturalOrder>::new(
        0.0, 1.0e7, 10, 10, RIGHT_EDGE, LEFT_EDGE, 0, NaturalOrder
    )
    .is_err());
    assert!(LrRouter::<Entry<i64>, NaturalOrder>::new(
        0.0, -1.0, 10, 10, LEFT_EDGE, RIGHT_EDGE, 0, NaturalOrder
    )
    .is_err());
    assert!(LrRouter::<Entry<i64>, NaturalOrder>::new(
        0.0, f64::NAN, 10, 10, LEFT_EDGE, RIGHT_EDGE, 0, NaturalOrder
    )
    .is_err());
}

#[test]
fn range_router_routes_by_equal_width_slice() {
    let router: RangeRouter<Entry<i64>, NaturalOrder> =
        RangeRouter::new(0, 100, 10, 0, NaturalOrder).unwrap();
    assert_eq!(router.route(0), 0);
    assert_eq!(router.route(9), 0);
    assert_eq!(router.route(10), 1);
    assert_eq!(router.route(99), 9);
    // Out-of-range keys clamp to the nearest edge shard rather than panic.
    assert_eq!(router.route(-1_000), 0);
    assert_eq!(router.route(1_000_000), 9);
}

#[test]
fn range_router_set_get_delete_roundtrip() {
    let mut router: RangeRouter<Entry<i32>, NaturalOrder> =
        RangeRouter::new(0, 1000, 8, 0, NaturalOrder).unwrap();
    for k in 0..1000i64 {
        router.set(Entry::new(k, k as i32)).unwrap();
    }
    assert_eq!(router.count(), 1000);
    for k in 0..1000i64 {
        assert_eq!(router.get(&Entry::probe(k)).map(|e| e.value), Some(k as i32));
    }
    for k in (0..1000i64).step_by(2) {
        assert_eq!(router.delete(&Entry::probe(k)).unwrap().map(|e| e.value), Some(k as i32));
    }
    assert_eq!(router.count(), 500);
}

#[test]
fn hash_router_is_consistent_and_nonnegative_for_negative_keys() {
    let router: HashRouter<Entry<i64>, NaturalOrder> = HashRouter::new(7, 0, NaturalOrder).unwrap();
    for k in -50i64..50 {
        let idx = router.route(k);
        assert!(idx < 7);
        assert_eq!(idx, router.route(k));
    }
}

#[test]
fn hash_router_set_get_delete_roundtrip() {
    let mut router: HashRouter<Entry<i64>, NaturalOrder> = HashRouter::new(5, 0, NaturalOrder).unwrap();
    for k in -200i64..200 {
        router.set(Entry::new(k, k * 2)).unwrap();
    }
    assert_eq!(router.count(), 400);
    for k in -200i64..200 {
        assert_eq!(router.get(&Entry::probe(k)).map(|e| e.value), Some(k * 2));
    }
    for k in -200i64..0 {
        assert_eq!(router.delete(&Entry::probe(k)).unwrap().map(|e| e.value), Some(k * 2));
    }
    assert_eq!(router.count(), 200);
}
