//! Stateful cursor behavior.

use lr_shard_map::Tree;

fn build(keys: &[i32]) -> Tree<i32> {
    let mut tree: Tree<i32> = Tree::new(5).unwrap();
    for &k in keys {
        tree.set(k).unwrap();
    }
    tree
}

#[test]
fn first_and_last_on_empty_tree() {
    let tree: Tree<i32> = Tree::new(0).unwrap();
    let mut cursor = tree.cursor();
    assert!(!cursor.first());
    assert_eq!(cursor.item(), None);
    assert!(!cursor.last());
    assert_eq!(cursor.item(), None);
}

#[test]
fn first_last_walk_matches_ascend_descend() {
    let keys: Vec<i32> = (0..200).collect();
    let tree = build(&keys);

    let mut cursor = tree.cursor();
    assert!(cursor.first());
    let mut forward = Vec::new();
    loop {
        forward.push(*cursor.item().unwrap());
        if !cursor.next() {
            break;
        }
    }
    assert_eq!(forward, keys);

    let mut cursor = tree.cursor();
    assert!(cursor.last());
    let mut backward = Vec::new();
    loop {
        backward.push(*cursor.item().unwrap());
        if !cursor.prev() {
            break;
        }
    }
    let mut expected = keys.clone();
    expected.reverse();
    assert_eq!(backward, expected);
}

#[test]
fn seek_lands_on_smallest_item_not_less_than_key() {
    let tree = build(&[10, 20, 30, 40, 50]);
    let mut cursor = tree.cursor();

    assert!(cursor.seek(&25));
    assert_eq!(cursor.item(), Some(&30));

    assert!(cursor.seek(&30));
    assert_eq!(cursor.item(), Some(&30));

    assert!(cursor.seek(&0));
    assert_eq!(cursor.item(), Some(&10));

    assert!(!cursor.seek(&51));
    assert_eq!(cursor.item(), None);
}

#[test]
fn seek_then_next_prev_roundtrip() {
    let keys: Vec<i32> = (0..300).step_by(3).collect();
    let tree = build(&keys);
    let mut cursor = tree.cursor();

    assert!(cursor.seek(&150));
    let start = *cursor.item().unwrap();
    assert!(keys.binary_search(&start).is_ok());

    let mut forward = vec![start];
    for _ in 0..10 {
        assert!(cursor.next());
        forward.push(*cursor.item().unwrap());
    }
    for w in forward.windows(2) {
        assert!(w[0] < w[1]);
    }

    for _ in 0..10 {
        assert!(cursor.prev());
    }
    assert_eq!(cursor.item(), Some(&start));
}

#[test]
fn next_past_the_end_and_prev_past_the_start_unposition() {
    let tree = build(&[1, 2, 3]);
    let mut cursor = tree.cursor();
    assert!(cursor.first());
    assert!(cursor.next());
    assert!(cursor.next());
    assert!(!cursor.next());
    assert_eq!(cursor.item(), None);

    assert!(cursor.last());
    assert!(cursor.prev());
    assert!(cursor.prev());
    assert!(!cursor.prev());
    assert_eq!(cursor.item(), None);
}
