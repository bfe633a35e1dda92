//! Property testing for the B+Tree index as a rust collection, plus the
//! ordered-access and range-view scenarios.

// cspell:ignore oneof

use modifier::Modifier;
use proptest::{
    collection::vec, num, prop_assert, prop_assert_eq, proptest, strategy::Strategy,
    test_runner::TestCaseResult,
};

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use minibase::{BPlusTree, Error, Index};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

mod common;

use crate::common::{compare_collections, ACTIONS_MAX_LEN};

#[derive(Debug, Clone)]
enum MapAction<K, V> {
    // Applied to a small subset of keys (modulo 32) so overwrites happen.
    Put(K, V),
}

impl<K: Ord, V> Modifier<BTreeMap<K, V>> for MapAction<K, V> {
    fn modify(self, map: &mut BTreeMap<K, V>) {
        match self {
            MapAction::Put(k, v) => {
                map.insert(k, v);
            }
        }
    }
}

impl Modifier<BPlusTree<u8, i32>> for MapAction<u8, i32> {
    fn modify(self, tree: &mut BPlusTree<u8, i32>) {
        match self {
            MapAction::Put(k, v) => tree.put(k, v),
        }
    }
}

fn generate_action() -> impl Strategy<Value = MapAction<u8, i32>> {
    (0..32u8, num::i32::ANY).prop_map(|(k, v)| MapAction::Put(k, v))
}

fn compare_btree(tree: &BPlusTree<u8, i32>, ref_map: &BTreeMap<u8, i32>) -> TestCaseResult {
    let invariants = tree.check_invariants();
    prop_assert!(invariants.is_ok(), "broken invariant: {:?}", invariants);
    prop_assert_eq!(tree.len(), ref_map.len());
    for (k, v) in ref_map {
        prop_assert_eq!(tree.get(k), Some(v));
    }
    let mut entries: Vec<_> = tree.entries().collect();
    entries.sort();
    prop_assert!(entries.iter().map(|(k, v)| (k, v)).eq(ref_map.iter()));
    if !ref_map.is_empty() {
        prop_assert_eq!(tree.first_key().ok(), ref_map.keys().next().copied());
        prop_assert_eq!(tree.last_key().ok(), ref_map.keys().next_back().copied());
    }
    Ok(())
}

#[test]
fn compare_btree_to_btree_map() {
    proptest!(|(ref actions in vec(generate_action(), 1..ACTIONS_MAX_LEN))| {
        compare_collections(actions, compare_btree)?;
    });
}

fn odd_squares() -> BPlusTree<i32, i32> {
    let mut tree = BPlusTree::new();
    for k in (1..=29).step_by(2) {
        tree.put(k, k * k);
    }
    tree
}

#[test]
fn point_lookups_over_odd_squares() {
    let tree = odd_squares();
    for i in 0..=29 {
        if i % 2 == 1 {
            assert_eq!(tree.get(&i), Some(&(i * i)));
        } else {
            assert_eq!(tree.get(&i), None);
        }
    }
    assert_eq!(tree.first_key(), Ok(1));
    assert_eq!(tree.last_key(), Ok(29));
    assert_eq!(tree.len(), 15);
    assert_eq!(Index::size(&tree), 15);
    tree.check_invariants().unwrap();
    assert!(tree.node_visits() > 0);
}

#[test]
fn sub_map_restricts_first_last_and_size() {
    let mut tree = odd_squares();
    let view = tree.sub_map(6, 20).unwrap();
    assert_eq!(view.first_key(), Ok(7));
    assert_eq!(view.last_key(), Ok(19));
    // keys 7, 9, 11, 13, 15, 17, 19
    assert_eq!(view.size(), 7);
    assert_eq!(view.get(&7), Some(&49));
    assert!(view.contains_key(&19));
    assert!(!view.contains_key(&5));
    assert_eq!(view.get(&21), None);
}

#[test]
fn head_and_tail_views() {
    let mut tree = odd_squares();
    assert_eq!(tree.head_map(10).size(), 5);
    assert_eq!(tree.head_map(1).size(), 0);
    assert_eq!(tree.tail_map(10).size(), 10);
    assert_eq!(tree.tail_map(11).first_key(), Ok(11));

    let head = tree.head_map(21);
    let narrowed = head.tail_map(9).unwrap();
    assert_eq!(narrowed.size(), 6);
    assert_eq!(narrowed.first_key(), Ok(9));
    assert_eq!(narrowed.last_key(), Ok(19));
}

#[test]
fn refinement_narrows_but_never_broadens() {
    let mut tree = odd_squares();
    let narrowed = tree.sub_map(5, 25).unwrap().sub_map(10, 20).unwrap();
    assert_eq!(narrowed.first_key(), Ok(11));
    assert_eq!(narrowed.last_key(), Ok(19));

    let view = tree.sub_map(5, 25).unwrap();
    assert_matches!(view.sub_map(3, 20), Err(Error::KeyOutOfRange));
    let view = tree.sub_map(5, 25).unwrap();
    assert_matches!(view.sub_map(10, 30), Err(Error::KeyOutOfRange));
    let view = tree.sub_map(5, 25).unwrap();
    assert_matches!(view.tail_map(4), Err(Error::KeyOutOfRange));
    let view = tree.sub_map(5, 25).unwrap();
    assert_matches!(view.head_map(26), Err(Error::KeyOutOfRange));
}

#[test]
fn inverted_ranges_are_inconsistent() {
    let mut tree = odd_squares();
    assert_matches!(tree.sub_map(20, 6), Err(Error::InconsistentRange));
    let view = tree.sub_map(5, 25).unwrap();
    assert_matches!(view.sub_map(20, 10), Err(Error::InconsistentRange));
    // An empty interval is consistent.
    assert_eq!(tree.sub_map(10, 10).unwrap().size(), 0);
}

#[test]
fn first_and_last_fail_on_empty_trees_and_views() {
    let mut tree = BPlusTree::<i32, i32>::new();
    assert_matches!(tree.first_key(), Err(Error::Empty));
    assert_matches!(tree.last_key(), Err(Error::Empty));
    tree.put(5, 25);
    let view = tree.sub_map(0, 5).unwrap();
    assert_matches!(view.first_key(), Err(Error::Empty));
    assert_matches!(view.last_key(), Err(Error::Empty));
}

#[test]
fn duplicate_puts_overwrite_and_warn() {
    let mut tree = odd_squares();
    assert_eq!(tree.overwrites(), 0);
    tree.put(17, -1);
    assert_eq!(tree.get(&17), Some(&-1));
    assert_eq!(tree.len(), 15);
    assert_eq!(tree.overwrites(), 1);
    tree.check_invariants().unwrap();
}

#[test]
fn view_put_writes_through_without_bounds() {
    let mut tree = BPlusTree::new();
    tree.put(5, 25);
    let mut view = tree.sub_map(0, 10).unwrap();
    view.put(50, 2500);
    assert_eq!(view.get(&50), None);
    drop(view);
    assert_eq!(tree.get(&50), Some(&2500));
    assert_eq!(tree.len(), 2);
}

#[test]
fn randomized_bulk_insertion_keeps_invariants() {
    let mut rng = XorShiftRng::from_seed([7; 16]);
    let mut tree = BPlusTree::new();
    let mut reference = BTreeMap::new();
    for _ in 0..512 {
        let key: u16 = rng.gen();
        tree.put(key, u32::from(key));
        reference.insert(key, u32::from(key));
    }
    tree.check_invariants().unwrap();
    assert_eq!(tree.len(), reference.len());
    for (k, v) in &reference {
        assert_eq!(tree.get(k), Some(v));
    }
    assert_eq!(tree.first_key().ok().as_ref(), reference.keys().next());
    assert_eq!(tree.last_key().ok().as_ref(), reference.keys().next_back());
}
