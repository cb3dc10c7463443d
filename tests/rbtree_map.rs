use std::collections::BTreeMap;

use crimson_tree::RBTreeMap;
use crimson_tree::rbtree_map::Entry;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

/// Generates keys in a range small enough to force collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -10_000i64..10_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    RemoveEntry(i64),
    Get(i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    EntryOrInsert(i64, i64),
    EntryAndModify(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        2 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::EntryOrInsert(k, v)),
        1 => key_strategy().prop_map(MapOp::EntryAndModify),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeMap and
    /// BTreeMap and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(rb_map.insert(*k, *v), bt_map.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(rb_map.remove(k), bt_map.remove(k), "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    prop_assert_eq!(rb_map.remove_entry(k), bt_map.remove_entry(k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(rb_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(rb_map.get_key_value(k), bt_map.get_key_value(k), "get_key_value({})", k);
                }
                MapOp::EntryOrInsert(k, v) => {
                    let rb_result = *rb_map.entry(*k).or_insert(*v);
                    let bt_result = *bt_map.entry(*k).or_insert(*v);
                    prop_assert_eq!(rb_result, bt_result, "entry({}).or_insert({})", k, v);
                }
                MapOp::EntryAndModify(k) => {
                    rb_map.entry(*k).and_modify(|v| *v = v.wrapping_add(1)).or_insert(0);
                    bt_map.entry(*k).and_modify(|v| *v = v.wrapping_add(1)).or_insert(0);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(rb_map.first_key_value(), bt_map.first_key_value(), "first_key_value");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(rb_map.last_key_value(), bt_map.last_key_value(), "last_key_value");
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(rb_map.pop_first(), bt_map.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(rb_map.pop_last(), bt_map.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }
    }

    /// Tests that iteration order matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for (k, v) in &entries {
            rb_map.insert(*k, *v);
            bt_map.insert(*k, *v);
        }

        // Forward iteration
        let rb_items: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_items, &bt_items, "iter() mismatch");

        // Reverse iteration
        let rb_rev: Vec<_> = rb_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_rev, &bt_rev, "iter().rev() mismatch");

        // Alternating from both ends
        let mut rb_iter = rb_map.iter();
        let mut bt_iter = bt_map.iter();
        let mut from_front = true;
        loop {
            let (rb_item, bt_item) = if from_front {
                (rb_iter.next(), bt_iter.next())
            } else {
                (rb_iter.next_back(), bt_iter.next_back())
            };
            prop_assert_eq!(rb_item, bt_item, "alternating iteration mismatch");
            if rb_item.is_none() {
                break;
            }
            from_front = !from_front;
        }

        // Keys and values
        let rb_keys: Vec<_> = rb_map.keys().copied().collect();
        let bt_keys: Vec<_> = bt_map.keys().copied().collect();
        prop_assert_eq!(&rb_keys, &bt_keys, "keys() mismatch");

        let rb_vals: Vec<_> = rb_map.values().copied().collect();
        let bt_vals: Vec<_> = bt_map.values().copied().collect();
        prop_assert_eq!(&rb_vals, &bt_vals, "values() mismatch");

        // Owning iterators
        let rb_into: Vec<_> = rb_map.clone().into_iter().collect();
        let bt_into: Vec<_> = bt_map.clone().into_iter().collect();
        prop_assert_eq!(&rb_into, &bt_into, "into_iter() mismatch");

        let rb_into_keys: Vec<_> = rb_map.clone().into_keys().collect();
        let bt_into_keys: Vec<_> = bt_map.clone().into_keys().collect();
        prop_assert_eq!(&rb_into_keys, &bt_into_keys, "into_keys() mismatch");

        let rb_into_vals: Vec<_> = rb_map.clone().into_values().collect();
        let bt_into_vals: Vec<_> = bt_map.clone().into_values().collect();
        prop_assert_eq!(&rb_into_vals, &bt_into_vals, "into_values() mismatch");

        // Mutable iteration
        for (_, v) in rb_map.iter_mut() {
            *v = v.wrapping_mul(3);
        }
        for (_, v) in bt_map.iter_mut() {
            *v = v.wrapping_mul(3);
        }
        let rb_mutated: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_mutated: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_mutated, &bt_mutated, "iter_mut() mismatch");
    }

    /// Range queries agree with BTreeMap for arbitrary bounds.
    #[test]
    fn range_matches_btreemap(
        entries in proptest::collection::vec((-500i64..500, value_strategy()), 0..300),
        start in -600i64..600,
        width in 0i64..400,
    ) {
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();
        for (k, v) in &entries {
            rb_map.insert(*k, *v);
            bt_map.insert(*k, *v);
        }
        let end = start + width;

        let rb_range: Vec<_> = rb_map.range(start..end).map(|(&k, &v)| (k, v)).collect();
        let bt_range: Vec<_> = bt_map.range(start..end).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_range, &bt_range, "range({}..{}) mismatch", start, end);

        let rb_inclusive: Vec<_> = rb_map.range(start..=end).rev().map(|(&k, &v)| (k, v)).collect();
        let bt_inclusive: Vec<_> = bt_map.range(start..=end).rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_inclusive, &bt_inclusive, "range({}..={}).rev() mismatch", start, end);

        let rb_from: Vec<_> = rb_map.range(start..).map(|(&k, &v)| (k, v)).collect();
        let bt_from: Vec<_> = bt_map.range(start..).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_from, &bt_from, "range({}..) mismatch", start);

        let rb_to: Vec<_> = rb_map.range(..end).map(|(&k, &v)| (k, v)).collect();
        let bt_to: Vec<_> = bt_map.range(..end).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_to, &bt_to, "range(..{}) mismatch", end);

        let rb_all: Vec<_> = rb_map.range(..).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(rb_all.len(), rb_map.len(), "range(..) mismatch");
    }

    /// lower_bound/upper_bound agree with a BTreeMap range probe.
    #[test]
    fn bounds_match_btreemap(
        entries in proptest::collection::vec((-500i64..500, value_strategy()), 0..300),
        probe in -600i64..600,
    ) {
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();
        for (k, v) in &entries {
            rb_map.insert(*k, *v);
            bt_map.insert(*k, *v);
        }

        prop_assert_eq!(rb_map.lower_bound(&probe), bt_map.range(probe..).next(), "lower_bound({})", probe);
        let mut above = bt_map.range(probe..);
        if bt_map.contains_key(&probe) {
            above.next();
        }
        prop_assert_eq!(rb_map.upper_bound(&probe), above.next(), "upper_bound({})", probe);
    }

    /// Cloned maps are equal, ordered like their sources, and independent.
    #[test]
    fn clone_and_comparisons(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..500)) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut copy = rb_map.clone();

        prop_assert!(copy == rb_map);
        prop_assert_eq!(copy.len(), rb_map.len());

        if let Some((&k, _)) = rb_map.first_key_value() {
            copy.remove(&k);
            prop_assert!(copy != rb_map);
            prop_assert!(!copy.contains_key(&k));
            prop_assert!(rb_map.contains_key(&k));
        }
    }
}

// ─── Deterministic behavior ──────────────────────────────────────────────────

#[test]
fn insert_replaces_value_but_not_key() {
    let mut map = RBTreeMap::new();
    assert_eq!(map.insert(37, "a"), None);
    assert_eq!(map.insert(37, "b"), Some("a"));
    assert_eq!(map.len(), 1);
    assert_eq!(map[&37], "b");
}

#[test]
fn extend_handles_sorted_and_reversed_input() {
    // The hinted fast path has to agree with plain insertion whatever the
    // input order looks like.
    let ascending: RBTreeMap<i32, i32> = (0..1000).map(|k| (k, k)).collect();
    let descending: RBTreeMap<i32, i32> = (0..1000).rev().map(|k| (k, k)).collect();
    assert_eq!(ascending, descending);
    assert_eq!(ascending.len(), 1000);
    assert_eq!(ascending.first_key_value(), Some((&0, &0)));
    assert_eq!(ascending.last_key_value(), Some((&999, &999)));

    let mut shuffled = RBTreeMap::new();
    shuffled.extend((0..1000).filter(|k| k % 3 == 0).map(|k| (k, k)));
    shuffled.extend((0..1000).filter(|k| k % 3 != 0).rev().map(|k| (k, k)));
    assert_eq!(shuffled, ascending);
}

#[test]
fn entry_api_round_trip() {
    let mut map: RBTreeMap<&str, i32> = RBTreeMap::new();

    match map.entry("larch") {
        Entry::Vacant(vacant) => {
            assert_eq!(vacant.key(), &"larch");
            vacant.insert(1);
        }
        Entry::Occupied(_) => panic!("entry should be vacant"),
    }

    match map.entry("larch") {
        Entry::Occupied(mut occupied) => {
            assert_eq!(occupied.get(), &1);
            assert_eq!(occupied.insert(2), 1);
            assert_eq!(occupied.remove_entry(), ("larch", 2));
        }
        Entry::Vacant(_) => panic!("entry should be occupied"),
    }

    assert!(map.is_empty());
    assert_eq!(*map.entry("pine").or_default(), 0);
}

#[test]
fn first_and_last_entries_edit_the_extremes() {
    let mut map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);

    map.first_entry().unwrap().insert("first");
    map.last_entry().unwrap().insert("last");

    assert_eq!(map[&1], "first");
    assert_eq!(map[&2], "b");
    assert_eq!(map[&3], "last");

    assert_eq!(map.first_entry().unwrap().remove_entry(), (1, "first"));
    assert_eq!(map.first_key_value(), Some((&2, &"b")));
}

#[test]
fn empty_map_queries() {
    let map: RBTreeMap<i32, i32> = RBTreeMap::new();
    assert_eq!(map.get(&1), None);
    assert_eq!(map.first_key_value(), None);
    assert_eq!(map.last_key_value(), None);
    assert_eq!(map.lower_bound(&1), None);
    assert_eq!(map.upper_bound(&1), None);
    assert_eq!(map.iter().next(), None);
    assert_eq!(map.iter().next_back(), None);
    assert_eq!(map.range(..).next(), None);
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_panics_on_missing_key() {
    let map = RBTreeMap::from([(1, "a")]);
    let _ = map[&2];
}

#[test]
#[should_panic(expected = "range start is greater than range end")]
fn range_panics_on_inverted_bounds() {
    let map = RBTreeMap::from([(1, "a")]);
    let _ = map.range(5..1);
}

#[test]
fn debug_output_is_ordered() {
    let map = RBTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
    assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b", 3: "c"}"#);
}

#[test]
fn equal_maps_hash_identically() {
    use std::hash::{BuildHasher, RandomState};

    let a = RBTreeMap::from([(1, "a"), (2, "b")]);
    let mut b = RBTreeMap::new();
    b.insert(2, "b");
    b.insert(1, "a");

    let state = RandomState::new();
    assert_eq!(state.hash_one(&a), state.hash_one(&b));
}
