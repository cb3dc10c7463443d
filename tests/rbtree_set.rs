use std::collections::BTreeSet;

use crimson_tree::RBTreeSet;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

/// Generates values in a range small enough to force collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -10_000i64..10_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Take(i64),
    Contains(i64),
    Get(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => value_strategy().prop_map(SetOp::Get),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeSet and
    /// BTreeSet and asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(rb_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(rb_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Take(v) => {
                    prop_assert_eq!(rb_set.take(v), bt_set.take(v), "take({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(rb_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::Get(v) => {
                    prop_assert_eq!(rb_set.get(v), bt_set.get(v), "get({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(rb_set.first(), bt_set.first(), "first");
                }
                SetOp::Last => {
                    prop_assert_eq!(rb_set.last(), bt_set.last(), "last");
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(rb_set.pop_first(), bt_set.pop_first(), "pop_first");
                }
                SetOp::PopLast => {
                    prop_assert_eq!(rb_set.pop_last(), bt_set.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(rb_set.len(), bt_set.len(), "len mismatch after {:?}", op);
        }
    }

    /// Iteration order matches BTreeSet after random insertions.
    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        let rb_items: Vec<_> = rb_set.iter().copied().collect();
        let bt_items: Vec<_> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items, "iter() mismatch");

        let rb_rev: Vec<_> = rb_set.iter().rev().copied().collect();
        let bt_rev: Vec<_> = bt_set.iter().rev().copied().collect();
        prop_assert_eq!(&rb_rev, &bt_rev, "iter().rev() mismatch");

        let rb_into: Vec<_> = rb_set.clone().into_iter().collect();
        let bt_into: Vec<_> = bt_set.clone().into_iter().collect();
        prop_assert_eq!(&rb_into, &bt_into, "into_iter() mismatch");
    }

    /// Range queries agree with BTreeSet for arbitrary bounds.
    #[test]
    fn range_matches_btreeset(
        values in proptest::collection::vec(-500i64..500, 0..300),
        start in -600i64..600,
        width in 0i64..400,
    ) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();
        let end = start + width;

        let rb_range: Vec<_> = rb_set.range(start..end).copied().collect();
        let bt_range: Vec<_> = bt_set.range(start..end).copied().collect();
        prop_assert_eq!(&rb_range, &bt_range, "range({}..{}) mismatch", start, end);

        let rb_rev: Vec<_> = rb_set.range(start..=end).rev().copied().collect();
        let bt_rev: Vec<_> = bt_set.range(start..=end).rev().copied().collect();
        prop_assert_eq!(&rb_rev, &bt_rev, "range({}..={}).rev() mismatch", start, end);
    }
}

// ─── Deterministic behavior ──────────────────────────────────────────────────

#[test]
fn insert_keeps_the_original_element() {
    let mut set = RBTreeSet::new();
    assert!(set.insert(2));
    assert!(!set.insert(2));
    assert_eq!(set.len(), 1);
}

#[test]
fn replace_swaps_the_stored_element() {
    let mut set: RBTreeSet<Vec<i32>> = RBTreeSet::new();
    set.insert(Vec::new());

    assert_eq!(set.get(&[][..]).unwrap().capacity(), 0);
    let replaced = set.replace(Vec::with_capacity(10));
    assert_eq!(replaced.unwrap().capacity(), 0);
    assert_eq!(set.get(&[][..]).unwrap().capacity(), 10);
    assert_eq!(set.len(), 1);
}

#[test]
fn bounds_step_over_missing_values() {
    let set = RBTreeSet::from([2, 4, 8]);
    assert_eq!(set.lower_bound(&3), Some(&4));
    assert_eq!(set.lower_bound(&4), Some(&4));
    assert_eq!(set.upper_bound(&4), Some(&8));
    assert_eq!(set.upper_bound(&8), None);
}

#[test]
fn sets_compare_by_ordered_contents() {
    let a = RBTreeSet::from([1, 2, 3]);
    let b = RBTreeSet::from([3, 2, 1]);
    let c = RBTreeSet::from([1, 2, 4]);

    assert_eq!(a, b);
    assert!(a < c);
    assert_eq!(format!("{a:?}"), "{1, 2, 3}");
}

#[test]
fn empty_set_queries() {
    let set: RBTreeSet<i32> = RBTreeSet::new();
    assert_eq!(set.first(), None);
    assert_eq!(set.last(), None);
    assert_eq!(set.iter().next(), None);
    assert_eq!(set.range(..).next(), None);
    assert!(!set.contains(&1));
}
