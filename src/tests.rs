use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn add_find_all(keys: &[u32]) {
    let Some((&seed, rest)) = keys.split_first() else {
        return;
    };

    let mut tree = OrderedTree::new(seed);
    tree.assert_invariants();

    for &key in rest {
        tree.add(key).unwrap();
        tree.assert_invariants();
    }

    for key in keys {
        assert!(tree.exists(key), "{key} not found");
    }
}

#[test]
fn single_elem_find() {
    add_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    add_find_all(&[0, 1]);
    add_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    add_find_all(&[0, 1, 2]);
    add_find_all(&[0, 2, 1]);
    add_find_all(&[1, 0, 2]);
    add_find_all(&[1, 2, 0]);
    add_find_all(&[2, 0, 1]);
    add_find_all(&[2, 1, 0]);
}

// Calls `f` with every permutation of `keys`.
fn permutations(keys: &mut Vec<u32>, k: usize, f: &mut dyn FnMut(&[u32])) {
    if k == keys.len() {
        f(keys);
        return;
    }

    for i in k..keys.len() {
        keys.swap(k, i);
        permutations(keys, k + 1, f);
        keys.swap(k, i);
    }
}

#[test]
fn five_elems_find() {
    permutations(&mut vec![0, 1, 2, 3, 4], 0, &mut add_find_all);
}

fn add_remove_all(keys: &[u32]) {
    let Some((&seed, rest)) = keys.split_first() else {
        return;
    };

    let mut tree = OrderedTree::new(seed);

    for &key in rest {
        tree.add(key).unwrap();
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.remove(key), Ok(true));
        assert!(!tree.exists(key));
        tree.assert_invariants();
    }

    assert!(tree.is_empty());

    for &key in keys {
        tree.add(key).unwrap();
        tree.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.remove(key), Ok(true));
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    add_remove_all(&[0]);
}

#[test]
fn remove_two() {
    add_remove_all(&[0, 1]);
    add_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    add_remove_all(&[0, 1, 2]);
    add_remove_all(&[0, 2, 1]);
    add_remove_all(&[1, 0, 2]);
    add_remove_all(&[1, 2, 0]);
    add_remove_all(&[2, 0, 1]);
    add_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_six() {
    permutations(&mut vec![0, 1, 2, 3, 4, 5], 0, &mut add_remove_all);
}

#[test]
fn small_tree_extrema() {
    let mut tree = OrderedTree::new(10);
    for key in [5, 15, 3, 7] {
        tree.add(key).unwrap();
    }

    assert_eq!(tree.min(), Ok(&3));
    assert_eq!(tree.max(), Ok(&15));
    assert!(tree.is_balanced());
    assert_eq!(tree.to_string(), "10->(5->(3,7),15)");
}

#[test]
fn ascending_adds_stay_balanced() {
    let mut tree = OrderedTree::new(1);

    for key in 2..=4 {
        tree.add(key).unwrap();
        assert!(tree.is_balanced(), "unbalanced after adding {key}: {tree}");
    }

    assert_eq!(tree.to_string(), "2->(1,3->(,4))");
    assert_eq!(tree.depth(), 3);
}

#[test]
fn remove_root_with_two_children() {
    let mut tree = OrderedTree::new("m");
    tree.add("a").unwrap();
    tree.add("z").unwrap();

    assert_eq!(tree.remove(&"m"), Ok(true));

    assert!(!tree.exists(&"m"));
    assert!(tree.exists(&"a"));
    assert!(tree.exists(&"z"));
    assert!(!tree.is_empty());
    assert!(tree.is_balanced());
    assert_eq!(tree.to_string(), "z->(a,)");
    tree.assert_invariants();
}

#[test]
fn duplicates_are_counted() {
    let mut tree = OrderedTree::new(1);
    assert_eq!(tree.add(5), Ok(1));
    assert_eq!(tree.add(5), Ok(2));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.occurrences(), 3);
    assert_eq!(tree.count(&5), 2);

    assert_eq!(tree.remove(&5), Ok(true));
    assert!(tree.exists(&5));
    assert_eq!(tree.count(&5), 1);

    assert_eq!(tree.remove(&5), Ok(true));
    assert!(!tree.exists(&5));
    assert_eq!(tree.count(&5), 0);
    assert_eq!(tree.remove(&5), Ok(false));
    tree.assert_invariants();
}

#[test]
fn seed_is_min_and_max() {
    let tree = OrderedTree::new(42);

    assert_eq!(tree.min(), Ok(&42));
    assert_eq!(tree.max(), Ok(&42));
    assert_eq!(tree.depth(), 1);
    assert!(tree.is_complete());
    assert_eq!(tree.to_string(), "42");
}

#[test]
fn successor_deep_in_right_subtree() {
    let mut tree = OrderedTree::new(50);
    for key in [20, 80, 10, 30, 70, 90, 60, 75, 95, 65] {
        tree.add(key).unwrap();
    }
    tree.add(60).unwrap();
    assert_eq!(tree.to_string(), "70->(50->(20->(10,30),60->(,65)),80->(75,90->(,95)))");

    // 60 is the successor of 50 and carries its count into 50's slot.
    assert_eq!(tree.remove(&50), Ok(true));
    tree.assert_invariants();

    assert_eq!(tree.count(&60), 2);
    assert!(!tree.exists(&50));
    assert_eq!(
        tree.iter().copied().collect::<Vec<_>>(),
        [10, 20, 30, 60, 65, 70, 75, 80, 90, 95]
    );
}

#[test]
fn removing_absent_value_is_noop() {
    let mut tree = OrderedTree::new(1);
    tree.add(2).unwrap();

    assert_eq!(tree.remove(&3), Ok(false));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.to_string(), "1->(,2)");
}

#[test]
fn empty_after_last_removal() {
    let mut tree = OrderedTree::new('x');
    assert_eq!(tree.remove(&'x'), Ok(true));

    assert!(tree.is_empty());
    assert_eq!(tree.min(), Err(TreeError::Empty));
    assert_eq!(tree.max(), Err(TreeError::Empty));
    assert_eq!(tree.depth(), 0);
    assert!(tree.is_balanced());
    assert!(tree.is_complete());
    assert_eq!(tree.to_string(), "");
    tree.assert_invariants();

    // The next value becomes the new root.
    assert_eq!(tree.add('y'), Ok(1));
    assert_eq!(tree.min(), Ok(&'y'));
    tree.assert_invariants();
}

#[test]
fn completeness() {
    let mut tree = OrderedTree::new(2);
    tree.add(1).unwrap();
    assert!(!tree.is_complete());

    tree.add(3).unwrap();
    assert!(tree.is_complete());

    tree.add(4).unwrap();
    assert!(!tree.is_complete());

    tree.remove(&4).unwrap();
    assert!(tree.is_complete());
}

#[test]
fn incomparable_values_are_rejected() {
    let mut tree = OrderedTree::new(1.0);
    tree.add(2.0).unwrap();

    assert_eq!(tree.add(f64::NAN), Err(TreeError::Incomparable));
    assert_eq!(tree.remove(&f64::NAN), Err(TreeError::Incomparable));
    assert!(!tree.exists(&f64::NAN));
    assert_eq!(tree.count(&f64::NAN), 0);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.occurrences(), 2);
    tree.assert_invariants();
}

#[test]
fn error_messages() {
    assert_eq!(TreeError::Empty.to_string(), "tree is empty");
    assert_eq!(
        TreeError::Incomparable.to_string(),
        "value is incomparable with an element of the tree"
    );
}

#[derive(Debug)]
struct Interval {
    start: u32,
    end: u32,
}

// Intervals are ordered only when disjoint; equal only when identical.
impl ThreeWay for Interval {
    fn equals(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }

    fn less_than(&self, other: &Self) -> bool {
        self.end <= other.start
    }

    fn greater_than(&self, other: &Self) -> bool {
        self.start >= other.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[test]
fn structured_values() {
    let iv = |start, end| Interval { start, end };

    let mut tree = OrderedTree::structured(iv(10, 20));
    tree.add(iv(0, 5)).unwrap();
    tree.add(iv(30, 40)).unwrap();
    tree.add(iv(20, 25)).unwrap();
    assert_eq!(tree.add(iv(10, 20)), Ok(2));

    assert_eq!(tree.add(iv(15, 35)), Err(TreeError::Incomparable));
    assert!(!tree.exists(&iv(15, 35)));

    assert_eq!(tree.min().map(|i| i.start), Ok(0));
    assert_eq!(tree.max().map(|i| i.start), Ok(30));
    assert_eq!(
        tree.to_string(),
        "[10, 20)->([0, 5),[30, 40)->([20, 25),))"
    );
    tree.assert_invariants();
}

#[test]
fn closure_comparator() {
    let reverse = |a: &i32, b: &i32| Comparison::from(b.cmp(a));
    let mut tree = OrderedTree::with_comparator(0, reverse);

    for key in 1..10 {
        tree.add(key).unwrap();
        tree.assert_invariants();
    }

    assert_eq!(tree.min(), Ok(&9));
    assert_eq!(tree.max(), Ok(&0));
    assert_eq!(
        tree.iter().copied().collect::<Vec<_>>(),
        [9, 8, 7, 6, 5, 4, 3, 2, 1, 0]
    );
}

#[test]
fn debug_lists_values() {
    let mut tree = OrderedTree::new(2);
    tree.add(1).unwrap();
    tree.add(3).unwrap();

    assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
}

#[test]
fn depth_is_logarithmic() {
    let mut tree = OrderedTree::new(0u32);
    for key in 1..1024 {
        tree.add(key).unwrap();
    }

    // 1024 nodes fit within depth 1.44 * log2(1024).
    assert!(tree.depth() <= 14, "depth {}", tree.depth());
    tree.assert_invariants();
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn multiset_equivalence(
        seed in 0u32..1000,
        ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE),
    ) {
        model::run_multiset_equivalence(seed, ops);
    }

    #[test]
    fn adds_keep_order_and_balance(seed in any::<i32>(), values in proptest::collection::vec(any::<i32>(), 0..200)) {
        let mut tree = OrderedTree::new(seed);

        for &value in &values {
            tree.add(value).unwrap();
            prop_assert!(tree.is_balanced());
        }

        let in_order: Vec<i32> = tree.iter().copied().collect();
        prop_assert!(in_order.windows(2).all(|w| w[0] < w[1]));

        for value in values.iter().chain([&seed]) {
            prop_assert!(tree.exists(value));
            prop_assert!(tree.min().unwrap() <= value);
            prop_assert!(tree.max().unwrap() >= value);
        }
    }

    #[test]
    fn add_then_remove_restores_membership(
        seed in 0u16..500,
        values in proptest::collection::vec(0u16..500, 0..100),
        probe in 500u16..1000,
    ) {
        let mut tree = OrderedTree::new(seed);
        for &value in &values {
            tree.add(value).unwrap();
        }

        prop_assert_eq!(tree.add(probe), Ok(1));
        prop_assert!(tree.exists(&probe));
        prop_assert_eq!(tree.remove(&probe), Ok(true));
        prop_assert!(!tree.exists(&probe));
        prop_assert!(tree.is_balanced());

        for value in values.iter().chain([&seed]) {
            prop_assert!(tree.exists(value));
        }
        tree.assert_invariants();
    }
}
