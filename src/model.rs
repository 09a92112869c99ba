//! Model-based testing against [`BTreeMap`], shared by the property tests and the fuzz targets.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{OrderedTree, TreeError};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Index into the values currently present, to exercise hits.
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Add(ItemValue),
    Remove(ItemValue),
    Exists(ItemValue),
    Count(ItemValue),
    Min,
    Max,
}

impl Op {
    fn finalize(self, present: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Add(item) => FinalOp::Add(get_value(present, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(present, item)),
            Op::Exists(item) => FinalOp::Exists(get_value(present, item)),
            Op::Count(item) => FinalOp::Count(get_value(present, item)),
            Op::Min => FinalOp::Min,
            Op::Max => FinalOp::Max,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Add(u32),
    Remove(u32),
    Exists(u32),
    Count(u32),
    Min,
    Max,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Add),
        value_strategy().prop_map(Op::Remove),
        value_strategy().prop_map(Op::Exists),
        value_strategy().prop_map(Op::Count),
        Just(Op::Min),
        Just(Op::Max),
    ]
}

/// Applies `ops` to an `OrderedTree` seeded with `seed` and to a `BTreeMap` of occurrence counts,
/// asserting that both agree after every operation.
pub fn run_multiset_equivalence(seed: u32, ops: Vec<Op>) {
    let mut counts = BTreeMap::from([(seed, 1usize)]);
    let mut tree = OrderedTree::new(seed);

    for (op_id, op) in ops.into_iter().enumerate() {
        let present: Vec<u32> = counts.keys().copied().collect();
        let final_op = op.finalize(&present);

        match final_op {
            FinalOp::Add(value) => {
                let count = counts.entry(value).or_insert(0);
                *count += 1;

                assert_eq!(tree.add(value), Ok(*count), "Op #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(value) => {
                let from_model = match counts.get_mut(&value) {
                    Some(1) => {
                        counts.remove(&value);
                        true
                    }
                    Some(count) => {
                        *count -= 1;
                        true
                    }
                    None => false,
                };

                assert_eq!(tree.remove(&value), Ok(from_model), "Op #{op_id}: {final_op:?}");
            }

            FinalOp::Exists(value) => {
                assert_eq!(
                    counts.contains_key(&value),
                    tree.exists(&value),
                    "Op #{op_id}: {final_op:?}"
                );
            }

            FinalOp::Count(value) => {
                assert_eq!(
                    counts.get(&value).copied().unwrap_or(0),
                    tree.count(&value),
                    "Op #{op_id}: {final_op:?}"
                );
            }

            FinalOp::Min => {
                let from_model = counts.keys().next().ok_or(TreeError::Empty);
                assert_eq!(from_model, tree.min(), "Op #{op_id}: {final_op:?}");
            }

            FinalOp::Max => {
                let from_model = counts.keys().next_back().ok_or(TreeError::Empty);
                assert_eq!(from_model, tree.max(), "Op #{op_id}: {final_op:?}");
            }
        }

        tree.assert_invariants();
        assert!(tree.is_balanced());
        assert_eq!(counts.len(), tree.len());
        assert_eq!(counts.values().sum::<usize>(), tree.occurrences());
        assert!(counts.keys().eq(tree.iter()));
    }
}

/// Input for [`run_multiset_equivalence`] as produced by a fuzzer.
#[derive(Clone, Debug, Arbitrary)]
pub struct MultisetEquivalenceInput {
    pub seed: u32,
    pub ops: Vec<Op>,
}
