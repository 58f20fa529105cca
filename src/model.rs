//! Model-based testing against [`BTreeMap`].
//!
//! Sequences of [`Op`]s are applied both to an [`OrderedMap`] and to a `BTreeMap`, and every
//! result, the length and the full contents are compared after each step. The same driver backs
//! the proptest suite and the fuzz target.

extern crate std;

use std::{collections::BTreeMap, prelude::v1::*};

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{Error, OrderedMap};

/// A key operand, either chosen from the keys currently in the map or drawn at random.
#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
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

fn key_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue, u32),
    TryInsert(ItemValue, u32),
    Find(ItemValue),
    Remove(ItemValue),
    First,
    PopFirst,
    Last,
    PopLast,
}

impl Op {
    fn finalize(self, keys: &[u32]) -> FinalOp {
        fn get_key(keys: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if keys.is_empty() {
                        idx as u32
                    } else {
                        keys[idx % keys.len()]
                    }
                }
                ItemValue::Random(k) => k,
            }
        }

        match self {
            Op::Insert(key, value) => FinalOp::Insert(get_key(keys, key), value),
            Op::TryInsert(key, value) => FinalOp::TryInsert(get_key(keys, key), value),
            Op::Find(key) => FinalOp::Find(get_key(keys, key)),
            Op::Remove(key) => FinalOp::Remove(get_key(keys, key)),
            Op::First => FinalOp::First,
            Op::PopFirst => FinalOp::PopFirst,
            Op::Last => FinalOp::Last,
            Op::PopLast => FinalOp::PopLast,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32, u32),
    TryInsert(u32, u32),
    Find(u32),
    Remove(u32),
    First,
    PopFirst,
    Last,
    PopLast,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        (key_strategy(), 0u32..1000).prop_map(|(k, v)| Op::Insert(k, v)),
        (key_strategy(), 0u32..1000).prop_map(|(k, v)| Op::TryInsert(k, v)),
        key_strategy().prop_map(Op::Find),
        key_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::PopFirst),
        Just(Op::Last),
        Just(Op::PopLast),
    ]
}

pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut btree: BTreeMap<u32, u32> = BTreeMap::new();
    let mut map: OrderedMap<u32, u32> = OrderedMap::new();

    #[inline]
    fn copied(pair: (&u32, &u32)) -> (u32, u32) {
        (*pair.0, *pair.1)
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let keys: Vec<u32> = btree.keys().copied().collect();
        let final_op = op.finalize(&keys);

        match final_op {
            FinalOp::Insert(key, value) => {
                let from_btree = btree.insert(key, value);
                let from_map = map.insert(key, value);

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::TryInsert(key, value) => {
                let from_btree = if btree.contains_key(&key) {
                    Err(Error::DuplicateKey)
                } else {
                    btree.insert(key, value);
                    Ok(value)
                };
                let from_map = map.try_insert(key, value).map(|v| *v);

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Find(key) => {
                let from_btree = btree.get(&key).ok_or(Error::KeyNotFound);
                let from_map = map.find(&key);

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(key) => {
                let from_btree = btree.remove(&key).ok_or(Error::KeyNotFound);
                let from_map = map.remove(&key);

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::First => {
                let from_btree = btree.first_key_value().map(copied);
                let from_map = map.first_key_value().map(copied);

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopFirst => {
                let from_btree = btree.pop_first();
                let from_map = map.pop_first();

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last_key_value().map(copied);
                let from_map = map.last_key_value().map(copied);

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopLast => {
                let from_btree = btree.pop_last();
                let from_map = map.pop_last();

                assert_eq!(from_btree, from_map, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        map.assert_invariants();
        assert_eq!(btree.len(), map.len());
        assert!(btree.iter().eq(map.iter()), "FinalOp #{op_id}: contents diverged");
        assert!(map.height() <= map.len());
    }
}
