extern crate std;

use std::{ops::Range, prelude::v1::*};

use proptest::prelude::*;

use crate::model;

use super::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn keys_of<K: Copy, V>(map: &OrderedMap<K, V>) -> Vec<K> {
    map.keys().copied().collect()
}

fn root_key<K: Copy, V>(map: &OrderedMap<K, V>) -> Option<K> {
    map.root.map(|root| map.nodes[root].key)
}

fn insert_find_all(keys: &[u32]) {
    let mut map: OrderedMap<u32, u32> = OrderedMap::new();

    for &key in keys {
        assert_eq!(map.insert(key, key * 10), None);
        map.assert_invariants();
    }

    for key in keys {
        assert_eq!(map.find(key), Ok(&(key * 10)));
    }

    assert_eq!(map.len(), keys.len());
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

// Calls `f` with every permutation of `0..n`.
fn for_each_permutation(n: u32, mut f: impl FnMut(&[u32])) {
    fn permute(prefix: &mut Vec<u32>, rest: &mut Vec<u32>, f: &mut dyn FnMut(&[u32])) {
        if rest.is_empty() {
            f(prefix);
            return;
        }

        for i in 0..rest.len() {
            let item = rest.remove(i);
            prefix.push(item);
            permute(prefix, rest, f);
            prefix.pop();
            rest.insert(i, item);
        }
    }

    permute(&mut Vec::new(), &mut (0..n).collect(), &mut f);
}

#[test]
fn four_elems_find() {
    let mut count = 0;
    for_each_permutation(4, |keys| {
        insert_find_all(keys);
        count += 1;
    });
    assert_eq!(count, 24);
}

fn insert_remove_all(keys: &[u32]) {
    let mut map: OrderedMap<u32, u32> = OrderedMap::new();

    for &key in keys {
        map.insert(key, key);
        map.assert_invariants();
    }

    for (removed, key) in keys.iter().enumerate() {
        assert_eq!(map.remove(key), Ok(*key));
        map.assert_invariants();

        assert_eq!(map.find(key), Err(Error::KeyNotFound));
        for other in &keys[removed + 1..] {
            assert_eq!(map.find(other), Ok(other));
        }
    }

    assert!(map.is_empty());

    for &key in keys {
        map.insert(key, key);
        map.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(map.remove(key), Ok(*key));
        map.assert_invariants();
    }

    assert!(map.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_four() {
    for_each_permutation(4, insert_remove_all);
}

#[test]
fn remove_five() {
    for_each_permutation(5, insert_remove_all);
}

#[test]
fn empty_map_fails_lookups() {
    let mut map: OrderedMap<u32, &str> = OrderedMap::new();

    assert!(map.is_empty());
    assert_eq!(map.find(&1), Err(Error::KeyNotFound));
    assert_eq!(map.remove(&1), Err(Error::KeyNotFound));
    assert_eq!(map.get(&1), None);
    assert_eq!(map.first_key_value(), None);
    assert_eq!(map.pop_last(), None);
    assert_eq!(map.height(), 0);
    assert_eq!(map.iter().next(), None);
    map.assert_invariants();
}

#[test]
fn missing_key_in_populated_map() {
    let mut map: OrderedMap<u32, u32> = [(2, 0), (4, 0), (6, 0)].into_iter().collect();

    for key in [0, 1, 3, 5, 7] {
        assert_eq!(map.find(&key), Err(Error::KeyNotFound));
        assert_eq!(map.remove(&key), Err(Error::KeyNotFound));
    }

    assert_eq!(map.len(), 3);
    map.assert_invariants();
}

#[test]
fn sample_sequence() {
    init_tracing();

    let mut map = OrderedMap::new();
    for key in [3, 1, 4, 6, 9, 2, 5, 7] {
        map.insert(key, key * 100);
        map.assert_invariants();
    }

    assert_eq!(map.find(&6), Ok(&600));

    // 4 has no left child and a right child 6, so it is spliced out.
    assert_eq!(map.remove(&4), Ok(400));
    assert_eq!(map.find(&4), Err(Error::KeyNotFound));
    map.assert_invariants();

    assert_eq!(keys_of(&map), [1, 2, 3, 5, 6, 7, 9]);
    for key in [1, 2, 3, 5, 6, 7, 9] {
        assert_eq!(map.find(&key), Ok(&(key * 100)));
    }
}

#[test]
fn remove_root_with_two_children_promotes_successor() {
    init_tracing();

    let mut map = OrderedMap::new();
    map.insert(5, "five");
    map.insert(3, "three");
    map.insert(8, "eight");

    assert_eq!(map.remove(&5), Ok("five"));
    map.assert_invariants();

    assert_eq!(root_key(&map), Some(8));
    assert_eq!(keys_of(&map), [3, 8]);
    assert_eq!(map.find(&8), Ok(&"eight"));
}

#[test]
fn remove_two_children_deep_successor() {
    let mut map = OrderedMap::new();
    for key in [50, 30, 70, 60, 80, 55, 65, 57] {
        map.insert(key, key);
    }

    // The successor of 50 is 55, which has a right child 57.
    assert_eq!(map.remove(&50), Ok(50));
    map.assert_invariants();

    assert_eq!(root_key(&map), Some(55));
    assert_eq!(keys_of(&map), [30, 55, 57, 60, 65, 70, 80]);
    assert_eq!(map.find(&57), Ok(&57));
}

#[test]
fn remove_root_with_one_child() {
    let mut map = OrderedMap::new();
    map.insert(1, ());
    map.insert(2, ());
    map.insert(3, ());

    assert_eq!(map.remove(&1), Ok(()));
    map.assert_invariants();
    assert_eq!(root_key(&map), Some(2));

    assert_eq!(map.remove(&2), Ok(()));
    map.assert_invariants();
    assert_eq!(root_key(&map), Some(3));

    assert_eq!(map.remove(&3), Ok(()));
    map.assert_invariants();
    assert_eq!(root_key(&map), None);
    assert!(map.is_empty());
}

#[test]
fn duplicate_insert_overwrites() {
    let mut map = OrderedMap::new();

    assert_eq!(map.insert("e", 1), None);
    assert_eq!(map.insert("a", 2), None);
    assert_eq!(map.insert("e", 3), Some(1));

    assert_eq!(map.len(), 2);
    assert_eq!(map.find("e"), Ok(&3));
    map.assert_invariants();

    assert_eq!(map.remove("e"), Ok(3));
    assert_eq!(map.find("e"), Err(Error::KeyNotFound));
}

#[test]
fn duplicate_letters() {
    let mut map = OrderedMap::new();
    for (i, letter) in "EASYQUESTION".chars().enumerate() {
        map.insert(letter, i);
        map.assert_invariants();
    }

    assert_eq!(keys_of(&map).into_iter().collect::<String>(), "AEINOQSTUY");
    assert_eq!(map.find(&'E'), Ok(&6));
    assert_eq!(map.find(&'S'), Ok(&7));
}

#[test]
fn try_insert_rejects_duplicates() {
    let mut map = OrderedMap::new();

    assert_eq!(map.try_insert(1, "one").copied(), Ok("one"));
    assert_eq!(map.try_insert(1, "uno"), Err(Error::DuplicateKey));
    assert_eq!(map.find(&1), Ok(&"one"));
    assert_eq!(map.len(), 1);
}

#[test]
fn entry_api() {
    let mut map: OrderedMap<&str, u32> = OrderedMap::new();

    for word in ["b", "a", "b", "c", "b"] {
        *map.entry(word).or_default() += 1;
    }

    assert_eq!(map.find("a"), Ok(&1));
    assert_eq!(map.find("b"), Ok(&3));

    map.entry("c").and_modify(|n| *n += 10).or_insert(0);
    assert_eq!(map.find("c"), Ok(&11));

    match map.entry("b") {
        Entry::Occupied(entry) => assert_eq!(entry.remove_entry(), ("b", 3)),
        Entry::Vacant(_) => panic!("expected occupied entry"),
    }

    match map.entry("z") {
        Entry::Vacant(entry) => {
            assert_eq!(entry.key(), &"z");
            *entry.insert(5) += 1;
        }
        Entry::Occupied(_) => panic!("expected vacant entry"),
    }

    assert_eq!(keys_of(&map), ["a", "c", "z"]);
    assert_eq!(map.find("z"), Ok(&6));
    map.assert_invariants();
}

#[test]
fn first_last_and_pop() {
    let mut map: OrderedMap<i32, i32> = [4, 2, 6, 1, 3, 5, 7].map(|k| (k, -k)).into_iter().collect();

    assert_eq!(map.first_key_value(), Some((&1, &-1)));
    assert_eq!(map.last_key_value(), Some((&7, &-7)));

    assert_eq!(map.pop_first(), Some((1, -1)));
    assert_eq!(map.pop_last(), Some((7, -7)));
    map.assert_invariants();

    assert_eq!(keys_of(&map), [2, 3, 4, 5, 6]);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [-2, -3, -4, -5, -6]);
}

#[test]
fn freed_nodes_are_reused() {
    let mut map = OrderedMap::new();
    for key in 0..8 {
        map.insert(key, ());
    }
    for key in 0..8 {
        map.remove(&key).unwrap();
    }
    for key in 8..16 {
        map.insert(key, ());
    }

    map.assert_invariants();
    assert!(map.nodes.slots_allocated() <= 8);
}

#[test]
fn get_mut_and_borrowed_lookup() {
    let mut map: OrderedMap<String, Vec<u32>> = OrderedMap::new();
    map.insert("x".to_owned(), vec![1]);

    map.get_mut("x").unwrap().push(2);

    assert!(map.contains_key("x"));
    assert!(!map.contains_key("y"));
    assert_eq!(map.get("x").map(Vec::as_slice), Some(&[1, 2][..]));
    assert_eq!(map.get_key_value("x").map(|(k, _)| k.as_str()), Some("x"));
}

#[test]
fn clear_empties_map() {
    let mut map: OrderedMap<u32, u32> = (0..10).map(|k| (k, k)).collect();
    map.clear();

    assert!(map.is_empty());
    assert_eq!(map.find(&3), Err(Error::KeyNotFound));
    map.assert_invariants();

    map.insert(3, 3);
    assert_eq!(keys_of(&map), [3]);
}

#[test]
fn degenerate_tree_has_linear_height() {
    const N: u32 = 5_000;

    let mut map = OrderedMap::new();
    for key in 0..N {
        map.insert(key, key);
    }

    assert_eq!(map.height(), N as usize);
    map.assert_invariants();

    assert_eq!(map.iter().len(), N as usize);
    assert!(map.keys().copied().eq(0..N));
    assert_eq!(map.find(&(N - 1)), Ok(&(N - 1)));

    for key in (0..N).rev().step_by(2) {
        assert_eq!(map.remove(&key), Ok(key));
    }

    map.assert_invariants();
    assert_eq!(map.len(), N as usize / 2);
}

#[test]
fn height_of_balanced_insertion_order() {
    let map: OrderedMap<u32, ()> = [4, 2, 6, 1, 3, 5, 7].map(|k| (k, ())).into_iter().collect();
    assert_eq!(map.height(), 3);
}

#[test]
fn debug_format() {
    let map: OrderedMap<u32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
}

#[test]
fn dotgraph() {
    let mut out = String::new();
    OrderedMap::<u32, ()>::new().dotgraph("empty", &mut out).unwrap();
    assert_eq!(out, "digraph \"graph-empty\" {}");

    let map: OrderedMap<u32, ()> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
    let mut out = String::new();
    map.dotgraph("t", &mut out).unwrap();

    assert!(out.starts_with("digraph \"graph-t\" {"));
    assert!(out.contains("[label=\"2\"]"));
    assert!(out.contains("[label=\"1\"]"));
    assert!(out.contains("[label=\"3\"]"));
    assert_eq!(out.matches("[shape=point]").count(), 4);
    assert!(out.ends_with(" }\n}"));
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
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn ordering_survives_random_removals(
        keys in proptest::collection::vec(0u32..500, 0..200),
        removals in proptest::collection::vec(0u32..500, 0..200),
    ) {
        let mut map = OrderedMap::new();
        for &key in &keys {
            map.insert(key, key.wrapping_mul(31));
        }
        map.assert_invariants();

        let mut expected: std::collections::BTreeSet<u32> = keys.iter().copied().collect();

        for key in removals {
            let removed = map.remove(&key);
            prop_assert_eq!(removed.is_ok(), expected.remove(&key));
            prop_assert_eq!(map.find(&key), Err(Error::KeyNotFound));
            map.assert_invariants();

            for &other in &expected {
                prop_assert_eq!(map.find(&other).copied(), Ok(other.wrapping_mul(31)));
            }
        }

        prop_assert!(map.keys().copied().eq(expected.iter().copied()));
    }
}
