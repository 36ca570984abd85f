use super::*;

use proptest::prelude::*;
use std::collections::BTreeSet;

fn validate<V, P>(t: &TupleVec<u64, V, P>)
where
    P: KeyProjector<u64>,
{
    let keys: Vec<u64> = t.keys().copied().collect();
    for w in keys.windows(2) {
        assert!(w[0] < w[1], "keys must be strictly increasing: {:?}", w);
        assert!(
            t.projector().project(&w[0]) < t.projector().project(&w[1]),
            "projected keys must be strictly increasing: {:?}",
            w
        );
    }
}

fn reference_lower_bound(model: &[(u64, u32)], key: u64) -> usize {
    model.partition_point(|(k, _)| *k < key)
}

fn reference_find(model: &[(u64, u32)], key: u64) -> Option<usize> {
    model.binary_search_by_key(&key, |(k, _)| *k).ok()
}

/// Slot an `insert(index, key)` must fill to keep keys strictly increasing.
fn fits(model: &[(u64, u32)], index: usize, key: u64) -> bool {
    let after_prev = index == 0 || model[index - 1].0 < key;
    let before_next = index == model.len() || key < model[index].0;
    after_prev && before_next
}

#[derive(Clone, Debug)]
enum Op {
    Push(u64, u32),
    Insert(usize, u64, u32),
    Remove(u64),
    RemoveAt(usize),
    Truncate(usize),
    Find(u64),
    LowerBound(u64),
    Reset,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = 0u64..5_000;
    let op = prop_oneof![
        30 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Push(k, v)),
        15 => (0usize..300, key.clone(), any::<u32>()).prop_map(|(i, k, v)| Op::Insert(i, k, v)),
        10 => key.clone().prop_map(Op::Remove),
        5 => (0usize..300).prop_map(Op::RemoveAt),
        1 => (0usize..300).prop_map(Op::Truncate),
        20 => key.clone().prop_map(Op::Find),
        18 => key.prop_map(Op::LowerBound),
        1 => Just(Op::Reset),
    ];
    prop::collection::vec(op, 0..=1000)
}

/// Strictly increasing keys with a mix of dense runs and large jumps.
fn clustered_keys() -> impl Strategy<Value = Vec<u64>> {
    let gap = prop_oneof![
        8 => 1u64..4,
        1 => 100u64..10_000,
    ];
    prop::collection::vec(gap, 0..600).prop_map(|gaps| {
        let mut t = 0u64;
        gaps.into_iter()
            .map(|g| {
                t += g;
                t
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t: TupleVec<u64, u32> = TupleVec::new();
        let mut m: Vec<(u64, u32)> = Vec::new();
        let mut lookups = 0u64;

        for op in ops {
            match op {
                Op::Push(key, value) => {
                    let ok = m.last().map_or(true, |last| last.0 < key);
                    prop_assert_eq!(t.push(key, value).is_ok(), ok);
                    if ok {
                        m.push((key, value));
                    }
                }
                Op::Insert(index, key, value) => {
                    let got = t.insert(index, key, value);
                    if index > m.len() {
                        prop_assert_eq!(got, Err(Error::IndexOutOfBounds { index, len: m.len() }));
                    } else if fits(&m, index, key) {
                        prop_assert_eq!(got, Ok(()));
                        m.insert(index, (key, value));
                    } else {
                        prop_assert_eq!(got, Err(Error::InvalidOrdering { index }));
                    }
                }
                Op::Remove(key) => {
                    let expected = reference_find(&m, key).map(|i| m.remove(i).1);
                    if !t.is_empty() {
                        lookups += 1;
                    }
                    prop_assert_eq!(t.remove(&key), expected);
                }
                Op::RemoveAt(index) => {
                    let expected = (index < m.len()).then(|| m.remove(index));
                    prop_assert_eq!(t.remove_at(index), expected);
                }
                Op::Truncate(len) => {
                    t.truncate(len);
                    m.truncate(len);
                }
                Op::Find(key) => {
                    if !t.is_empty() {
                        lookups += 2;
                    }
                    let expected = reference_find(&m, key);
                    prop_assert_eq!(t.find_index(&key), expected);
                    prop_assert_eq!(t.get(&key), expected.map(|i| &m[i].1));
                }
                Op::LowerBound(key) => {
                    if !t.is_empty() {
                        lookups += 1;
                    }
                    prop_assert_eq!(t.lower_bound_index(&key), reference_lower_bound(&m, key));
                }
                Op::Reset => {
                    t.reset();
                    lookups = 0;
                }
            }

            prop_assert_eq!(t.len(), m.len());
            prop_assert_eq!(t.stats().lookups(), lookups);
        }

        validate(&t);
        prop_assert_eq!(t.as_slice(), m.as_slice());
    }

    #[test]
    fn prop_every_key_found(keys in clustered_keys(), queries in prop::collection::vec(0u64..2_000_000, 0..200)) {
        let t: TupleVec<u64, usize> =
            TupleVec::from_sorted(keys.iter().enumerate().map(|(i, &k)| (k, i)).collect()).unwrap();

        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(t.find_index(k), Some(i));
            prop_assert_eq!(t.lower_bound_index(k), i);
        }
        prop_assert_eq!(t.stats().lookups(), if keys.is_empty() { 0 } else { 2 * keys.len() as u64 });

        let present: BTreeSet<u64> = keys.iter().copied().collect();
        for q in queries {
            let expected = keys.partition_point(|&k| k < q);
            prop_assert_eq!(t.lower_bound_index(&q), expected);
            prop_assert_eq!(t.find_index(&q).is_some(), present.contains(&q));
        }
        validate(&t);
    }

    #[test]
    fn prop_lookups_are_repeatable(keys in clustered_keys(), q in 0u64..2_000_000) {
        let t: TupleVec<u64, ()> =
            TupleVec::from_sorted(keys.iter().map(|&k| (k, ())).collect()).unwrap();
        let first = t.lower_bound_index(&q);
        let found = t.find_index(&q);
        for _ in 0..10 {
            prop_assert_eq!(t.lower_bound_index(&q), first);
            prop_assert_eq!(t.find_index(&q), found);
        }
        let stored: Vec<u64> = t.keys().copied().collect();
        prop_assert_eq!(stored, keys);
    }

    #[test]
    fn prop_unverified_garbage_never_panics(
        keys in prop::collection::vec(any::<u64>(), 0..200),
        queries in prop::collection::vec(any::<u64>(), 0..200),
    ) {
        let config = Config { verify_ordering: false, ..Config::default() };
        let mut t = TupleVec::with_config(Numeric, config);
        t.extend_sorted(keys.iter().map(|&k| (k, ()))).unwrap();
        prop_assert_eq!(t.len(), keys.len());
        for q in queries {
            let _ = t.find(&q);
            prop_assert!(t.lower_bound_index(&q) <= t.len());
        }
    }
}

#[test]
fn exhaustive_small_sets() {
    // Every subset of 0..12 against every query in -1..13.
    for mask in 0u32..(1 << 12) {
        let keys: Vec<i64> = (0..12).filter(|b| mask & (1 << b) != 0).collect();
        let t: TupleVec<i64, ()> =
            TupleVec::from_sorted(keys.iter().map(|&k| (k, ())).collect()).unwrap();
        for q in -1..13i64 {
            let expected = keys.partition_point(|&k| k < q);
            assert_eq!(t.lower_bound_index(&q), expected, "keys={:?} q={}", keys, q);
            assert_eq!(t.find_index(&q).is_some(), keys.contains(&q), "keys={:?} q={}", keys, q);
        }
    }
}
