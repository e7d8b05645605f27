//! Integration tests: concrete usage scenarios plus model-based property
//! tests comparing each container against a `std::collections` reference,
//! checked with [`proptest`]. Placed as a `tests` submodule declared from
//! `lib.rs`.

use crate::{IntervalMap, OrderedMap, OrderedMultimap};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::vec::Vec;

// ---------------------------------------------------------------------
// Concrete usage scenarios
// ---------------------------------------------------------------------

#[test]
fn scenario_1_unique_insert_erase_find() {
    let mut m = OrderedMap::new();
    for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
        m.insert(k, ());
    }
    m.check_invariants();
    assert_eq!(
        m.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9]
    );

    m.remove(&5);
    m.check_invariants();
    assert_eq!(
        m.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 6, 7, 8, 9]
    );
    assert!(m.get(&5).is_none());
}

#[test]
fn scenario_2_ascending_insert_stays_height_bounded() {
    let mut m = OrderedMap::new();
    for k in 1..=15 {
        m.insert(k, ());
    }
    m.check_invariants();
    assert_eq!(m.len(), 15);

    // scapegoat height bound: ceil(log2(n) / log2(3/2)).
    let n = 15.0_f64;
    let bound = (n.log2() / (1.5_f64).log2()).ceil() as usize;
    assert!(m.height() <= bound, "height {} exceeds bound {}", m.height(), bound);
}

#[test]
fn scenario_3_multimap_duplicate_buckets() {
    let mut m = OrderedMultimap::new();
    m.insert(1, "a");
    m.insert(2, "b");
    m.insert(1, "c");
    m.insert(1, "d");
    m.insert(2, "e");
    m.check_invariants();

    assert_eq!(m.count(&1), 3);
    assert_eq!(m.count(&2), 2);

    let ones: Vec<_> = m.iter().filter(|(k, _)| **k == 1).map(|(_, v)| *v).collect();
    assert_eq!(ones, vec!["a", "c", "d"]);
    let twos: Vec<_> = m.iter().filter(|(k, _)| **k == 2).map(|(_, v)| *v).collect();
    assert_eq!(twos, vec!["b", "e"]);

    // spec.md's scenario erases the bucket entry "c" specifically, not
    // whichever one happens to be first.
    let removed = m.remove_where(&1, |v| *v == "c");
    m.check_invariants();
    assert_eq!(removed, Some("c"));
    assert_eq!(m.count(&1), 2);
    let ones: Vec<_> = m.iter().filter(|(k, _)| **k == 1).map(|(_, v)| *v).collect();
    assert_eq!(ones, vec!["a", "d"]);

    // remove_one always removes the first-inserted value under a key.
    let removed = m.remove_one(&1);
    m.check_invariants();
    assert_eq!(removed, Some("a"));
    assert_eq!(m.count(&1), 1);
    let ones: Vec<_> = m.iter().filter(|(k, _)| **k == 1).map(|(_, v)| *v).collect();
    assert_eq!(ones, vec!["d"]);
}

#[test]
fn scenario_4_interval_stabbing_query() {
    let mut m = IntervalMap::new();
    for (iv, name) in [
        ([1, 3], "a"),
        ([5, 7], "b"),
        ([4, 6], "c"),
        ([10, 12], "d"),
        ([2, 8], "e"),
    ] {
        m.insert(iv, name);
    }
    m.check_invariants();

    assert!(m.any(6, 6));
    let mut hits = Vec::new();
    m.all(6, 6, |iv, v| hits.push((*iv, *v)));
    hits.sort();
    let mut expected = vec![([4, 6], "c"), ([5, 7], "b"), ([2, 8], "e")];
    expected.sort();
    assert_eq!(hits, expected);

    assert!(!m.any(13, 14));
}

#[test]
fn scenario_5_erase_shrinks_root_max() {
    let mut m = IntervalMap::new();
    m.insert([0, 100], "big");
    m.insert([10, 20], "mid");
    m.insert([30, 40], "small");
    m.check_invariants();

    m.remove_one(&0);
    m.check_invariants();

    assert!(m.any(35, 36));
    assert!(!m.any(50, 60));
}

#[test]
fn interval_remove_where_targets_a_specific_bucket_entry() {
    let mut m = IntervalMap::new();
    m.insert([1, 5], "first");
    m.insert([1, 9], "second");
    m.insert([1, 3], "third");
    m.check_invariants();

    let removed = m.remove_where(&1, |_, v| *v == "second");
    m.check_invariants();
    assert_eq!(removed, Some(([1, 9], "second")));

    // the removed entry carried the bucket's largest `hi`; the remaining
    // two entries cap the augmentation at 5 now.
    assert!(m.any(5, 5));
    assert!(!m.any(6, 6));

    let mut remaining = Vec::new();
    m.all(0, 10, |iv, v| remaining.push((*iv, *v)));
    remaining.sort();
    assert_eq!(remaining, vec![([1, 3], "third"), ([1, 5], "first")]);
}

#[test]
fn scenario_6_stress_random_insert_erase_stays_sorted() {
    let mut rng_state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 7;
        rng_state ^= rng_state << 17;
        rng_state
    };

    let mut m: OrderedMap<u32, ()> = OrderedMap::new();
    let mut model: BTreeMap<u32, ()> = BTreeMap::new();

    for _ in 0..20_000 {
        let op = next() % 3;
        let key = (next() % 5_000) as u32;
        if op == 2 {
            let removed_m = m.remove(&key);
            let removed_model = model.remove(&key);
            assert_eq!(removed_m.is_some(), removed_model.is_some());
        } else {
            m.insert(key, ());
            model.insert(key, ());
        }
    }

    m.check_invariants();
    let got: Vec<_> = m.iter().map(|(k, _)| *k).collect();
    let expect: Vec<_> = model.keys().copied().collect();
    assert_eq!(got, expect);
    assert_eq!(m.len(), model.len());
}

// ---------------------------------------------------------------------
// Model-based property tests
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i16, i32),
    Remove(i16),
}

fn map_op() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        (any::<i16>(), any::<i32>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        any::<i16>().prop_map(MapOp::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    /// BST order, α-weight balance and cursor symmetry hold after
    /// arbitrary insert/remove sequences, and the map's observable
    /// contents match a `BTreeMap` reference at every step.
    #[test]
    fn map_matches_btreemap(ops in prop::collection::vec(map_op(), 0..200)) {
        let mut m: OrderedMap<i16, i32> = OrderedMap::new();
        let mut model: BTreeMap<i16, i32> = BTreeMap::new();

        for op in ops {
            match op {
                MapOp::Insert(k, v) => {
                    let old_m = m.insert(k, v);
                    let old_model = model.insert(k, v);
                    prop_assert_eq!(old_m, old_model);
                }
                MapOp::Remove(k) => {
                    let old_m = m.remove(&k);
                    let old_model = model.remove(&k);
                    prop_assert_eq!(old_m, old_model);
                }
            }
            m.check_invariants();
            prop_assert_eq!(m.len(), model.len());
            prop_assert_eq!(
                m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
                model.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
            );
        }
    }

    /// Round-trip law: insert(k) then erase(k) on a tree not containing k
    /// restores the prior contents exactly.
    #[test]
    fn map_insert_then_erase_is_identity(
        existing in prop::collection::vec((any::<i16>(), any::<i32>()), 0..50),
        fresh_key in any::<i16>(),
        fresh_val in any::<i32>(),
    ) {
        let mut m: OrderedMap<i16, i32> = existing.iter().copied().collect();
        prop_assume!(m.get(&fresh_key).is_none());

        let before: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        m.insert(fresh_key, fresh_val);
        m.remove(&fresh_key);
        m.check_invariants();
        let after: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(before, after);
    }

    /// `equal_range` bounds are exactly the keys equal to `key`,
    /// validated indirectly via `lower_bound`/`upper_bound`.
    #[test]
    fn map_bounds_straddle_the_key(
        mut entries in prop::collection::vec(any::<i16>(), 1..40),
        key in any::<i16>(),
    ) {
        entries.sort_unstable();
        entries.dedup();
        let m: OrderedMap<i16, i32> = entries.iter().map(|k| (*k, 0)).collect();

        let lower = m.lower_bound(&key);
        let upper = m.upper_bound(&key);

        if let Some((lk, _)) = lower {
            prop_assert!(*lk >= key);
        }
        if let Some((uk, _)) = upper {
            prop_assert!(*uk > key);
        }
        if m.contains_key(&key) {
            prop_assert_eq!(lower.map(|(k, _)| *k), Some(key));
        }
    }

    #[test]
    fn multimap_matches_model(ops in prop::collection::vec(
        (any::<i16>(), any::<i32>(), any::<bool>()), 0..200
    )) {
        let mut m: OrderedMultimap<i16, i32> = OrderedMultimap::new();
        // BTreeMap<key, Vec<value>> preserves per-key insertion order,
        // matching the bucket contract exactly.
        let mut model: BTreeMap<i16, Vec<i32>> = BTreeMap::new();

        for (k, v, remove) in ops {
            if remove {
                let got = m.remove_one(&k);
                let expect = model.get_mut(&k).filter(|b| !b.is_empty()).map(|b| b.remove(0));
                if let Some(bucket) = model.get(&k) {
                    if bucket.is_empty() {
                        model.remove(&k);
                    }
                }
                prop_assert_eq!(got, expect);
            } else {
                m.insert(k, v);
                model.entry(k).or_default().push(v);
            }
            m.check_invariants();
        }

        let got: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        let expect: Vec<_> = model
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (*k, *v)))
            .collect();
        prop_assert_eq!(got, expect);
    }

    /// Interval map: stabbing queries match a brute-force scan over every
    /// interval still present, and the augmentation/balance invariants
    /// hold after arbitrary insert/remove sequences.
    #[test]
    fn interval_map_any_all_match_brute_force(
        inserts in prop::collection::vec((any::<i8>(), any::<i8>()), 0..60),
        removals in prop::collection::vec(any::<i8>(), 0..30),
        query in (any::<i8>(), any::<i8>()),
    ) {
        let mut m: IntervalMap<i32, u32> = IntervalMap::new();
        let mut model: Vec<[i32; 2]> = Vec::new();

        for (id, (a, b)) in inserts.into_iter().enumerate() {
            let lo = a.min(b) as i32;
            let hi = a.max(b) as i32;
            m.insert([lo, hi], id as u32);
            model.push([lo, hi]);
        }
        m.check_invariants();

        for lo in removals {
            let lo = lo as i32;
            if let Some(pos) = model.iter().position(|iv| iv[0] == lo) {
                model.remove(pos);
                m.remove_one(&lo);
                m.check_invariants();
            }
        }

        let (q_lo, q_hi) = {
            let (a, b) = query;
            (a.min(b) as i32, a.max(b) as i32)
        };

        // Closed-interval overlap: [q_lo, q_hi] and [lo, hi] overlap iff
        // q_lo <= hi and lo <= q_hi.
        let expect_any = model.iter().any(|iv| q_lo <= iv[1] && iv[0] <= q_hi);
        prop_assert_eq!(m.any(q_lo, q_hi), expect_any);

        let mut expect_all: Vec<[i32; 2]> = model
            .iter()
            .copied()
            .filter(|iv| q_lo <= iv[1] && iv[0] <= q_hi)
            .collect();
        expect_all.sort();
        let mut got_all = Vec::new();
        m.all(q_lo, q_hi, |iv, _| got_all.push(*iv));
        got_all.sort();
        prop_assert_eq!(got_all, expect_all);
    }
}
