#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check
// chain structure through test-only accessors.

use crate::hash_table::HashTable;
use crate::key::Key;
use proptest::prelude::*;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    PutNull(i32),
    Get(usize),
    GetMiss(String),
    Remove(usize),
    RemoveNull,
    Mutate(usize, i32),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key<String> {
    Key::Value(pool[i].clone())
}

// Pools of up to 40 keys so sequences cross the 12 and 24 thresholds.
fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            8 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            1 => any::<i32>().prop_map(OpI::PutNull),
            3 => idx.clone().prop_map(OpI::Get),
            1 => "[A-Z]{1,4}".prop_map(OpI::GetMiss),
            3 => idx.clone().prop_map(OpI::Remove),
            1 => Just(OpI::RemoveNull),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_against_model<S: BuildHasher>(
    mut sut: HashTable<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key<String>, i32> = HashMap::new();
    let mut max_capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = key_from(&pool, i);
                let before = sut.len();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
                // Size grows by one exactly when the key was new.
                prop_assert_eq!(sut.len(), before + usize::from(prev.is_none()));
            }
            OpI::PutNull(v) => {
                prop_assert_eq!(sut.put(Key::Null, v), model.insert(Key::Null, v));
            }
            OpI::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.lookup(k.as_ref()), model.get(&k));
            }
            OpI::GetMiss(s) => {
                let before = sut.len();
                prop_assert_eq!(sut.get(s.as_str()), None);
                prop_assert_eq!(sut.len(), before);
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.remove_key(k.as_ref()), model.remove(&k));
            }
            OpI::RemoveNull => {
                prop_assert_eq!(sut.remove_null(), model.remove(&Key::Null));
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(v) = sut.lookup_mut(k.as_ref()) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(&k).expect("model has key");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
            }
            OpI::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.capacity() >= max_capacity, "capacity shrank");
        max_capacity = sut.capacity();
        sut.assert_invariants();
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.lookup(k.as_ref()), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - put returns the previous value and only new keys increase len.
// - get/remove agree with the model for present, absent and null keys.
// - clear empties the table without shrinking it; capacity never shrinks.
// - every reachable entry sits in the bucket its hash selects, len equals
//   the number of reachable entries, and keys are unique.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(HashTable::new(), pool, ops)?;
    }
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants when every key collides into one chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_against_model(HashTable::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Property: distinct keys inserted in any number stay retrievable and the
// table has doubled exactly as often as the 0.75 threshold demands.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_matches_threshold(n in 0usize..400) {
        let mut t: HashTable<usize, usize> = HashTable::new();
        for i in 0..n {
            prop_assert_eq!(t.put(i, i * 2), None);
        }
        let mut cap = 16;
        while n > cap * 3 / 4 {
            cap *= 2;
        }
        prop_assert_eq!(t.capacity(), cap);
        prop_assert_eq!(t.len(), n);
        for i in 0..n {
            prop_assert_eq!(t.get(&i), Some(&(i * 2)));
        }
        t.assert_invariants();
    }
}
