// KeyValueStore contract tests, run against HashTable and std's HashMap.
mod common;

use chain_hashmap::Key;
use common::with_store;

fn k(s: &str) -> Key<String> {
    Key::Value(s.to_string())
}

#[test]
fn round_trip() {
    with_store::<String, i32>(|make| {
        let mut s = make();
        assert_eq!(s.put(k("a"), 1), None);
        assert_eq!(s.get(&k("a")), Some(&1));
        assert_eq!(s.size(), 1);
    });
}

#[test]
fn overwrite_returns_previous() {
    with_store::<String, i32>(|make| {
        let mut s = make();
        s.put(k("a"), 1);
        assert_eq!(s.put(k("a"), 2), Some(1));
        assert_eq!(s.get(&k("a")), Some(&2));
        assert_eq!(s.size(), 1);
    });
}

#[test]
fn absent_and_removed_keys() {
    with_store::<String, i32>(|make| {
        let mut s = make();
        assert_eq!(s.get(&k("missing")), None);
        assert_eq!(s.remove(&k("missing")), None);
        assert_eq!(s.size(), 0);

        s.put(k("a"), 1);
        s.put(k("b"), 2);
        assert_eq!(s.remove(&k("a")), Some(1));
        assert_eq!(s.get(&k("a")), None);
        assert_eq!(s.size(), 1);
    });
}

#[test]
fn null_key_behaves_like_any_key() {
    with_store::<String, i32>(|make| {
        let mut s = make();
        assert_eq!(s.put(Key::Null, 5), None);
        assert_eq!(s.put(Key::Null, 6), Some(5));
        assert_eq!(s.get(&Key::Null), Some(&6));
        assert_eq!(s.size(), 1);
        assert_eq!(s.remove(&Key::Null), Some(6));
        assert_eq!(s.get(&Key::Null), None);
        assert_eq!(s.size(), 0);
    });
}

#[test]
fn many_keys_then_clear() {
    with_store::<String, usize>(|make| {
        let mut s = make();
        for i in 0..200 {
            s.put(Key::Value(format!("n{i}")), i);
        }
        assert_eq!(s.size(), 200);
        for i in 0..200 {
            assert_eq!(s.get(&Key::Value(format!("n{i}"))), Some(&i));
        }
        s.clear();
        assert_eq!(s.size(), 0);
        assert_eq!(s.get(&k("n1")), None);
    });
}
