//! The key-value-store contract that embedding layers program against.

use crate::hash_table::HashTable;
use crate::key::Key;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

/// A mapping-shaped store with one permitted null key.
///
/// Callers must not rely on iteration or chain order, and `size` counts
/// live entries after the most recent mutation.
pub trait KeyValueStore<K, V> {
    /// Insert or overwrite; returns the previous value.
    fn put(&mut self, key: Key<K>, value: V) -> Option<V>;

    fn get(&self, key: &Key<K>) -> Option<&V>;

    fn remove(&mut self, key: &Key<K>) -> Option<V>;

    fn size(&self) -> usize;

    fn clear(&mut self);
}

impl<K, V, S> KeyValueStore<K, V> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn put(&mut self, key: Key<K>, value: V) -> Option<V> {
        HashTable::put(self, key, value)
    }

    fn get(&self, key: &Key<K>) -> Option<&V> {
        self.lookup(key.as_ref())
    }

    fn remove(&mut self, key: &Key<K>) -> Option<V> {
        self.remove_key(key.as_ref())
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn clear(&mut self) {
        HashTable::clear(self)
    }
}

/// `std`'s map keyed by `Key<K>` satisfies the same contract.
impl<K, V, S> KeyValueStore<K, V> for HashMap<Key<K>, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn put(&mut self, key: Key<K>, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn get(&self, key: &Key<K>) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn remove(&mut self, key: &Key<K>) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }
}
