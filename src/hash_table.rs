//! HashTable: separate chaining over a generational entry arena.
//!
//! Every entry is owned by one `SlotMap`. Bucket slots hold the handle of
//! a chain head and each entry holds the handle of its successor, so
//! unlinking and rehashing only rewrite handles; keys and values never
//! move between allocations.

use crate::access::{DebugAccess, Phase};
use crate::config::{ConfigError, TableConfig};
use crate::key::Key;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace};
use slotmap::SlotMap;

slotmap::new_key_type! {
    struct EntryId;
}

/// Clears bit 63 so the reduction below never sees a "negative" hash.
const SIGN_MASK: u64 = i64::MAX as u64;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: Key<K>,
    value: V,
    // Hash of the key at insertion; `K: Hash` is not called again on rehash.
    hash: u64,
    next: Option<EntryId>,
}

/// Bucket index of a key: 0 for the sentinel, otherwise the non-negative
/// hash reduced modulo `capacity`.
#[inline]
fn bucket_index<T>(key: &Key<T>, hash: u64, capacity: usize) -> usize {
    match key {
        Key::Null => 0,
        Key::Value(_) => ((hash & SIGN_MASK) % capacity as u64) as usize,
    }
}

/// Bucket heads plus the arena owning every entry.
#[derive(Clone)]
struct Chains<K, V> {
    buckets: Vec<Option<EntryId>>,
    entries: SlotMap<EntryId, Entry<K, V>>,
}

impl<K, V> Chains<K, V> {
    fn with_buckets(capacity: usize) -> Self {
        Self {
            buckets: vec![None; capacity],
            entries: SlotMap::with_key(),
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn find<Q>(&self, index: usize, hash: u64, probe: Key<&Q>) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cursor = self.buckets[index];
        while let Some(id) = cursor {
            let entry = &self.entries[id];
            if entry.hash == hash && entry.key.matches(probe) {
                return Some(id);
            }
            cursor = entry.next;
        }
        None
    }

    /// Link a fresh entry in as the new head of `index`.
    fn push_front(&mut self, index: usize, key: Key<K>, value: V, hash: u64) {
        let next = self.buckets[index];
        let id = self.entries.insert(Entry {
            key,
            value,
            hash,
            next,
        });
        self.buckets[index] = Some(id);
    }

    /// Unlink the matching entry from its chain and release it from the arena.
    fn unlink<Q>(&mut self, index: usize, hash: u64, probe: Key<&Q>) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut prev: Option<EntryId> = None;
        let mut cursor = self.buckets[index];
        while let Some(id) = cursor {
            let entry = &self.entries[id];
            if entry.hash == hash && entry.key.matches(probe) {
                let next = entry.next;
                match prev {
                    Some(p) => self.entries[p].next = next,
                    None => self.buckets[index] = next,
                }
                return self.entries.remove(id);
            }
            prev = cursor;
            cursor = entry.next;
        }
        None
    }

    /// Double the bucket array and relink every entry under the new capacity.
    ///
    /// Old buckets are visited in index order and each chain head to tail;
    /// every entry is prepended to its new bucket.
    fn grow(&mut self) {
        let new_capacity = match self.capacity().checked_mul(2) {
            Some(c) => c,
            None => panic!("HashTable capacity overflow"),
        };
        let old = mem::replace(&mut self.buckets, vec![None; new_capacity]);
        for head in old {
            let mut cursor = head;
            while let Some(id) = cursor {
                let entry = &mut self.entries[id];
                cursor = entry.next;
                let index = bucket_index(&entry.key, entry.hash, new_capacity);
                entry.next = self.buckets[index];
                self.buckets[index] = Some(id);
            }
        }
    }

    fn clear(&mut self) {
        self.buckets.fill(None);
        self.entries.clear();
    }
}

/// A single-threaded hash table with separate chaining and a null key.
///
/// Starts with [`TableConfig::default`] (16 buckets, load factor 0.75) and
/// doubles its bucket array whenever an insertion pushes the entry count
/// above `floor(capacity * load_factor)`. Capacity never shrinks.
pub struct HashTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    chains: Chains<K, V>,
    config: TableConfig,
    threshold: usize,
    access: DebugAccess,
}

impl<K, V> HashTable<K, V, DefaultHashBuilder>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<K, V, S> HashTable<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(TableConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: TableConfig, hasher: S) -> Self {
        Self {
            hasher,
            chains: Chains::with_buckets(config.initial_capacity),
            threshold: config.threshold_for(config.initial_capacity),
            config,
            access: DebugAccess::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.len() == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.chains.capacity()
    }

    /// Entry count above which the next insertion doubles the bucket array.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn load_factor(&self) -> f64 {
        self.config.load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Drop every entry. Capacity and threshold are kept.
    pub fn clear(&mut self) {
        trace!(
            "clearing {} entries from {} buckets",
            self.chains.len(),
            self.chains.capacity()
        );
        self.chains.clear();
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.chains.entries.values(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.chains.entries.values_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key<K>> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, key: Key<&Q>) -> u64
    where
        Q: ?Sized + Hash,
    {
        match key {
            Key::Null => 0,
            Key::Value(q) => self.hasher.hash_one(q),
        }
    }

    fn locate<Q>(&self, key: Key<&Q>) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        let index = bucket_index(&key, hash, self.chains.capacity());
        self.chains.find(index, hash, key)
    }

    /// Insert or overwrite. Returns the previous value when `key` was
    /// already present; in that case the stored key is kept and the size
    /// does not change.
    ///
    /// Accepts a plain `K` or [`Key::Null`].
    pub fn put(&mut self, key: impl Into<Key<K>>, value: V) -> Option<V> {
        let key = key.into();
        let _g = self.access.enter(Phase::Probing);
        let hash = self.make_hash(key.as_ref());
        let index = bucket_index(&key, hash, self.chains.capacity());
        if let Some(id) = self.chains.find(index, hash, key.as_ref()) {
            return Some(mem::replace(&mut self.chains.entries[id].value, value));
        }

        self.chains.push_front(index, key, value, hash);
        if self.chains.len() > self.threshold {
            let from = self.chains.capacity();
            let old_threshold = self.threshold;
            self.chains.grow();
            self.threshold = self.config.threshold_for(self.chains.capacity());
            debug!(
                "resized HashTable from {} to {} buckets at {} entries (threshold {} -> {})",
                from,
                self.chains.capacity(),
                self.chains.len(),
                old_threshold,
                self.threshold
            );
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup(Key::Value(key))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup_mut(Key::Value(key))
    }

    /// Value stored under the sentinel key.
    pub fn get_null(&self) -> Option<&V> {
        self.lookup::<K>(Key::Null)
    }

    /// Sentinel-aware lookup.
    pub fn lookup<Q>(&self, key: Key<&Q>) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.access.enter(Phase::Probing);
        let id = self.locate(key)?;
        Some(&self.chains.entries[id].value)
    }

    pub fn lookup_mut<Q>(&mut self, key: Key<&Q>) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.access.enter(Phase::Probing);
        let id = self.locate(key)?;
        Some(&mut self.chains.entries[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup(Key::Value(key)).is_some()
    }

    pub fn contains_null(&self) -> bool {
        self.get_null().is_some()
    }

    /// Remove `key`, returning its value. Capacity is never reduced.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_key(Key::Value(key))
    }

    pub fn remove_null(&mut self) -> Option<V> {
        self.remove_key::<K>(Key::Null)
    }

    /// Sentinel-aware removal.
    pub fn remove_key<Q>(&mut self, key: Key<&Q>) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let removed = {
            let _g = self.access.enter(Phase::Probing);
            let hash = self.make_hash(key);
            let index = bucket_index(&key, hash, self.chains.capacity());
            self.chains.unlink(index, hash, key)
        };
        // The entry is out of the structure before its key is dropped.
        removed.map(|entry| entry.value)
    }
}

impl<K, V, S> Default for HashTable<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Clone for HashTable<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            chains: self.chains.clone(),
            config: self.config,
            threshold: self.threshold,
            access: DebugAccess::new(),
        }
    }
}

impl<K, V, S> fmt::Debug for HashTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, T> Extend<(T, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
    T: Into<Key<K>>,
{
    fn extend<I: IntoIterator<Item = (T, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S, T> FromIterator<(T, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
    T: Into<Key<K>>,
{
    fn from_iter<I: IntoIterator<Item = (T, V)>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.extend(iter);
        table
    }
}

/// Iterator over shared entries of a `HashTable`.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Values<'a, EntryId, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a Key<K>, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over entries with mutable values.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::ValuesMut<'a, EntryId, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a Key<K>, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Owning iterator.
pub struct IntoIter<K, V> {
    it: slotmap::basic::IntoIter<EntryId, Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (Key<K>, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, S> IntoIterator for HashTable<K, V, S> {
    type Item = (Key<K>, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.chains.entries.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a Key<K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashTable<K, V, S> {
    type Item = (&'a Key<K>, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Keys of one chain, head first.
    pub(crate) fn chain_keys(&self, index: usize) -> Vec<&Key<K>> {
        let mut out = Vec::new();
        let mut cursor = self.chains.buckets[index];
        while let Some(id) = cursor {
            let entry = &self.chains.entries[id];
            out.push(&entry.key);
            cursor = entry.next;
        }
        out
    }

    /// Panics if any structural invariant is broken.
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.chains.capacity();
        let initial = self.config.initial_capacity;
        assert!(
            capacity % initial == 0 && (capacity / initial).is_power_of_two(),
            "capacity {capacity} is not {initial} doubled"
        );
        assert_eq!(self.threshold, self.config.threshold_for(capacity));

        let mut reachable: Vec<&Entry<K, V>> = Vec::with_capacity(self.len());
        for (i, head) in self.chains.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(id) = cursor {
                assert!(reachable.len() < self.len(), "chain cycle or orphan count");
                let entry = &self.chains.entries[id];
                assert_eq!(entry.hash, self.make_hash(entry.key.as_ref()));
                assert_eq!(bucket_index(&entry.key, entry.hash, capacity), i);
                reachable.push(entry);
                cursor = entry.next;
            }
        }
        assert_eq!(reachable.len(), self.len(), "size != reachable entries");

        for (i, a) in reachable.iter().enumerate() {
            for b in &reachable[i + 1..] {
                assert!(a.key != b.key, "duplicate key in table");
            }
        }
    }
}
