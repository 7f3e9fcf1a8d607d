//! chain-hashmap: a single-threaded hash table with separate chaining,
//! load-factor driven doubling, and an explicit null key.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a classic chained hash table whose chains are expressed with
//!   exactly one owner per entry, so unlinking and rehashing are plain
//!   handle rewrites with no orphaned allocations or ownership cycles.
//! - Layers:
//!   - Chains<K, V>: bucket heads plus a `SlotMap` arena that owns every
//!     entry; entries link to their successor by arena handle.
//!   - HashTable<K, V, S>: hashing, the null-key routing rule, the
//!     resize trigger, and a debug-only exclusive-access guard.
//!   - KeyValueStore<K, V>: the mapping-shaped contract embedding layers
//!     (service, caching) program against; also implemented by `std`'s
//!     `HashMap<Key<K>, V>`.
//!
//! Constraints
//! - Single-threaded: `Send` but `!Sync`. Shared use needs an external
//!   lock; for concurrency, shard across independently locked tables.
//! - Default capacity is 16 buckets and default load factor 0.75; growth
//!   is always by doubling and capacity never shrinks.
//! - At most one entry per key. `put` on an existing key overwrites the
//!   value in place and returns the old one.
//! - Chain order is newest-first and is not part of the contract.
//!
//! Bucket selection
//! - `Key::Null` always goes to bucket 0 and is never hashed.
//! - Any other key: the 64-bit hash with bit 63 cleared, modulo the
//!   current capacity.
//!
//! Hasher and rehashing invariants
//! - Each entry stores the hash computed on insertion. Resize recomputes
//!   bucket indices from the stored hash; `K: Hash` is never invoked
//!   after insertion.
//! - Resize runs inside the `put` that crossed the threshold. It visits
//!   old buckets in order and each chain head to tail, prepending every
//!   entry to its new bucket, then installs the new array and threshold.
//!
//! Reentrancy policy
//! - Operations that call `K: Eq`/`K: Hash` take a debug-only guard.
//!   Re-entering the same table from those impls panics in debug builds.
//! - `remove` unlinks the entry before its key is dropped.
//!
//! Errors
//! - Table operations are total; a missing key is `None`.
//! - Only configuration is fallible (`ConfigError`). Allocation failure
//!   and capacity overflow abort the operation with a panic.

// Compile-time check that a type does not implement `Sync`: the method
// path below is ambiguous (and fails to build) when both impls apply.
#[cfg(test)]
macro_rules! assert_not_sync {
    ($t:ty) => {{
        trait AmbiguousIfSync<A> {
            fn some_item() {}
        }
        impl<T: ?Sized> AmbiguousIfSync<()> for T {}
        #[allow(dead_code)]
        struct IsSync;
        impl<T: ?Sized + Sync> AmbiguousIfSync<IsSync> for T {}
        let _ = <$t as AmbiguousIfSync<_>>::some_item;
    }};
}

mod access;
pub mod config;
pub mod hash_table;
mod hash_table_proptest;
mod key;
#[cfg(feature = "serde")]
mod serde_impls;
mod store;

// Public surface
pub use config::{ConfigError, TableConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use hash_table::HashTable;
pub use key::Key;
pub use store::KeyValueStore;
