#![allow(dead_code)]

use chain_hashmap::{HashTable, Key, KeyValueStore};
use std::collections::HashMap;

/// Installs `env_logger` once; `RUST_LOG=debug` shows resize events.
pub fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .is_test(true)
        .try_init();
}

// Run a contract test against every `KeyValueStore` implementation.
pub fn with_store<K, V>(mut test: impl FnMut(&mut dyn FnMut() -> Box<dyn KeyValueStore<K, V>>))
where
    K: Eq + std::hash::Hash + 'static,
    V: 'static,
{
    test(&mut || -> Box<dyn KeyValueStore<K, V>> { Box::new(HashTable::<K, V>::new()) });
    test(&mut || -> Box<dyn KeyValueStore<K, V>> { Box::new(HashMap::<Key<K>, V>::new()) });
}
